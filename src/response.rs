//! Reply envelope schema and parsing.
//!
//! The endpoint reports success and failure in-band: every reply is a JSON
//! envelope with its own `status` code, a `response` field on success, and a
//! `type` field naming the error kind otherwise. The schema is explicit here
//! so "field present and correctly typed" is checked in one place rather than
//! probed ad hoc along the call path.

use serde::Deserialize;

use crate::error::{ChatError, ChatResult};

/// Raw envelope as sent by the service.
#[derive(Debug, Deserialize)]
struct ReplyEnvelope {
    status: u16,
    response: Option<String>,
    #[serde(rename = "type")]
    error_kind: Option<String>,
}

/// Result of one prompt-to-response exchange. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    content: String,
    status_code: u16,
    error: Option<String>,
}

impl ChatResponse {
    /// Generated text. Empty when the service reported an in-band error.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Status code reported inside the envelope, not the HTTP layer.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Error kind reported by the service for non-200 envelopes.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the service produced content.
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}

/// Decode a reply body into a [`ChatResponse`].
///
/// A 200 envelope must carry a string `response`; a non-200 envelope is still
/// a valid exchange and is returned as data with the reported error kind.
/// Anything else is a malformed response carrying a body excerpt.
pub fn parse_reply(body: &[u8]) -> ChatResult<ChatResponse> {
    let text = std::str::from_utf8(body)
        .map_err(|_| ChatError::malformed("body is not valid UTF-8", &String::from_utf8_lossy(body)))?;

    let envelope: ReplyEnvelope = serde_json::from_str(text)
        .map_err(|err| ChatError::malformed(format!("body is not a reply envelope: {err}"), text))?;

    if envelope.status == 200 {
        let content = envelope
            .response
            .ok_or_else(|| ChatError::malformed("envelope is missing the response field", text))?;
        return Ok(ChatResponse {
            content,
            status_code: 200,
            error: None,
        });
    }

    log::debug!(
        "service reported in-band error {} ({:?})",
        envelope.status,
        envelope.error_kind
    );
    Ok(ChatResponse {
        content: String::new(),
        status_code: envelope.status,
        error: envelope.error_kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_successful_envelope() {
        let reply = parse_reply(br#"{"status":200,"response":"Hello, world!"}"#).unwrap();
        assert_eq!(reply.content(), "Hello, world!");
        assert_eq!(reply.status_code(), 200);
        assert!(reply.is_ok());
        assert!(reply.error().is_none());
    }

    #[test]
    fn in_band_error_is_data_not_failure() {
        let reply = parse_reply(br#"{"status":429,"type":"rate_limit"}"#).unwrap();
        assert!(!reply.is_ok());
        assert_eq!(reply.status_code(), 429);
        assert_eq!(reply.error(), Some("rate_limit"));
        assert_eq!(reply.content(), "");
    }

    #[test]
    fn missing_content_field_is_malformed() {
        let err = parse_reply(br#"{"status":200}"#).unwrap_err();
        assert!(matches!(err, ChatError::MalformedResponse { .. }));
    }

    #[test]
    fn missing_status_field_is_malformed() {
        let err = parse_reply(br#"{"response":"hi"}"#).unwrap_err();
        assert!(matches!(err, ChatError::MalformedResponse { .. }));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_reply(b"<html>Just a moment</html>").unwrap_err();
        match err {
            ChatError::MalformedResponse { body_excerpt, .. } => {
                assert!(body_excerpt.contains("Just a moment"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn long_body_excerpt_is_truncated() {
        let body = format!("not json {}", "x".repeat(1000));
        let err = parse_reply(body.as_bytes()).unwrap_err();
        match err {
            ChatError::MalformedResponse { body_excerpt, .. } => {
                assert!(body_excerpt.chars().count() < body.chars().count());
                assert!(body_excerpt.ends_with('…'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_content_type_is_malformed() {
        let err = parse_reply(br#"{"status":200,"response":42}"#).unwrap_err();
        assert!(matches!(err, ChatError::MalformedResponse { .. }));
    }
}
