//! Error taxonomy for the chat client.
//!
//! Every failure of a `generate` call is one of these variants; nothing is
//! retried or swallowed internally, so callers can branch on the kind.

use thiserror::Error;

use crate::transport::TransportError;

/// Result alias used across the client.
pub type ChatResult<T> = Result<T, ChatError>;

/// Failure states surfaced by [`ChatClient`](crate::ChatClient).
///
/// Validation is checked before any I/O, transport failures before response
/// parsing. [`ChatError::ProtectionBypass`] is kept distinct from
/// [`ChatError::Connection`] so callers can treat an unresolved challenge as a
/// harder failure than a flaky network.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid prompt: {0}")]
    InvalidPrompt(String),
    #[error("connection failed: {reason}")]
    Connection {
        reason: String,
        /// HTTP status when the exchange completed with a non-success code.
        status: Option<u16>,
        #[source]
        source: Option<TransportError>,
    },
    #[error("protection bypass failed: {0}")]
    ProtectionBypass(String),
    #[error("malformed response: {reason}")]
    MalformedResponse {
        reason: String,
        /// Truncated copy of the offending body for diagnostics.
        body_excerpt: String,
    },
    #[error("failed to convert header '{0}'")]
    InvalidHeader(String),
}

impl ChatError {
    pub(crate) fn connection(reason: impl Into<String>, status: Option<u16>) -> Self {
        ChatError::Connection {
            reason: reason.into(),
            status,
            source: None,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>, body: &str) -> Self {
        ChatError::MalformedResponse {
            reason: reason.into(),
            body_excerpt: excerpt(body),
        }
    }
}

impl From<TransportError> for ChatError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::ChallengeFailed(reason) => ChatError::ProtectionBypass(reason),
            other => ChatError::Connection {
                reason: other.to_string(),
                status: None,
                source: Some(other),
            },
        }
    }
}

const EXCERPT_LIMIT: usize = 256;

/// Clip a body to a short diagnostic excerpt, respecting char boundaries.
fn excerpt(body: &str) -> String {
    if body.len() <= EXCERPT_LIMIT {
        return body.to_string();
    }
    let mut end = EXCERPT_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_failure_maps_to_protection_bypass() {
        let err = ChatError::from(TransportError::ChallengeFailed("still challenged".into()));
        assert!(matches!(err, ChatError::ProtectionBypass(_)));
    }

    #[test]
    fn timeout_maps_to_connection() {
        let err = ChatError::from(TransportError::Timeout);
        assert!(matches!(err, ChatError::Connection { .. }));
    }

    #[test]
    fn excerpt_is_clipped_on_char_boundary() {
        let body = "é".repeat(300);
        let clipped = excerpt(&body);
        assert!(clipped.len() <= EXCERPT_LIMIT + '…'.len_utf8());
        assert!(clipped.ends_with('…'));
    }
}
