//! Prompt validation and outbound request assembly.
//!
//! The remote endpoint expects a plain GET with `prompt` and `model` query
//! parameters and a header set matching the browser session the service was
//! built for. The header profile is fixed; per-client overrides are merged on
//! top of it.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use once_cell::sync::Lazy;

use crate::client::ChatClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::transport::TransportRequest;

/// Header profile of the browser session the endpoint expects.
static BROWSER_HEADERS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("accept", "*/*"),
        ("accept-language", "en-US,en;q=0.6"),
        ("origin", "https://bongonetworkteambd.github.io"),
        ("priority", "u=1, i"),
        ("referer", "https://bongonetworkteambd.github.io/"),
        (
            "sec-ch-ua",
            r#""Brave";v="131", "Chromium";v="131", "Not_A Brand";v="24""#,
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", r#""Windows""#),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "cross-site"),
        ("sec-gpc", "1"),
        (
            "user-agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        ),
    ]
});

/// Reject empty and whitespace-only prompts before any network activity.
/// Any other text is acceptable as-is.
pub fn validate_prompt(prompt: &str) -> ChatResult<()> {
    if prompt.is_empty() {
        return Err(ChatError::InvalidPrompt("prompt cannot be empty".into()));
    }
    if prompt.trim().is_empty() {
        return Err(ChatError::InvalidPrompt(
            "prompt cannot be whitespace only".into(),
        ));
    }
    Ok(())
}

/// Assemble the outbound request for a validated prompt.
pub fn build_request(prompt: &str, config: &ChatClientConfig) -> ChatResult<TransportRequest> {
    let mut url = config.endpoint.clone();
    url.query_pairs_mut()
        .append_pair("prompt", prompt)
        .append_pair("model", &config.model);

    let mut headers = browser_headers()?;
    for (name, value) in &config.extra_headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ChatError::InvalidHeader(name.clone()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ChatError::InvalidHeader(name.clone()))?;
        headers.insert(header_name, header_value);
    }

    Ok(TransportRequest::new(Method::GET, url).with_headers(headers))
}

fn browser_headers() -> ChatResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in BROWSER_HEADERS.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ChatError::InvalidHeader(name.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ChatError::InvalidHeader(name.to_string()))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_prompt() {
        assert!(matches!(
            validate_prompt(""),
            Err(ChatError::InvalidPrompt(_))
        ));
    }

    #[test]
    fn rejects_whitespace_prompt() {
        assert!(matches!(
            validate_prompt(" \t\n "),
            Err(ChatError::InvalidPrompt(_))
        ));
    }

    #[test]
    fn accepts_any_non_blank_text() {
        assert!(validate_prompt("Hi").is_ok());
        assert!(validate_prompt("  padded  ").is_ok());
        assert!(validate_prompt("プロンプト").is_ok());
    }

    #[test]
    fn request_encodes_prompt_and_model() {
        let config = ChatClientConfig::default();
        let request = build_request("tell me a joke", &config).unwrap();
        assert_eq!(request.method, Method::GET);
        let query = request.url.query().unwrap();
        assert!(query.contains("prompt=tell+me+a+joke"));
        assert!(query.contains("model=gpt-4o-mini"));
    }

    #[test]
    fn request_carries_browser_profile() {
        let config = ChatClientConfig::default();
        let request = build_request("Hi", &config).unwrap();
        let ua = request.headers.get("user-agent").unwrap();
        assert!(ua.to_str().unwrap().starts_with("Mozilla/5.0"));
        assert!(request.headers.contains_key("sec-fetch-mode"));
    }

    #[test]
    fn extra_headers_override_profile() {
        let mut config = ChatClientConfig::default();
        config
            .extra_headers
            .push(("accept-language".into(), "pt-BR".into()));
        let request = build_request("Hi", &config).unwrap();
        assert_eq!(
            request.headers.get("accept-language").unwrap(),
            &HeaderValue::from_static("pt-BR")
        );
    }

    #[test]
    fn invalid_extra_header_is_rejected() {
        let mut config = ChatClientConfig::default();
        config
            .extra_headers
            .push(("bad header".into(), "value".into()));
        assert!(matches!(
            build_request("Hi", &config),
            Err(ChatError::InvalidHeader(_))
        ));
    }
}
