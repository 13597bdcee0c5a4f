//! Reqwest-based implementation of the [`ProtectionTransport`] trait.
//!
//! A thin adapter around `reqwest::Client` configured to resemble a regular
//! browser session: persistent cookie jar, gzip/brotli decoding, and the
//! caller-supplied browser header profile. It does not *solve* interactive
//! challenges; it detects when Cloudflare answered with one anyway and
//! reports that as a distinct failure so callers can tell a blocked client
//! apart from a broken network.

use std::time::Duration;

use async_trait::async_trait;
use http::header::SERVER;
use http::{HeaderMap as HttpHeaderMap, HeaderName as HttpHeaderName, HeaderValue as HttpHeaderValue};
use once_cell::sync::Lazy;
use regex::RegexBuilder;

use super::{ProtectionTransport, TransportError, TransportRequest, TransportResponse};

/// Reqwest-backed transport used for real exchanges.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a fresh cookie jar and an optional
    /// per-request deadline.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(deadline) = timeout {
            builder = builder.timeout(deadline);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::Connection(err.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client. The client should already carry a
    /// cookie store; without one each call starts a fresh session and is more
    /// likely to be challenged.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProtectionTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let method = map_method(&request.method)?;
        let headers = convert_headers(&request.headers)?;

        let response = self
            .client
            .request(method, request.url.as_str())
            .headers(headers)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let url = response.url().clone();
        let headers = convert_back_headers(response.headers())?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        let body_text = String::from_utf8_lossy(&body);
        if is_unresolved_challenge(status, &headers, &body_text) {
            log::warn!("challenge page returned for {} (status {})", url, status);
            return Err(TransportError::ChallengeFailed(format!(
                "received a Cloudflare challenge page (status {status})"
            )));
        }

        Ok(TransportResponse {
            status,
            headers,
            body,
            url,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}

fn map_method(method: &http::Method) -> Result<reqwest::Method, TransportError> {
    reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|err| TransportError::Connection(err.to_string()))
}

fn convert_headers(headers: &HttpHeaderMap) -> Result<reqwest::header::HeaderMap, TransportError> {
    let mut map = reqwest::header::HeaderMap::new();
    for (name, value) in headers.iter() {
        let name = reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes())
            .map_err(|err| TransportError::Connection(err.to_string()))?;
        let value = reqwest::header::HeaderValue::from_bytes(value.as_bytes())
            .map_err(|err| TransportError::Connection(err.to_string()))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn convert_back_headers(
    map: &reqwest::header::HeaderMap,
) -> Result<HttpHeaderMap, TransportError> {
    let mut headers = HttpHeaderMap::new();
    for (name, value) in map.iter() {
        let http_name = HttpHeaderName::from_bytes(name.as_str().as_bytes())
            .map_err(|err| TransportError::Connection(err.to_string()))?;
        let http_value = HttpHeaderValue::from_bytes(value.as_bytes())
            .map_err(|err| TransportError::Connection(err.to_string()))?;
        headers.insert(http_name, http_value);
    }
    Ok(headers)
}

/// Detect whether the response is served by Cloudflare.
fn is_cloudflare_response(headers: &HttpHeaderMap) -> bool {
    headers
        .get(SERVER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().starts_with("cloudflare"))
        .unwrap_or(false)
}

static CHALLENGE_MARKER_RE: Lazy<regex::Regex> = Lazy::new(|| {
    RegexBuilder::new(
        r#"(?si)(id=['"]challenge-form['"]|__cf_chl_|cf-turnstile|<title>\s*just a moment)"#,
    )
    .case_insensitive(true)
    .dot_matches_new_line(true)
    .build()
    .unwrap()
});

/// A challenge the session could not pass shows up as a 403/503 Cloudflare
/// page carrying one of the interstitial markers.
fn is_unresolved_challenge(status: u16, headers: &HttpHeaderMap, body: &str) -> bool {
    matches!(status, 403 | 503)
        && is_cloudflare_response(headers)
        && CHALLENGE_MARKER_RE.is_match(body)
}
