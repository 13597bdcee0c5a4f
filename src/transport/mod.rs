//! Transport abstraction for the protection-bypassing HTTP layer.
//!
//! The client never talks to the network directly; it hands a fully built
//! request to a [`ProtectionTransport`] and gets back either a completed
//! exchange or a typed transport failure. Whatever the implementation does to
//! satisfy interactive challenges (extra handshake requests, cookie replay)
//! is opaque at this seam, which also makes it trivial to substitute a stub
//! in tests.

pub mod reqwest_client;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use thiserror::Error;
use url::Url;

pub use reqwest_client::ReqwestTransport;

/// Outbound request as assembled by the client. Query parameters are already
/// encoded into the URL.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl TransportRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Minimal representation of a completed exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Final URL after any redirects performed by the transport.
    pub url: Url,
}

impl TransportResponse {
    /// Body as UTF-8 text, lossy on invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Failure states a transport can report.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport error: {0}")]
    Connection(String),
    #[error("request timed out")]
    Timeout,
    #[error("protection challenge not satisfied: {0}")]
    ChallengeFailed(String),
}

/// Contract for the HTTP capability that performs the actual exchange,
/// including whatever is needed to pass protection challenges.
///
/// Implementations should preserve cookies and other session state between
/// calls so repeated requests from one client behave like one browser
/// session. A single `send` may internally issue extra requests to satisfy a
/// challenge; from the caller's point of view it is still one exchange.
#[async_trait]
pub trait ProtectionTransport: Send + Sync {
    async fn send(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError>;
}
