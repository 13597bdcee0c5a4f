//! High level chat client orchestration.
//!
//! Wires prompt validation, request assembly, the injected
//! protection-bypassing transport, and envelope parsing into the single
//! `generate` operation. Each call is independent and performs exactly one
//! transport exchange; failed calls are surfaced, never retried here.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::error::{ChatError, ChatResult};
use crate::request::{build_request, validate_prompt};
use crate::response::{ChatResponse, parse_reply};
use crate::transport::{ProtectionTransport, ReqwestTransport};

/// Chat endpoint of the Bongo Network service.
pub const DEFAULT_ENDPOINT: &str = "https://darkness.ashlynn.workers.dev/chat/";

/// Model requested when the builder does not override it.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Client configuration used by the builder.
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub endpoint: Url,
    pub model: String,
    /// Headers merged on top of the fixed browser profile.
    pub extra_headers: Vec<(String, String)>,
    /// Per-request deadline imposed at the transport layer.
    pub timeout: Option<Duration>,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid url"),
            model: DEFAULT_MODEL.to_string(),
            extra_headers: Vec::new(),
            timeout: None,
        }
    }
}

/// Fluent builder for [`ChatClient`].
pub struct ChatClientBuilder {
    config: ChatClientConfig,
    transport: Option<Arc<dyn ProtectionTransport>>,
}

impl ChatClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ChatClientConfig::default(),
            transport: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.config.endpoint = endpoint;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Inject a custom transport, e.g. a full challenge-solving client or a
    /// stub in tests.
    pub fn with_transport(mut self, transport: Arc<dyn ProtectionTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> ChatResult<ChatClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config.timeout)?),
        };
        Ok(ChatClient {
            config: self.config,
            transport,
        })
    }
}

impl Default for ChatClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for one prompt-to-response exchange with the chat service.
///
/// Holds no mutable state; concurrent `generate` calls on one instance are
/// safe as long as the transport is.
pub struct ChatClient {
    config: ChatClientConfig,
    transport: Arc<dyn ProtectionTransport>,
}

impl ChatClient {
    /// Construct a client with default configuration and the reqwest
    /// transport.
    pub fn new() -> ChatResult<Self> {
        ChatClientBuilder::new().build()
    }

    /// Obtain a builder to customise the client instance.
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder::new()
    }

    /// Send one prompt and return the parsed reply.
    ///
    /// Validation happens before any I/O; exactly one transport exchange is
    /// performed regardless of outcome. Failure kinds are documented on
    /// [`ChatError`].
    pub async fn generate(&self, prompt: &str) -> ChatResult<ChatResponse> {
        validate_prompt(prompt)?;

        let request = build_request(prompt, &self.config)?;
        log::debug!(
            "dispatching prompt ({} chars) to {} with model {}",
            prompt.len(),
            self.config.endpoint,
            self.config.model
        );

        let response = self.transport.send(&request).await?;

        if !(200..300).contains(&response.status) {
            log::warn!(
                "service at {} answered with HTTP status {}",
                response.url,
                response.status
            );
            return Err(ChatError::connection(
                format!("service returned HTTP status {}", response.status),
                Some(response.status),
            ));
        }

        parse_reply(&response.body)
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Endpoint the client talks to.
    pub fn endpoint(&self) -> &Url {
        &self.config.endpoint
    }
}
