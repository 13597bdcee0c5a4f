//! # bongo-chat
//!
//! Typed async client for the Bongo Network chat endpoint, which sits behind
//! Cloudflare bot protection and expects requests that look like they come
//! from a regular browser session.
//!
//! The crate does one thing: validate a prompt, perform a single outbound
//! exchange through a protection-bypassing transport, and parse the reply
//! envelope into a typed result. Every failure path is a distinct
//! [`ChatError`] kind, so callers can tell bad input, a broken connection, an
//! unresolved protection challenge, and a malformed reply apart.
//!
//! The transport is an injected capability ([`ProtectionTransport`]); the
//! bundled [`ReqwestTransport`] relies on browser-like headers and a cookie
//! jar, and reports a challenge it cannot pass instead of solving it.
//!
//! ## Example
//!
//! ```no_run
//! use bongo_chat::ChatClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatClient::new()?;
//!     let reply = client.generate("Hello").await?;
//!     println!("AI Response: {}", reply.content());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod request;
mod response;

pub mod transport;

pub use crate::client::{
    ChatClient,
    ChatClientBuilder,
    ChatClientConfig,
    DEFAULT_ENDPOINT,
    DEFAULT_MODEL,
};

pub use crate::error::{ChatError, ChatResult};

pub use crate::response::ChatResponse;

pub use crate::transport::{
    ProtectionTransport,
    ReqwestTransport,
    TransportError,
    TransportRequest,
    TransportResponse,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
