//! # A1Base client
//! Async client for the A1Base messaging and email API: send WhatsApp and
//! Telegram messages to individuals or group threads, send or draft emails,
//! read thread and message history, and relay inbound WhatsApp webhooks.
//!
//! Every operation goes through [`A1BaseClient::execute`], which attaches the
//! credential headers, classifies failures into [`Error`] and hands back the
//! JSON body. Typed operations then normalize that body, accepting both the
//! flat and the `{"data": ...}` enveloped shape.
//!
//! ## Errors
//! 401, 422 and 429 surface as [`Error::Authentication`], [`Error::Validation`]
//! and [`Error::RateLimit`]. Any other failure (another non-2xx status, a
//! timeout, a dropped connection) is a generic API error, see
//! [`Error::is_api_error`]. Empty required request fields fail with
//! [`Error::MissingField`] before anything is sent. Nothing is retried.
//!
//! ## Example
//! ```no_run
//! use a1base_client_rs::{A1BaseClient, MessageRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), a1base_client_rs::Error> {
//!     let client = A1BaseClient::new("api-key", "api-secret")?;
//!     let msg = MessageRequest::new("Hello!", "+15550001", "+15550002", "whatsapp");
//!     let sent = client.send_individual_message("my-account", &msg).await?;
//!     println!("{} -> {}: {}", sent.from, sent.to, sent.status);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod normalize;
mod routes;
pub mod transport;

pub use client::{A1BaseClient, A1BaseClientBuilder};
pub use config::ClientConfig;
pub use constants::{default_timeout, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{Error, Result};
pub use models::{
    ChatType, EmailHeaders, EmailRequest, EmailResponse, GroupMessageRequest,
    GroupMessageResponse, MessageRecord, MessageRequest, MessageResponse, MessageStatus,
    ThreadResponse, WhatsAppIncoming,
};
pub use normalize::unwrap_envelope;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
