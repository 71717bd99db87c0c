//! Mailgun Client Library
//!
//! A Rust email delivery client for the Mailgun messages API. Calling code
//! builds a provider-agnostic [`Message`] and hands it to a [`Mailer`]; the
//! Mailgun adapter takes care of the wire format and turns every response
//! into either a [`Receipt`] or a typed [`DeliveryError`].
//!
//! # Features
//!
//! - **Provider-agnostic messages**: recipients, bodies, headers, attachments
//! - **Correct encoding**: url-encoded forms, switching to multipart as soon
//!   as a file is attached
//! - **Mailgun options**: custom and recipient variables, tags, `o:` sending
//!   options, stored templates
//! - **Precise errors**: authentication, provider and transport failures are
//!   distinct variants
//! - **Stateless**: one adapter serves concurrent deliveries, no retries,
//!   no hidden caches
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mailgun_client::{Attachment, MailgunClient, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MailgunClient::builder()
//!         .api_key("key-your_api_key")
//!         .domain("mg.example.com")
//!         .build()?;
//!
//!     let message = Message::builder()
//!         .from(("Example", "hello@mg.example.com"))
//!         .to(("Bob", "bob@example.com"))
//!         .subject("Your report")
//!         .text_body("Attached.")
//!         .attachment(Attachment::from_path("report.pdf"))
//!         .tag("reports")
//!         .build()?;
//!
//!     let receipt = client.deliver(&message).await?;
//!     println!("queued as {}", receipt.id);
//!     Ok(())
//! }
//! ```
//!
//! # Per-call configuration
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mailgun_client::{MailgunAdapter, MailgunConfig, Mailer, Message, ReqwestTransport};
//!
//! # async fn run(message: Message) -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = MailgunAdapter::new(Arc::new(ReqwestTransport::new(
//!     std::time::Duration::from_secs(10),
//! )?));
//!
//! let config = MailgunConfig::builder()
//!     .api_key("key-your_api_key")
//!     .domain("mg.example.com")
//!     .eu_region()
//!     .build()?;
//!
//! let receipt = adapter.deliver(&message, &config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod observability;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use adapter::{classify, MailgunAdapter, Mailer, CLIENT_USER_AGENT};
pub use client::{MailgunClient, MailgunClientBuilder};
pub use codec::{JsonCodec, SerdeJsonCodec};
pub use config::{MailgunConfig, MailgunConfigBuilder, DEFAULT_BASE_URL, MAILGUN_EU_BASE_URL};
pub use encoding::{BodyEncoder, EncodedBody, FilePart, FormFields};
pub use errors::{DeliveryError, DeliveryResult};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};

// Type re-exports
pub use types::{
    Attachment, AttachmentKind, AttachmentSource, Message, MessageBuilder, ProviderOptions,
    Receipt, Recipient, SendingOptions,
};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
