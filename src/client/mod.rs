//! Mailgun API client.
//!
//! [`MailgunClient`] binds one [`MailgunConfig`] to a [`MailgunAdapter`] so
//! callers that always send through the same account can write
//! `client.deliver(&message)`.

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::{MailgunAdapter, Mailer};
use crate::codec::{JsonCodec, SerdeJsonCodec};
use crate::config::{MailgunConfig, MailgunConfigBuilder};
use crate::errors::{DeliveryError, DeliveryResult};
use crate::transport::{HttpTransport, ReqwestTransport, DEFAULT_TIMEOUT};
use crate::types::{Message, Receipt};

/// The main Mailgun client.
///
/// # Example
///
/// ```rust,no_run
/// use mailgun_client::{MailgunClient, Message};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = MailgunClient::builder()
///         .api_key("key-your_api_key")
///         .domain("mg.example.com")
///         .build()?;
///
///     let message = Message::builder()
///         .from(("Example", "hello@mg.example.com"))
///         .to(("Bob", "bob@example.com"))
///         .subject("Hi")
///         .text_body("hello")
///         .build()?;
///
///     let receipt = client.deliver(&message).await?;
///     println!("queued as {}", receipt.id);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct MailgunClient {
    config: MailgunConfig,
    adapter: MailgunAdapter,
}

impl MailgunClient {
    /// Creates a new client builder.
    pub fn builder() -> MailgunClientBuilder {
        MailgunClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `MAILGUN_API_KEY`, `MAILGUN_DOMAIN` and optionally
    /// `MAILGUN_BASE_URL`.
    pub fn from_env() -> DeliveryResult<Self> {
        let config = MailgunConfig::from_env()?;
        MailgunClientBuilder::from_config(config).build()
    }

    /// Delivers a message with the bound configuration.
    pub async fn deliver(&self, message: &Message) -> DeliveryResult<Receipt> {
        self.adapter.deliver(message, &self.config).await
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MailgunConfig {
        &self.config
    }

    /// Returns the underlying adapter.
    pub fn adapter(&self) -> &MailgunAdapter {
        &self.adapter
    }
}

impl std::fmt::Debug for MailgunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Mailgun client.
pub struct MailgunClientBuilder {
    config_builder: MailgunConfigBuilder,
    config: Option<MailgunConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    codec: Option<Arc<dyn JsonCodec>>,
    timeout: Duration,
}

impl MailgunClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: MailgunConfigBuilder::new(),
            config: None,
            transport: None,
            codec: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: MailgunConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::new()
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the sending domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.domain(domain);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom JSON codec.
    pub fn codec(mut self, codec: Arc<dyn JsonCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Builds the client.
    pub fn build(self) -> DeliveryResult<MailgunClient> {
        let config = match self.config {
            Some(config) => config,
            None => self.config_builder.build()?,
        };

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(self.timeout).map_err(|e| {
                DeliveryError::Configuration {
                    message: e.to_string(),
                }
            })?),
        };

        let codec: Arc<dyn JsonCodec> = self.codec.unwrap_or_else(|| Arc::new(SerdeJsonCodec));

        Ok(MailgunClient {
            config,
            adapter: MailgunAdapter::with_codec(transport, codec),
        })
    }
}

impl Default for MailgunClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
