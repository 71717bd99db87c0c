//! Provider adapter.
//!
//! [`Mailer`] is the provider-agnostic delivery contract; [`MailgunAdapter`]
//! implements it against Mailgun's messages endpoint. The adapter holds no
//! per-delivery state: everything a delivery needs arrives with the call,
//! so one adapter can serve any number of concurrent deliveries.

mod classify;

pub use classify::classify;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use crate::auth::{AuthProvider, BasicAuth};
use crate::codec::{JsonCodec, SerdeJsonCodec};
use crate::config::MailgunConfig;
use crate::encoding::BodyEncoder;
use crate::errors::DeliveryResult;
use crate::observability::redact;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::{Message, Receipt};

/// `User-Agent` sent with every request.
pub const CLIENT_USER_AGENT: &str = concat!("mailgun-client/", env!("CARGO_PKG_VERSION"));

/// Email delivery contract shared by provider adapters.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Provider-specific configuration.
    type Config: Send + Sync;

    /// Delivers one message. Issues at most one provider request and never
    /// retries.
    async fn deliver(&self, message: &Message, config: &Self::Config) -> DeliveryResult<Receipt>;

    /// Provider name, for logs.
    fn provider_name(&self) -> &'static str;
}

/// Mailgun implementation of [`Mailer`].
#[derive(Clone)]
pub struct MailgunAdapter {
    transport: Arc<dyn HttpTransport>,
    codec: Arc<dyn JsonCodec>,
    encoder: BodyEncoder,
}

impl MailgunAdapter {
    /// Creates an adapter using the `serde_json` codec.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_codec(transport, Arc::new(SerdeJsonCodec))
    }

    /// Creates an adapter with an explicit JSON codec.
    pub fn with_codec(transport: Arc<dyn HttpTransport>, codec: Arc<dyn JsonCodec>) -> Self {
        Self {
            encoder: BodyEncoder::new(Arc::clone(&codec)),
            transport,
            codec,
        }
    }

    /// Builds the HTTP request for a message without sending it.
    pub async fn build_request(
        &self,
        message: &Message,
        config: &MailgunConfig,
    ) -> DeliveryResult<HttpRequest> {
        let auth = BasicAuth::from_config(config);
        auth.validate()?;

        let body = self.encoder.encode(message).await?;
        let content_type = body.content_type();

        let mut request = HttpRequest::post(config.messages_url(), body.into_request_body())
            .with_header(::http::header::USER_AGENT.as_str(), CLIENT_USER_AGENT)
            .with_header(::http::header::CONTENT_TYPE.as_str(), content_type.as_ref());
        auth.apply_auth(&mut request.headers);

        Ok(request)
    }
}

#[async_trait]
impl Mailer for MailgunAdapter {
    type Config = MailgunConfig;

    #[instrument(
        name = "mailgun.deliver",
        skip_all,
        fields(
            delivery_id = %uuid::Uuid::new_v4(),
            domain = %config.domain(),
            recipients = message.recipient_count(),
            attachments = message.attachments().len(),
        )
    )]
    async fn deliver(&self, message: &Message, config: &MailgunConfig) -> DeliveryResult<Receipt> {
        let request = self.build_request(message, config).await?;
        tracing::debug!(
            url = %request.url,
            multipart = request.body.is_multipart(),
            "Sending message"
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "No response from provider");
                return Err(e.into());
            }
        };

        let outcome = classify(response.status, &response.body, self.codec.as_ref());
        match &outcome {
            Ok(receipt) => tracing::debug!(id = %receipt.id, "Message accepted"),
            Err(e) => tracing::warn!(
                status = response.status,
                error = %redact(&e.to_string()),
                "Message rejected"
            ),
        }

        outcome
    }

    fn provider_name(&self) -> &'static str {
        "mailgun"
    }
}

impl std::fmt::Debug for MailgunAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunAdapter").finish()
    }
}
