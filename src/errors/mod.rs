//! Error types for the Mailgun client.
//!
//! Every delivery outcome other than a [`Receipt`](crate::types::Receipt) is
//! a [`DeliveryError`]. Provider responses are classified into
//! authentication, provider and unexpected-status failures; failures that
//! happen before a response exists (transport, attachment loading, encoding)
//! get their own variants.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Error type for Mailgun delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The provider rejected the credentials (HTTP 401).
    #[error("Authentication failed: {body}")]
    Authentication {
        /// Raw, unparsed response body.
        body: String,
    },

    /// The provider answered with an error status (> 399).
    #[error("Provider error (HTTP {status}){}", payload_suffix(.payload))]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Decoded response body, `None` when the body was empty.
        payload: Option<serde_json::Value>,
    },

    /// No response was obtained from the provider.
    #[error("Transport error: {reason}")]
    Transport {
        /// Description of the transport failure.
        reason: String,
    },

    /// The provider answered with a status no rule covers.
    #[error("Unexpected response status (HTTP {status})")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Attachment content could not be loaded.
    #[error("Attachment error ({filename}): {message}")]
    Attachment {
        /// Filename of the offending attachment.
        filename: String,
        /// Error message.
        message: String,
    },

    /// Configuration error (missing API key, invalid base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The message failed validation before anything was sent.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message describing the validation issue.
        message: String,
    },
}

fn payload_suffix(payload: &Option<serde_json::Value>) -> String {
    match payload {
        Some(value) => format!(": {}", value),
        None => String::new(),
    }
}

impl DeliveryError {
    /// Returns true if a caller-side retry could plausibly succeed.
    ///
    /// The client itself never retries; this is advisory for callers that
    /// own a retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DeliveryError::Transport { .. }
                | DeliveryError::Provider { status: 429, .. }
                | DeliveryError::Provider { status: 500..=599, .. }
        )
    }

    /// Returns the HTTP status code, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryError::Authentication { .. } => Some(401),
            DeliveryError::Provider { status, .. }
            | DeliveryError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        DeliveryError::Validation {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        DeliveryError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        DeliveryError::Serialization {
            message: message.into(),
        }
    }
}

impl From<TransportError> for DeliveryError {
    fn from(err: TransportError) -> Self {
        match err {
            // Rejected before anything went on the wire; resending cannot help.
            TransportError::InvalidRequest { message } => DeliveryError::Validation { message },
            other => DeliveryError::Transport {
                reason: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for DeliveryError {
    fn from(err: serde_json::Error) -> Self {
        DeliveryError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for DeliveryError {
    fn from(err: url::ParseError) -> Self {
        DeliveryError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
