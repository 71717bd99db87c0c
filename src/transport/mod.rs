//! HTTP transport layer for the Mailgun client.
//!
//! The client never talks to the network directly: it hands a fully built
//! [`HttpRequest`] to an [`HttpTransport`] and gets back the raw status and
//! body. Connection pooling, TLS and timeouts belong to the transport.

mod http;

pub use self::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, DEFAULT_TIMEOUT};

use bytes::Bytes;
use std::time::Duration;

/// Body of an outgoing request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Pre-encoded `application/x-www-form-urlencoded` bytes.
    Form(Vec<u8>),
    /// `multipart/form-data` parts; the transport picks the boundary.
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    /// Returns true for multipart bodies.
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// A part of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartPart {
    /// Text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field.
    File {
        /// Field name.
        name: String,
        /// File name.
        filename: String,
        /// Content type.
        content_type: String,
        /// File data.
        data: Bytes,
    },
}

impl MultipartPart {
    /// Returns the form field name of this part.
    pub fn name(&self) -> &str {
        match self {
            MultipartPart::Text { name, .. } | MultipartPart::File { name, .. } => name,
        }
    }
}

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// The request could not be built.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}
