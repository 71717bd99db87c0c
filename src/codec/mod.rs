//! JSON codec used for structured form fields and response bodies.
//!
//! The adapter never reaches for a process-wide JSON default; it is handed a
//! [`JsonCodec`] at construction time. [`SerdeJsonCodec`] is the stock
//! implementation.

use serde_json::Value;

use crate::errors::{DeliveryError, DeliveryResult};

/// Encodes and decodes JSON values.
pub trait JsonCodec: Send + Sync {
    /// Encodes a value to its compact JSON text.
    fn encode(&self, value: &Value) -> DeliveryResult<String>;

    /// Decodes JSON text into a value.
    fn decode(&self, bytes: &[u8]) -> DeliveryResult<Value>;
}

/// [`JsonCodec`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn encode(&self, value: &Value) -> DeliveryResult<String> {
        serde_json::to_string(value).map_err(DeliveryError::from)
    }

    fn decode(&self, bytes: &[u8]) -> DeliveryResult<Value> {
        serde_json::from_slice(bytes).map_err(DeliveryError::from)
    }
}
