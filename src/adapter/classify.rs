//! Response classification.

use serde_json::Value;

use crate::codec::JsonCodec;
use crate::errors::{DeliveryError, DeliveryResult};
use crate::types::Receipt;

/// Turns a provider response into a delivery outcome.
///
/// Rules, first match wins:
/// 1. `200` decodes the body and extracts `id` into a [`Receipt`].
/// 2. `401` is an authentication failure carrying the raw body.
/// 3. `> 399` with an empty body is a provider error without payload.
/// 4. `> 399` otherwise is a provider error with the decoded body.
/// 5. Anything else is an unexpected status.
pub fn classify(status: u16, body: &[u8], codec: &dyn JsonCodec) -> DeliveryResult<Receipt> {
    match status {
        200 => parse_receipt(body, codec),
        401 => Err(DeliveryError::Authentication {
            body: String::from_utf8_lossy(body).into_owned(),
        }),
        s if s > 399 && is_blank(body) => Err(DeliveryError::Provider {
            status: s,
            payload: None,
        }),
        s if s > 399 => Err(DeliveryError::Provider {
            status: s,
            payload: Some(decode_error_payload(body, codec)),
        }),
        s => Err(DeliveryError::UnexpectedStatus {
            status: s,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

fn parse_receipt(body: &[u8], codec: &dyn JsonCodec) -> DeliveryResult<Receipt> {
    let value = codec.decode(body).map_err(|e| {
        DeliveryError::serialization(format!("Failed to parse success response: {}", e))
    })?;

    serde_json::from_value(value).map_err(|e| {
        DeliveryError::serialization(format!("Success response has no usable id: {}", e))
    })
}

// Error bodies that are not JSON are kept verbatim as a string payload.
fn decode_error_payload(body: &[u8], codec: &dyn JsonCodec) -> Value {
    codec
        .decode(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SerdeJsonCodec;
    use serde_json::json;

    #[test]
    fn test_success_extracts_id() {
        let receipt = classify(200, br#"{"id":"abc123"}"#, &SerdeJsonCodec).unwrap();
        assert_eq!(receipt, Receipt::new("abc123"));
    }

    #[test]
    fn test_success_keeps_message() {
        let body = br#"{"id":"<20240301.1@mg.example.com>","message":"Queued. Thank you."}"#;
        let receipt = classify(200, body, &SerdeJsonCodec).unwrap();
        assert_eq!(receipt.id, "<20240301.1@mg.example.com>");
        assert_eq!(receipt.message.as_deref(), Some("Queued. Thank you."));
    }

    #[test]
    fn test_success_with_malformed_body_is_an_error() {
        let result = classify(200, b"<html>oops</html>", &SerdeJsonCodec);
        assert!(matches!(result, Err(DeliveryError::Serialization { .. })));

        let result = classify(200, b"", &SerdeJsonCodec);
        assert!(matches!(result, Err(DeliveryError::Serialization { .. })));
    }

    #[test]
    fn test_success_without_id_is_an_error() {
        let result = classify(200, br#"{"message":"Queued"}"#, &SerdeJsonCodec);
        assert!(matches!(result, Err(DeliveryError::Serialization { .. })));
    }

    #[test]
    fn test_unauthorized_keeps_raw_body() {
        match classify(401, b"unauthorized", &SerdeJsonCodec) {
            Err(DeliveryError::Authentication { body }) => assert_eq!(body, "unauthorized"),
            other => panic!("Expected Authentication error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_with_empty_body() {
        match classify(500, b"", &SerdeJsonCodec) {
            Err(DeliveryError::Provider { status, payload }) => {
                assert_eq!(status, 500);
                assert_eq!(payload, None);
            }
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_with_json_body() {
        match classify(400, br#"{"message":"bad"}"#, &SerdeJsonCodec) {
            Err(DeliveryError::Provider { status, payload }) => {
                assert_eq!(status, 400);
                assert_eq!(payload, Some(json!({"message": "bad"})));
            }
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_with_text_body() {
        match classify(502, b"Bad Gateway", &SerdeJsonCodec) {
            Err(DeliveryError::Provider { payload, .. }) => {
                assert_eq!(payload, Some(json!("Bad Gateway")));
            }
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_status() {
        let result = classify(302, b"", &SerdeJsonCodec);
        assert!(matches!(
            result,
            Err(DeliveryError::UnexpectedStatus { status: 302, .. })
        ));
    }
}
