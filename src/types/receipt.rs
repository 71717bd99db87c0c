//! Successful delivery outcome.

use serde::{Deserialize, Serialize};

/// Provider acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Provider-assigned message identifier.
    pub id: String,
    /// Status text returned alongside the id (e.g. "Queued. Thank you.").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Receipt {
    /// Creates a receipt carrying only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: None,
        }
    }
}
