//! Wire format of a chat message posted to the workflow webhook

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body posted to the workflow webhook
///
/// Unknown fields sent by a client are kept and relayed unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEnvelope {
    pub message: String,
    pub session_id: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatEnvelope {
    /// Build an envelope stamped with the current time
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: session_id.into(),
            timestamp: Utc::now(),
            extra: Map::new(),
        }
    }
}
