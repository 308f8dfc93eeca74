//! Per-recipient notification outcomes.

use serde::{Deserialize, Serialize};

/// Result of one send to one subscriber.
///
/// Reported synchronously back to the dispatch caller, never persisted.
/// A failed send is data, not an error: the dispatcher returns all outcomes
/// and lets the caller decide what to log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub chat_id: i64,
    pub success: bool,
    /// Message id on success, error description on failure.
    pub detail: String,
}

impl NotificationOutcome {
    pub fn delivered(chat_id: i64, detail: impl Into<String>) -> Self {
        Self {
            chat_id,
            success: true,
            detail: detail.into(),
        }
    }

    pub fn failed(chat_id: i64, detail: impl Into<String>) -> Self {
        Self {
            chat_id,
            success: false,
            detail: detail.into(),
        }
    }
}
