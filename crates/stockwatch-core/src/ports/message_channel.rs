//! MessageChannel port - 1通の送信の抽象化

use async_trait::async_trait;

use crate::domain::NotificationOutcome;

/// Sends one message to one recipient.
///
/// Recipient-level failure is not an error: it comes back inside the
/// outcome so the fan-out never aborts because one send went wrong.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn send(&self, chat_id: i64, body: &str) -> NotificationOutcome;
}
