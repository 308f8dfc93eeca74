//! SubscriberDirectory port - 通知先リストの抽象化
//!
//! リストは外部（登録ボット）が所有する。dispatcher は送信のたびに
//! 読み直す（キャッシュしない）。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::MonitorError;

/// One notification recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub chat_id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

impl Subscriber {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            username: None,
        }
    }
}

/// Read access to the current subscriber list.
///
/// Failure here is `MonitorError::Infrastructure`: the dispatcher cannot even
/// start a fan-out without the list.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, MonitorError>;
}
