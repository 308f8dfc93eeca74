//! NotificationDispatcher - 1つのアラートを N 人の subscriber へファンアウト
//!
//! # フロー
//! 1. SubscriberDirectory から現在のリストを読む（キャッシュしない）
//! 2. subscriber ごとに送信タスクを spawn（scatter）
//! 3. 全員分の完了を待って outcome を集める（gather）
//!
//! 遅い/失敗する受信者が他の受信者をブロックしない。受信者単位の失敗は
//! outcome に記録されるだけで、この層からエラーとしては出ていかない。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{MonitorError, NotificationOutcome, ProductAlert};
use crate::ports::{IdGenerator, MessageChannel, SubscriberDirectory};

pub struct NotificationDispatcher {
    directory: Arc<dyn SubscriberDirectory>,
    channel: Arc<dyn MessageChannel>,
    ids: Arc<dyn IdGenerator>,
}

impl NotificationDispatcher {
    pub fn new(
        directory: Arc<dyn SubscriberDirectory>,
        channel: Arc<dyn MessageChannel>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            directory,
            channel,
            ids,
        }
    }

    /// One best-effort fan-out for one availability event.
    ///
    /// Returns one outcome per subscriber, in directory order. The only error
    /// path is failing to load the list itself (`Infrastructure`).
    pub async fn dispatch(
        &self,
        alert: &ProductAlert,
    ) -> Result<Vec<NotificationOutcome>, MonitorError> {
        let dispatch_id = self.ids.generate_dispatch_id();
        let subscribers = self.directory.list_subscribers().await?;

        if subscribers.is_empty() {
            debug!(%dispatch_id, "no subscribers, nothing to send");
            return Ok(Vec::new());
        }

        let body = Arc::new(alert.message_body());

        let mut sends = Vec::with_capacity(subscribers.len());
        for subscriber in &subscribers {
            let channel = Arc::clone(&self.channel);
            let body = Arc::clone(&body);
            let chat_id = subscriber.chat_id;
            sends.push(tokio::spawn(async move {
                channel.send(chat_id, &body).await
            }));
        }

        // Join in spawn order so the outcome order matches the directory.
        let mut outcomes = Vec::with_capacity(sends.len());
        for (subscriber, send) in subscribers.iter().zip(sends) {
            let outcome = match send.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    NotificationOutcome::failed(subscriber.chat_id, format!("send task failed: {e}"))
                }
            };
            if outcome.success {
                info!(%dispatch_id, chat_id = outcome.chat_id, "notification sent");
            } else {
                warn!(
                    %dispatch_id,
                    chat_id = outcome.chat_id,
                    detail = %outcome.detail,
                    "notification failed"
                );
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
