//! MonitorWorker - 1タスクを creation から terminal state まで駆動する
//!
//! # 状態機械
//! ```text
//! Initializing ─→ Searching ─→ Available ─→ NotifyPending ─→ Cooldown
//!      │              ↑                                          │
//!      │              └──────────── 在庫なしに戻ったら ←──────────┘
//!      ↓
//!    Error / Stopped ─→ Completed
//! ```
//!
//! - rising edge（在庫なし→あり）1回につき dispatch はちょうど1回
//! - キャンセルはどの suspension point でも観測され、1 polling tick 以内に効く
//! - Initializing に戻る経路はない（遷移は単調）

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::app::NotificationDispatcher;
use crate::domain::{AutomationError, MonitoringState, MonitoringTask, ProductAlert, ProductInfo};
use crate::ports::{AutomationLauncher, PageAutomation, StatusSink};

/// How one worker ended, for `stop_all` aggregation.
///
/// `final_state` is the terminal state reached before cleanup (Stopped or
/// Error); a close failure is recorded separately and does not change it.
#[derive(Debug)]
pub struct WorkerExit {
    pub final_state: MonitoringState,
    pub cleanup_error: Option<AutomationError>,
}

/// One monitoring task's driver. Owns its page session and its state.
pub struct MonitorWorker {
    task: MonitoringTask,
    launcher: Arc<dyn AutomationLauncher>,
    sink: Arc<dyn StatusSink>,
    dispatcher: Arc<NotificationDispatcher>,
    cancel: CancellationToken,
    state_tx: watch::Sender<MonitoringState>,
}

impl MonitorWorker {
    /// Build a worker plus the receiver the registry uses to observe it.
    pub fn new(
        task: MonitoringTask,
        launcher: Arc<dyn AutomationLauncher>,
        sink: Arc<dyn StatusSink>,
        dispatcher: Arc<NotificationDispatcher>,
        cancel: CancellationToken,
    ) -> (Self, watch::Receiver<MonitoringState>) {
        let (state_tx, state_rx) = watch::channel(MonitoringState::Initializing);
        let worker = Self {
            task,
            launcher,
            sink,
            dispatcher,
            cancel,
            state_tx,
        };
        (worker, state_rx)
    }

    /// Drive the task to a terminal state. Runs until cancellation, an
    /// unrecoverable session failure, or never (monitoring is indefinite).
    pub async fn run(self) -> WorkerExit {
        let task_id = self.task.id;
        self.transition(MonitoringState::Initializing);

        let mut page = match self.launcher.launch().await {
            Ok(page) => page,
            Err(e) => {
                error!(task = %task_id, error = %e, "failed to launch automation session");
                self.transition(MonitoringState::Error);
                self.transition(MonitoringState::Completed);
                return WorkerExit {
                    final_state: MonitoringState::Error,
                    cleanup_error: None,
                };
            }
        };

        let final_state = match self.drive(page.as_mut()).await {
            Ok(()) => {
                info!(task = %task_id, "monitoring stopped by request");
                MonitoringState::Stopped
            }
            Err(e) => {
                error!(task = %task_id, error = %e, "monitoring failed");
                MonitoringState::Error
            }
        };
        self.transition(final_state);

        let cleanup_error = page.close().await.err();
        if let Some(e) = &cleanup_error {
            warn!(task = %task_id, error = %e, "session cleanup failed");
        }
        self.transition(MonitoringState::Completed);

        WorkerExit {
            final_state,
            cleanup_error,
        }
    }

    /// The monitoring loop proper. `Ok(())` means cancellation was observed;
    /// `Err` is an unrecoverable session failure.
    async fn drive(&self, page: &mut dyn PageAutomation) -> Result<(), AutomationError> {
        page.open(&self.task.url).await?;

        // A missing title is not worth killing the task over.
        let info = match page.product_info().await {
            Ok(info) => info,
            Err(e) => {
                warn!(task = %self.task.id, error = %e, "could not scrape product info");
                ProductInfo {
                    title: "Unknown".to_string(),
                    ..ProductInfo::default()
                }
            }
        };
        self.sink.on_product_title(self.task.id, &info.title);

        loop {
            // Watch for the product becoming available.
            self.transition(MonitoringState::Searching);
            loop {
                if self.cancel.is_cancelled() {
                    return Ok(());
                }
                if page.is_available().await? {
                    break;
                }
                if !self.pause().await {
                    return Ok(());
                }
            }

            // Rising edge: buy, then notify, unconditionally in that order.
            self.transition(MonitoringState::Available);
            let purchased = match page.purchase().await {
                Ok(clicked) => clicked,
                Err(e) => {
                    // A failed purchase must not swallow the notification.
                    warn!(task = %self.task.id, error = %e, "purchase attempt failed");
                    false
                }
            };

            self.transition(MonitoringState::NotifyPending);
            self.notify(&info, purchased).await;

            // Watch for the product selling out again so the next restock
            // triggers a fresh cycle.
            self.transition(MonitoringState::Cooldown);
            loop {
                if self.cancel.is_cancelled() {
                    return Ok(());
                }
                if !page.is_available().await? {
                    debug!(task = %self.task.id, "product unavailable again, rearming");
                    break;
                }
                if !self.pause().await {
                    return Ok(());
                }
            }
        }
    }

    /// Single best-effort fan-out for one availability event. Never retried,
    /// never escalated to a worker-level error.
    async fn notify(&self, info: &ProductInfo, purchased: bool) {
        let stock = info
            .stock_detail
            .clone()
            .unwrap_or_else(|| "In stock".to_string());
        let stock = if purchased {
            format!("{stock} (added to cart)")
        } else {
            format!("{stock} (cart attempt failed)")
        };
        let alert = ProductAlert::new(&info.title, &self.task.url, stock);

        match self.dispatcher.dispatch(&alert).await {
            Ok(outcomes) => {
                let failed = outcomes.iter().filter(|o| !o.success).count();
                if failed > 0 {
                    warn!(
                        task = %self.task.id,
                        sent = outcomes.len() - failed,
                        failed,
                        "notification fan-out partially failed"
                    );
                }
                self.sink.on_dispatch(self.task.id, &outcomes);
            }
            Err(e) => {
                warn!(task = %self.task.id, error = %e, "notification dispatch failed");
                self.sink.on_dispatch(self.task.id, &[]);
            }
        }
    }

    /// Interval sleep that races the cancellation token.
    /// Returns `false` when cancelled, so stop latency is at most one tick.
    async fn pause(&self) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(self.task.interval) => true,
        }
    }

    fn transition(&self, state: MonitoringState) {
        debug!(task = %self.task.id, state = state.tag(), "transition");
        // send_replace: the worker keeps running even if nobody watches.
        self.state_tx.send_replace(state);
        self.sink.on_transition(self.task.id, state);
    }
}
