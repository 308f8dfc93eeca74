//! StatusSink port - 状態表示の抽象化
//!
//! core はレンダリング技術を知らない。UI はこの narrow interface の
//! 向こう側に注入される。

use crate::domain::{MonitoringState, NotificationOutcome, TaskId};

/// Receives worker progress. Fire-and-forget: implementations must return
/// quickly and must not fail; a sink that blocks stalls its worker.
pub trait StatusSink: Send + Sync {
    /// Every state transition, with the discrete tag (never free text).
    fn on_transition(&self, task_id: TaskId, state: MonitoringState);

    /// Product title once the page has been scraped.
    fn on_product_title(&self, _task_id: TaskId, _title: &str) {}

    /// Fan-out result for one availability event.
    fn on_dispatch(&self, _task_id: TaskId, _outcomes: &[NotificationOutcome]) {}
}

/// Sink that ignores everything (headless runs, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusSink;

impl StatusSink for NoopStatusSink {
    fn on_transition(&self, _task_id: TaskId, _state: MonitoringState) {}
}
