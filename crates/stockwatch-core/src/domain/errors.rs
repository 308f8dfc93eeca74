//! Error taxonomy.
//!
//! # 分類
//! - Validation: start_task への不正入力（リソース割り当て前に拒否）
//! - Automation: ページ/ブラウザセッション障害（該当ワーカーのみ terminal）
//! - Infrastructure: 永続化・subscriber directory 障害（報告のみ、プロセスは継続）
//! - NotFound: 未知の task id への操作（呼び出し側には no-op）

use thiserror::Error;

use crate::domain::TaskId;

/// Failure inside the page automation session.
///
/// Always isolates to the worker that owns the session; it never propagates
/// to the manager or to other workers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("automation: {0}")]
pub struct AutomationError(pub String);

impl AutomationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Bad input to `start_task`; rejected before any worker is created.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Page/browser session failure, terminal for the affected worker only.
    #[error(transparent)]
    Automation(#[from] AutomationError),

    /// Persistence or subscriber directory unreachable. Reported, not fatal.
    #[error("infrastructure: {0}")]
    Infrastructure(String),

    /// Operation on an unknown task id. Logged, silent no-op for the caller.
    #[error("unknown task: {0}")]
    NotFound(TaskId),
}
