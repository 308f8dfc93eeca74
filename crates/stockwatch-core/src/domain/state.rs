//! MonitoringState - ワーカーの状態
//!
//! # 状態遷移
//! - initializing: ブラウザセッション起動・URL オープン中
//! - searching: 在庫ありになるのを監視中
//! - available: 在庫検出、購入アクション実行中
//! - notify_pending: 通知ファンアウト実行中
//! - cooldown: 在庫なしに戻るのを監視中（次の rising edge 待ち）
//! - stopped: 明示的キャンセルによる終了
//! - error: 回復不能なセッション障害による終了
//! - completed: リソース解放後の最終状態（registry slot 解放の合図）

use serde::{Deserialize, Serialize};

/// Runtime state of one MonitorWorker.
///
/// Owned exclusively by the worker that drives it; everyone else (registry,
/// sinks) only reads it through a watch channel. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringState {
    Initializing,
    Searching,
    Available,
    NotifyPending,
    Cooldown,
    Stopped,
    Error,
    Completed,
}

impl MonitoringState {
    /// Terminal states. A worker in one of these will never transition again
    /// (Completed follows Stopped/Error after cleanup).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Error | Self::Completed)
    }

    /// States that count as "still monitoring" for the shutdown snapshot.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Searching | Self::Available | Self::NotifyPending | Self::Cooldown
        )
    }

    /// Discrete tag for sinks/logs. Stable, snake_case, not free text.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Searching => "searching",
            Self::Available => "available",
            Self::NotifyPending => "notify_pending",
            Self::Cooldown => "cooldown",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for MonitoringState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
