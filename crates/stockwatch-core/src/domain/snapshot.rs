//! ActiveTaskSnapshot - シャットダウン時に永続化される形
//!
//! 永続化されるのは `{url, interval}` のみ。task id と状態は意図的に
//! 保存しない: restore では新しい id で作り直し、Initializing から始まる。

use serde::{Deserialize, Serialize};

use crate::domain::MonitoringTask;

/// One persisted task: the wire shape is `{"url": string, "interval": integer}`
/// with interval in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub url: String,
    pub interval: u64,
}

impl From<&MonitoringTask> for SnapshotEntry {
    fn from(task: &MonitoringTask) -> Self {
        Self {
            url: task.url.clone(),
            interval: task.interval_secs(),
        }
    }
}

/// Ordered set of tasks considered still active at snapshot time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveTaskSnapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl ActiveTaskSnapshot {
    pub fn new(entries: Vec<SnapshotEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl IntoIterator for ActiveTaskSnapshot {
    type Item = SnapshotEntry;
    type IntoIter = std::vec::IntoIter<SnapshotEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
