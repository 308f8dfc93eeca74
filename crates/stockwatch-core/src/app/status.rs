//! Per-state counts for observability.

use serde::{Deserialize, Serialize};

use crate::domain::MonitoringState;

/// Registry-wide worker counts, keyed by current state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub initializing: usize,
    pub searching: usize,
    pub available: usize,
    pub notify_pending: usize,
    pub cooldown: usize,
    pub stopped: usize,
    pub error: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn record(&mut self, state: MonitoringState) {
        match state {
            MonitoringState::Initializing => self.initializing += 1,
            MonitoringState::Searching => self.searching += 1,
            MonitoringState::Available => self.available += 1,
            MonitoringState::NotifyPending => self.notify_pending += 1,
            MonitoringState::Cooldown => self.cooldown += 1,
            MonitoringState::Stopped => self.stopped += 1,
            MonitoringState::Error => self.error += 1,
            MonitoringState::Completed => self.completed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.initializing
            + self.searching
            + self.available
            + self.notify_pending
            + self.cooldown
            + self.stopped
            + self.error
            + self.completed
    }
}
