//! TaskManager - ワーカーの registry と lifecycle 操作
//!
//! # 設計
//! - registry は `Mutex<HashMap<TaskId, WorkerHandle>>`。ロックは map の
//!   insert/remove/lookup の間だけ保持し、join や automation 呼び出しを
//!   跨いで持たない。
//! - live な task id につき worker はちょうど1つ（ULID が再利用されないため、
//!   insert の衝突は起こらない）。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::status::TaskCounts;
use crate::app::worker::{MonitorWorker, WorkerExit};
use crate::app::NotificationDispatcher;
use crate::domain::{
    ActiveTaskSnapshot, MonitorError, MonitoringState, MonitoringTask, SnapshotEntry, TaskId,
    validate_request,
};
use crate::ports::{AutomationLauncher, IdGenerator, StatusSink};

/// Aggregate result of `stop_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopReport {
    /// Workers that reached a terminal state cleanly.
    pub stopped: usize,
    /// Workers whose cleanup failed or that panicked during shutdown.
    pub failed: usize,
}

struct WorkerHandle {
    task: MonitoringTask,
    cancel: CancellationToken,
    state: watch::Receiver<MonitoringState>,
    join: JoinHandle<WorkerExit>,
}

/// Creates, tracks and stops MonitorWorkers, one per task id.
pub struct TaskManager {
    launcher: Arc<dyn AutomationLauncher>,
    sink: Arc<dyn StatusSink>,
    dispatcher: Arc<NotificationDispatcher>,
    ids: Arc<dyn IdGenerator>,
    registry: Mutex<HashMap<TaskId, WorkerHandle>>,
}

impl TaskManager {
    pub fn new(
        launcher: Arc<dyn AutomationLauncher>,
        sink: Arc<dyn StatusSink>,
        dispatcher: Arc<NotificationDispatcher>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            launcher,
            sink,
            dispatcher,
            ids,
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Validate, create and begin one monitoring task.
    ///
    /// On `Validation` error nothing is allocated and the registry is
    /// untouched.
    pub async fn start_task(
        &self,
        url: &str,
        interval_secs: u64,
    ) -> Result<TaskId, MonitorError> {
        validate_request(url, interval_secs)?;

        let id = self.ids.generate_task_id();
        let task = MonitoringTask::new(id, url.trim(), Duration::from_secs(interval_secs));
        let cancel = CancellationToken::new();

        let (worker, state) = MonitorWorker::new(
            task.clone(),
            Arc::clone(&self.launcher),
            Arc::clone(&self.sink),
            Arc::clone(&self.dispatcher),
            cancel.clone(),
        );
        let join = tokio::spawn(worker.run());

        let handle = WorkerHandle {
            task,
            cancel,
            state,
            join,
        };
        let previous = self.registry.lock().await.insert(id, handle);
        debug_assert!(previous.is_none(), "task id reused: {id}");

        info!(task = %id, url, interval_secs, "monitoring task started");
        Ok(id)
    }

    /// Cooperative stop of one task. Idempotent: an unknown id is recorded
    /// and swallowed (stopping an already-gone task is not a caller error).
    pub async fn stop_task(&self, id: TaskId) {
        let handle = self.registry.lock().await.remove(&id);
        let Some(handle) = handle else {
            debug!(error = %MonitorError::NotFound(id), "stop requested for unknown task");
            return;
        };

        handle.cancel.cancel();
        match handle.join.await {
            Ok(exit) => {
                info!(task = %id, state = exit.final_state.tag(), "monitoring task stopped")
            }
            Err(e) => warn!(task = %id, error = %e, "worker did not shut down cleanly"),
        }
    }

    /// Stop everything and wait for every worker to reach a terminal state.
    ///
    /// One worker's cleanup failure never prevents stopping the others; the
    /// report says how many went down cleanly.
    pub async fn stop_all(&self) -> StopReport {
        let handles: Vec<(TaskId, WorkerHandle)> = {
            let mut registry = self.registry.lock().await;
            registry.drain().collect()
        };

        // Signal first so every worker winds down concurrently...
        for (_, handle) in &handles {
            handle.cancel.cancel();
        }

        // ...then join on each of them (an explicit barrier, not fire-and-forget).
        let mut report = StopReport::default();
        for (id, handle) in handles {
            match handle.join.await {
                Ok(exit) => {
                    if let Some(e) = exit.cleanup_error {
                        warn!(task = %id, error = %e, "cleanup failed during shutdown");
                        report.failed += 1;
                    } else {
                        report.stopped += 1;
                    }
                }
                Err(e) => {
                    warn!(task = %id, error = %e, "worker panicked during shutdown");
                    report.failed += 1;
                }
            }
        }

        info!(stopped = report.stopped, failed = report.failed, "all monitoring tasks stopped");
        report
    }

    /// Recreate tasks from a persisted snapshot, each with a fresh id.
    /// A bad entry is skipped, never aborts the rest. Returns how many started.
    pub async fn restore(&self, snapshot: ActiveTaskSnapshot) -> usize {
        let mut restored = 0;
        for entry in snapshot {
            match self.start_task(&entry.url, entry.interval).await {
                Ok(id) => {
                    debug!(task = %id, url = %entry.url, "task restored");
                    restored += 1;
                }
                Err(e) => {
                    warn!(url = %entry.url, error = %e, "skipping unrestorable task");
                }
            }
        }
        info!(restored, "restore finished");
        restored
    }

    /// Current snapshot of tasks still in a monitoring state, ordered by
    /// task id (ULIDs sort by creation time).
    pub async fn snapshot(&self) -> ActiveTaskSnapshot {
        let registry = self.registry.lock().await;
        let mut active: Vec<(TaskId, SnapshotEntry)> = registry
            .iter()
            .filter(|(_, handle)| handle.state.borrow().is_active())
            .map(|(id, handle)| (*id, SnapshotEntry::from(&handle.task)))
            .collect();
        active.sort_by_key(|(id, _)| *id);
        ActiveTaskSnapshot::new(active.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Registry-wide counts by current worker state.
    pub async fn counts(&self) -> TaskCounts {
        let registry = self.registry.lock().await;
        let mut counts = TaskCounts::default();
        for handle in registry.values() {
            counts.record(*handle.state.borrow());
        }
        counts
    }

    /// Release registry slots whose worker has finished on its own
    /// (Completed is the worker's signal that its slot can go).
    pub async fn reap_completed(&self) -> usize {
        let finished: Vec<(TaskId, WorkerHandle)> = {
            let mut registry = self.registry.lock().await;
            let ids: Vec<TaskId> = registry
                .iter()
                .filter(|(_, h)| *h.state.borrow() == MonitoringState::Completed)
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter()
                .filter_map(|id| registry.remove(&id).map(|h| (id, h)))
                .collect()
        };

        let reaped = finished.len();
        for (id, handle) in finished {
            // Completed means run() has returned; this join is immediate.
            if let Err(e) = handle.join.await {
                warn!(task = %id, error = %e, "finished worker had panicked");
            }
        }
        reaped
    }

    /// Number of registered workers, terminal or not.
    pub async fn registered_count(&self) -> usize {
        self.registry.lock().await.len()
    }
}
