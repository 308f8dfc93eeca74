//! Application logic (worker state machine, task registry, fan-out).

pub mod dispatch;
pub mod manager;
pub mod status;
pub mod worker;

pub use dispatch::NotificationDispatcher;
pub use manager::{StopReport, TaskManager};
pub use status::TaskCounts;
pub use worker::{MonitorWorker, WorkerExit};
