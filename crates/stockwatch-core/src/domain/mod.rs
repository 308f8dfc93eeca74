//! Domain model (IDs, tasks, states, alerts, snapshots, errors).

pub mod alert;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod snapshot;
pub mod state;
pub mod task;

pub use alert::{ProductAlert, ProductInfo};
pub use errors::{AutomationError, MonitorError};
pub use ids::{DispatchId, TaskId};
pub use outcome::NotificationOutcome;
pub use snapshot::{ActiveTaskSnapshot, SnapshotEntry};
pub use state::MonitoringState;
pub use task::{MonitoringTask, validate_request};
