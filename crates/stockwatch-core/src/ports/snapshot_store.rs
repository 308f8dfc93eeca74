//! SnapshotStore port - 永続化の抽象化

use async_trait::async_trait;

use crate::domain::{ActiveTaskSnapshot, MonitorError};

/// Durable storage for the active-task snapshot.
///
/// Contract:
/// - `load` degrades to an empty snapshot on missing or malformed data,
///   never an error (bad state must not block startup).
/// - `save` is atomic from a reader's perspective; its failure is reported
///   as `Infrastructure`, never a crash.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> ActiveTaskSnapshot;

    async fn save(&self, snapshot: &ActiveTaskSnapshot) -> Result<(), MonitorError>;
}
