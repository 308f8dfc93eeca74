//! IdGenerator port - ID 生成の抽象化
//!
//! task id の一意性（プロセス内で再利用しない）はここで担保する。
//! テスト容易性のために trait として抽象化しています。

use ulid::Ulid;

use crate::domain::ids::{DispatchId, TaskId};
use crate::ports::Clock;

/// IdGenerator generates fresh, never-reused identifiers.
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数スレッドから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;

    fn generate_dispatch_id(&self) -> DispatchId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// これにより、テスト時に FixedClock を使って決定的な timestamp 部分を持つ
/// ID を生成できます。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        TaskId::from(self.next())
    }

    fn generate_dispatch_id(&self) -> DispatchId {
        DispatchId::from(self.next())
    }
}
