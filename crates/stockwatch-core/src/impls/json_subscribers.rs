//! JsonSubscriberDirectory - subscriber リストの JSON ファイル読み出し
//!
//! リストは登録ボットが所有・更新する。dispatcher が最新を見られるよう、
//! 呼び出しのたびにファイルを読み直す。
//!
//! ファイルが無い = まだ誰も登録していない（空リスト）。存在するのに
//! 読めない/壊れているのはインフラ障害として上げる。

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::MonitorError;
use crate::ports::{Subscriber, SubscriberDirectory};

pub struct JsonSubscriberDirectory {
    path: PathBuf,
}

impl JsonSubscriberDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SubscriberDirectory for JsonSubscriberDirectory {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, MonitorError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(MonitorError::Infrastructure(format!(
                    "read subscriber list {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            MonitorError::Infrastructure(format!(
                "parse subscriber list {}: {e}",
                self.path.display()
            ))
        })
    }
}
