//! JsonSnapshotStore - アクティブタスクの JSON ファイル永続化
//!
//! # フォーマット
//! `[{"url": "...", "interval": 30}, ...]` の配列。欠損・壊れたファイルは
//! 「アクティブタスクなし」に degrade する（起動を止めない）。
//!
//! # 書き込み
//! 同じディレクトリの一時ファイルに書いてから rename する。読む側が
//! 書きかけのファイルを観測することはない。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::{ActiveTaskSnapshot, MonitorError};
use crate::ports::SnapshotStore;

pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self) -> ActiveTaskSnapshot {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no snapshot file, starting empty");
                return ActiveTaskSnapshot::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read snapshot");
                return ActiveTaskSnapshot::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "snapshot file is malformed, treating as empty"
                );
                ActiveTaskSnapshot::default()
            }
        }
    }

    async fn save(&self, snapshot: &ActiveTaskSnapshot) -> Result<(), MonitorError> {
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| MonitorError::Infrastructure(format!("encode snapshot: {e}")))?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, &json)
            .await
            .map_err(|e| MonitorError::Infrastructure(format!("write snapshot: {e}")))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| MonitorError::Infrastructure(format!("replace snapshot: {e}")))?;

        info!(path = %self.path.display(), tasks = snapshot.len(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SnapshotEntry;
    use tempfile::tempdir;

    fn snapshot() -> ActiveTaskSnapshot {
        ActiveTaskSnapshot::new(vec![
            SnapshotEntry {
                url: "https://shop.tiktok.com/view/product/1".into(),
                interval: 30,
            },
            SnapshotEntry {
                url: "https://shop.tiktok.com/view/product/2".into(),
                interval: 5,
            },
        ])
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("active_tasks.json"));

        store.save(&snapshot()).await.unwrap();
        let loaded = store.load().await;

        assert_eq!(loaded, snapshot());
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("never_written.json"));

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("active_tasks.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = JsonSnapshotStore::new(&path);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn save_overwrites_previous_snapshot() {
        let dir = tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("active_tasks.json"));

        store.save(&snapshot()).await.unwrap();
        let smaller = ActiveTaskSnapshot::new(vec![SnapshotEntry {
            url: "https://shop.tiktok.com/view/product/3".into(),
            interval: 60,
        }]);
        store.save(&smaller).await.unwrap();

        assert_eq!(store.load().await, smaller);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("active_tasks.json"));

        store.save(&snapshot()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["active_tasks.json".to_string()]);
    }

    #[tokio::test]
    async fn save_into_missing_directory_reports_infrastructure() {
        let dir = tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("no_such_dir").join("x.json"));

        let err = store.save(&snapshot()).await.unwrap_err();
        assert!(matches!(err, MonitorError::Infrastructure(_)));
    }
}
