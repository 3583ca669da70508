// Snapshot persistence as pretty-printed JSON files
use crate::application::ports::SnapshotSink;
use crate::domain::snapshot::{Snapshot, SnapshotKey};
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

/// Writes `<dir>/<latest_file>` and `<dir>/<YYYYMMDDHH>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
    latest_file: String,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>, latest_file: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            latest_file: latest_file.into(),
        }
    }

    pub fn path_for(&self, key: &SnapshotKey) -> PathBuf {
        match key {
            SnapshotKey::Latest => self.dir.join(&self.latest_file),
            SnapshotKey::Hourly(hour) => self.dir.join(format!("{}.json", hour)),
        }
    }
}

#[async_trait]
impl SnapshotSink for JsonFileSink {
    async fn publish(&self, key: &SnapshotKey, snapshot: &Snapshot) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("unable to create output directory {}", self.dir.display()))?;

        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("unable to write snapshot {}", path.display()))?;

        tracing::debug!(path = %path.display(), lines = snapshot.lines.len(), "snapshot written");
        Ok(())
    }
}
