// Keeps the latest snapshot in memory for the HTTP read surface
use crate::application::ports::SnapshotSink;
use crate::domain::snapshot::{Snapshot, SnapshotKey};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    latest: Arc<RwLock<Option<Snapshot>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn latest(&self) -> Option<Snapshot> {
        self.latest.read().await.clone()
    }
}

#[async_trait]
impl SnapshotSink for MemorySink {
    async fn publish(&self, key: &SnapshotKey, snapshot: &Snapshot) -> anyhow::Result<()> {
        // Archival keys are served from disk, not memory
        if *key == SnapshotKey::Latest {
            *self.latest.write().await = Some(snapshot.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::now_jst;

    #[tokio::test]
    async fn test_keeps_only_latest() {
        let sink = MemorySink::new();
        assert!(sink.latest().await.is_none());

        let first = Snapshot::assemble(vec![], now_jst());
        sink.publish(&SnapshotKey::Latest, &first).await.unwrap();
        let hourly = Snapshot::assemble(vec![], now_jst());
        sink.publish(&SnapshotKey::Hourly("2024010100".to_string()), &hourly).await.unwrap();

        assert_eq!(sink.latest().await, Some(first));
    }
}
