// Collaborator traits the snapshot pipeline depends on
use crate::domain::line_mapping::LineMapping;
use crate::domain::raw_record::RawRecord;
use crate::domain::snapshot::{Snapshot, SnapshotKey};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of raw telemetry rows, one area at a time.
#[async_trait]
pub trait LineSource: Send + Sync {
    /// Fetch every published row for `area` on `date`.
    async fn fetch_area(&self, area: &str, date: NaiveDate) -> anyhow::Result<Vec<RawRecord>>;
}

/// Source of the area/external-name to canonical ID table.
#[async_trait]
pub trait MappingSource: Send + Sync {
    async fn load_mapping(&self) -> anyhow::Result<LineMapping>;
}

/// Destination for finished snapshots.
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn publish(&self, key: &SnapshotKey, snapshot: &Snapshot) -> anyhow::Result<()>;
}
