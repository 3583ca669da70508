// Snapshot service - One acquisition/reduction/publication run
use crate::application::ports::{LineSource, MappingSource, SnapshotSink};
use crate::application::sample_reducer::reduce;
use crate::application::utilization::finalize;
use crate::domain::line_mapping::LineMapping;
use crate::domain::raw_record::AreaBatch;
use crate::domain::snapshot::{JST, Snapshot, SnapshotKey, now_jst};
use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use futures::future::join_all;
use std::sync::Arc;

/// Outcome of a run, for logging by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub lines: usize,
    pub areas_ok: usize,
    pub areas_failed: usize,
    pub hour_key: String,
}

#[derive(Clone)]
pub struct SnapshotService {
    source: Arc<dyn LineSource>,
    mapping_source: Arc<dyn MappingSource>,
    sinks: Vec<Arc<dyn SnapshotSink>>,
    areas: Vec<String>,
}

impl SnapshotService {
    pub fn new(
        source: Arc<dyn LineSource>,
        mapping_source: Arc<dyn MappingSource>,
        sinks: Vec<Arc<dyn SnapshotSink>>,
        areas: Vec<String>,
    ) -> Self {
        Self {
            source,
            mapping_source,
            sinks,
            areas,
        }
    }

    /// Run against the current wall clock.
    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        self.run_at(now_jst()).await
    }

    /// Fetch every area, reduce, finalize and publish one snapshot.
    ///
    /// Mapping and per-area failures only reduce coverage; a failing sink
    /// fails the run.
    pub async fn run_at(&self, now: DateTime<FixedOffset>) -> anyhow::Result<RunSummary> {
        let mapping = self.load_mapping().await;
        let (snapshot, areas_ok) = self.build_snapshot(&mapping, now).await;

        self.publish(&snapshot).await?;

        let summary = RunSummary {
            lines: snapshot.lines.len(),
            areas_ok,
            areas_failed: self.areas.len() - areas_ok,
            hour_key: snapshot.hour_key(),
        };
        tracing::info!(
            lines = summary.lines,
            areas_ok = summary.areas_ok,
            areas_failed = summary.areas_failed,
            ts = %snapshot.timestamp(),
            hour = %summary.hour_key,
            "snapshot updated"
        );
        Ok(summary)
    }

    /// Build a snapshot without publishing it. Returns the snapshot and the
    /// number of areas that were fetched successfully.
    pub async fn build_snapshot(&self, mapping: &LineMapping, now: DateTime<FixedOffset>) -> (Snapshot, usize) {
        let date = now.with_timezone(&JST).date_naive();

        // Fetch concurrently, reduce sequentially in configured area order
        let fetches = self.areas.iter().map(|area| async move {
            let result = self.source.fetch_area(area, date).await;
            (area.as_str(), result)
        });
        let results = join_all(fetches).await;

        let mut batches = Vec::with_capacity(results.len());
        for (area, result) in results {
            match result {
                Ok(records) => batches.push(AreaBatch::new(area, records)),
                Err(e) => {
                    let error = error_chain(&e);
                    tracing::warn!(area, error = %error, "area fetch failed, skipping");
                }
            }
        }

        let lines = finalize(reduce(mapping, &batches));
        (Snapshot::assemble(lines, now), batches.len())
    }

    async fn load_mapping(&self) -> LineMapping {
        match self.mapping_source.load_mapping().await {
            Ok(mapping) => {
                tracing::debug!(entries = mapping.len(), "line mapping loaded");
                mapping
            }
            Err(e) => {
                let error = error_chain(&e);
                tracing::warn!(error = %error, "line mapping unavailable, using external names");
                LineMapping::empty()
            }
        }
    }

    async fn publish(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let keys = [SnapshotKey::Latest, SnapshotKey::hourly_for(snapshot)];
        for sink in &self.sinks {
            for key in &keys {
                sink.publish(key, snapshot)
                    .await
                    .with_context(|| format!("Failed to publish snapshot to {:?}", key))?;
            }
        }
        Ok(())
    }
}

/// Full `context: cause` chain of an error, on one line.
fn error_chain(e: &anyhow::Error) -> String {
    format!("{:#}", e)
}
