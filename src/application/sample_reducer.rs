// Folds per-area rows into one current state per canonical line
use crate::domain::field_spec::{Field, FieldSpec};
use crate::domain::line_mapping::LineMapping;
use crate::domain::line_state::LineState;
use crate::domain::raw_record::{AreaBatch, RawRecord, parse_number};
use indexmap::IndexMap;

/// A line state plus the raw time key of the sample it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedLine {
    pub state: LineState,
    pub time_key: String,
}

/// Accumulator for one run. Lines keep first-seen order.
pub struct SampleReducer<'a> {
    mapping: &'a LineMapping,
    lines: IndexMap<String, TrackedLine>,
    skipped: usize,
}

impl<'a> SampleReducer<'a> {
    pub fn new(mapping: &'a LineMapping) -> Self {
        Self {
            mapping,
            lines: IndexMap::new(),
            skipped: 0,
        }
    }

    /// Fold one area's rows. Columns are detected from the first row only.
    pub fn absorb(&mut self, area: &str, records: &[RawRecord]) {
        let Some(sample) = records.first() else {
            tracing::debug!(area, "area returned no rows");
            return;
        };
        let spec = FieldSpec::detect(sample);
        let skipped_before = self.skipped;

        for record in records {
            self.absorb_record(area, &spec, record);
        }

        tracing::debug!(
            area,
            rows = records.len(),
            skipped = self.skipped - skipped_before,
            "absorbed area batch"
        );
    }

    fn absorb_record(&mut self, batch_area: &str, spec: &FieldSpec, record: &RawRecord) {
        let external = spec.value(record, Field::LineId).unwrap_or_default().trim();
        if external.is_empty() {
            self.skipped += 1;
            return;
        }

        let area = spec
            .value(record, Field::Area)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(batch_area);
        let line_id = self.mapping.resolve(area, external);

        let power_mw = parse_number(spec.value(record, Field::Power));
        let capacity_mw = if spec.capacity.is_some() {
            parse_number(spec.value(record, Field::Capacity))
        } else {
            self.mapping.fallback_capacity(area, external).unwrap_or(0.0)
        };
        let time_key = spec
            .value(record, Field::Time)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let candidate = TrackedLine {
            state: LineState::from_sample(line_id.clone(), power_mw, capacity_mw),
            time_key,
        };
        self.merge(line_id, candidate);
    }

    /// Keep the newest sample per line. Equal keys go to the later sample.
    fn merge(&mut self, line_id: String, candidate: TrackedLine) {
        match self.lines.get_mut(&line_id) {
            Some(existing) => {
                if existing.time_key <= candidate.time_key {
                    *existing = candidate;
                }
            }
            None => {
                self.lines.insert(line_id, candidate);
            }
        }
    }

    /// Rows dropped because they carried no line name.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_lines(self) -> IndexMap<String, TrackedLine> {
        self.lines
    }
}

/// Reduce batches in the given order.
pub fn reduce(mapping: &LineMapping, batches: &[AreaBatch]) -> IndexMap<String, TrackedLine> {
    let mut reducer = SampleReducer::new(mapping);
    for batch in batches {
        reducer.absorb(&batch.area, &batch.records);
    }
    let skipped = reducer.skipped();
    let lines = reducer.into_lines();
    tracing::debug!(areas = batches.len(), lines = lines.len(), skipped, "reduced area batches");
    lines
}
