// Column detection tolerant to header naming drift between areas
use super::raw_record::RawRecord;

/// Semantic columns a batch may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Area,
    LineId,
    Power,
    Capacity,
    Time,
}

/// Candidate substrings per field, in priority order. Matching is done on the
/// lowercased header, so candidates are written lowercase.
const CANDIDATES: &[(Field, &[&str])] = &[
    (Field::Area, &["対象エリア", "area"]),
    (Field::LineId, &["送電線名", "設備", "line", "name", "id"]),
    (Field::Power, &["潮流", "p(mw)", "p_mw", "mw", "power"]),
    (Field::Capacity, &["運用容量", "容量", "capacity"]),
    (Field::Time, &["時刻", "time", "timestamp", "時分"]),
];

/// Resolved column names for one batch. `None` means the batch has no such column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    pub area: Option<String>,
    pub line_id: Option<String>,
    pub power: Option<String>,
    pub capacity: Option<String>,
    pub time: Option<String>,
}

impl FieldSpec {
    /// Detect columns from a sample record.
    ///
    /// Each field is resolved independently: the first header (in the record's
    /// own column order) whose lowercased form contains any of the field's
    /// candidates wins. A header may therefore satisfy more than one field,
    /// e.g. `capacity_mw` placed before `p_mw` is also picked as power.
    pub fn detect(sample: &RawRecord) -> Self {
        let headers: Vec<(&str, String)> = sample.keys().map(|k| (k, k.to_lowercase())).collect();

        let mut spec = FieldSpec::default();
        for (field, candidates) in CANDIDATES {
            let found = headers
                .iter()
                .find(|(_, lower)| candidates.iter().any(|c| lower.contains(c)))
                .map(|(orig, _)| orig.to_string());
            *spec.slot_mut(*field) = found;
        }
        spec
    }

    pub fn column(&self, field: Field) -> Option<&str> {
        match field {
            Field::Area => self.area.as_deref(),
            Field::LineId => self.line_id.as_deref(),
            Field::Power => self.power.as_deref(),
            Field::Capacity => self.capacity.as_deref(),
            Field::Time => self.time.as_deref(),
        }
    }

    /// Value of `field` in `record`, if the batch has that column and the row has that cell.
    pub fn value<'a>(&self, record: &'a RawRecord, field: Field) -> Option<&'a str> {
        self.column(field).and_then(|col| record.get(col))
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Area => &mut self.area,
            Field::LineId => &mut self.line_id,
            Field::Power => &mut self.power,
            Field::Capacity => &mut self.capacity,
            Field::Time => &mut self.time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(headers: &[&str]) -> RawRecord {
        headers.iter().map(|h| (*h, "")).collect()
    }

    #[test]
    fn test_detect_japanese_headers() {
        let spec = FieldSpec::detect(&record(&["対象エリア", "送電線名", "時刻", "潮流実績", "運用容量"]));
        assert_eq!(spec.area.as_deref(), Some("対象エリア"));
        assert_eq!(spec.line_id.as_deref(), Some("送電線名"));
        assert_eq!(spec.power.as_deref(), Some("潮流実績"));
        assert_eq!(spec.capacity.as_deref(), Some("運用容量"));
        assert_eq!(spec.time.as_deref(), Some("時刻"));
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        let spec = FieldSpec::detect(&record(&["LINE", "Power", "TimeStamp"]));
        assert_eq!(spec.line_id.as_deref(), Some("LINE"));
        assert_eq!(spec.power.as_deref(), Some("Power"));
        assert_eq!(spec.time.as_deref(), Some("TimeStamp"));
        assert_eq!(spec.area, None);
        assert_eq!(spec.capacity, None);
    }

    #[test]
    fn test_first_matching_header_wins() {
        let spec = FieldSpec::detect(&record(&["capacity_mw", "p_mw", "line"]));
        assert_eq!(spec.power.as_deref(), Some("capacity_mw"));
        assert_eq!(spec.capacity.as_deref(), Some("capacity_mw"));

        let spec = FieldSpec::detect(&record(&["p_mw", "capacity_mw", "line"]));
        assert_eq!(spec.power.as_deref(), Some("p_mw"));
        assert_eq!(spec.capacity.as_deref(), Some("capacity_mw"));
    }

    #[test]
    fn test_empty_record_resolves_nothing() {
        assert_eq!(FieldSpec::detect(&RawRecord::new()), FieldSpec::default());
    }

    #[test]
    fn test_value_lookup() {
        let row: RawRecord = [("line", "L1"), ("mw", "12")].into_iter().collect();
        let spec = FieldSpec::detect(&row);
        assert_eq!(spec.value(&row, Field::LineId), Some("L1"));
        assert_eq!(spec.value(&row, Field::Power), Some("12"));
        assert_eq!(spec.value(&row, Field::Time), None);
    }
}
