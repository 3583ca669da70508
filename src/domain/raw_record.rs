// Raw per-area telemetry rows as published by the grid operator
use indexmap::IndexMap;

/// One CSV row: column name -> cell text, in the column order of the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: IndexMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Column names in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// All records one area returned for one acquisition.
#[derive(Debug, Clone)]
pub struct AreaBatch {
    pub area: String,
    pub records: Vec<RawRecord>,
}

impl AreaBatch {
    pub fn new(area: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            area: area.into(),
            records,
        }
    }
}

/// Parse a published number the forgiving way: thousands separators and
/// spaces are stripped, anything unparseable or non-finite becomes 0.
pub fn parse_number(raw: Option<&str>) -> f64 {
    let cleaned: String = raw
        .unwrap_or_default()
        .chars()
        .filter(|c| *c != ',' && *c != ' ')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_column_order() {
        let record: RawRecord = [("zeta", "1"), ("alpha", "2"), ("mid", "3")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(record.get("alpha"), Some("2"));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some("1,234")), 1234.0);
        assert_eq!(parse_number(Some(" -40 ")), -40.0);
        assert_eq!(parse_number(Some("12.5")), 12.5);
        assert_eq!(parse_number(Some("N/A")), 0.0);
        assert_eq!(parse_number(Some("")), 0.0);
        assert_eq!(parse_number(Some("inf")), 0.0);
        assert_eq!(parse_number(None), 0.0);
    }
}
