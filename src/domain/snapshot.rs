// Timestamped snapshot of all reduced lines
use super::line_state::LineState;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Serialize, Serializer};

/// Fixed UTC+9 offset used for every timestamp the service produces.
pub const JST: FixedOffset = match FixedOffset::east_opt(9 * 3600) {
    Some(offset) => offset,
    None => panic!("invalid JST offset"),
};

pub fn now_jst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&JST)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    #[serde(rename = "ts", serialize_with = "iso_millis")]
    pub generated_at: DateTime<FixedOffset>,
    pub lines: Vec<LineState>,
}

impl Snapshot {
    pub fn assemble(lines: Vec<LineState>, generated_at: DateTime<FixedOffset>) -> Self {
        Self {
            generated_at: generated_at.with_timezone(&JST),
            lines,
        }
    }

    /// ISO-8601 with millisecond precision and an explicit `+09:00` suffix.
    pub fn timestamp(&self) -> String {
        format_timestamp(&self.generated_at)
    }

    /// Hour bucket used as the archival key, e.g. `2024061513`.
    pub fn hour_key(&self) -> String {
        self.generated_at.format("%Y%m%d%H").to_string()
    }
}

/// Logical destination of a published snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotKey {
    Latest,
    Hourly(String),
}

impl SnapshotKey {
    pub fn hourly_for(snapshot: &Snapshot) -> Self {
        SnapshotKey::Hourly(snapshot.hour_key())
    }
}

fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

fn iso_millis<S: Serializer>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::line_state::Direction;
    use chrono::TimeZone;

    fn at_utc(h: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2024, 6, 15, h, 4, 5).unwrap().fixed_offset()
    }

    #[test]
    fn test_timestamp_uses_jst_offset() {
        let snapshot = Snapshot::assemble(vec![], at_utc(3));
        assert_eq!(snapshot.timestamp(), "2024-06-15T12:04:05.000+09:00");
        assert_eq!(snapshot.hour_key(), "2024061512");
    }

    #[test]
    fn test_hour_key_rolls_over_date() {
        let snapshot = Snapshot::assemble(vec![], at_utc(20));
        assert_eq!(snapshot.hour_key(), "2024061605");
        assert_eq!(
            SnapshotKey::hourly_for(&snapshot),
            SnapshotKey::Hourly("2024061605".to_string())
        );
    }

    #[test]
    fn test_assemble_preserves_line_order() {
        let lines = vec![
            LineState::from_sample("B".to_string(), 10.0, 100.0),
            LineState::from_sample("A".to_string(), -5.0, 0.0),
            LineState::from_sample("C".to_string(), 0.0, 50.0),
        ];
        let snapshot = Snapshot::assemble(lines.clone(), at_utc(0));
        assert_eq!(snapshot.lines, lines);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["ts"], "2024-06-15T09:04:05.000+09:00");
        let ids: Vec<&str> = value["lines"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["lineId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(value["lines"][1]["dir"], -1);
        assert_eq!(snapshot.lines[1].direction, Direction::Reverse);
        assert!(value["lines"][0].get("timeKey").is_none());
    }
}
