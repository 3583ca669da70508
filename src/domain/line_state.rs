// Per-line state emitted in each snapshot
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upper bound for displayed utilization. Values above 1 mean overload.
pub const MAX_UTILIZATION: f64 = 1.2;

/// Flow direction relative to the line's published orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Zero flow counts as forward.
    pub fn from_power(power_mw: f64) -> Self {
        if power_mw >= 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.sign())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = i8::deserialize(deserializer)?;
        Ok(if v < 0 { Direction::Reverse } else { Direction::Forward })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineState {
    #[serde(rename = "lineId")]
    pub line_id: String,
    #[serde(rename = "p_mw", serialize_with = "plain_number")]
    pub power_mw: f64,
    #[serde(serialize_with = "plain_number")]
    pub capacity_mw: f64,
    #[serde(rename = "util", serialize_with = "plain_number")]
    pub utilization: f64,
    #[serde(rename = "dir")]
    pub direction: Direction,
}

impl LineState {
    /// Build a state from one sample. Utilization is `|p| / capacity` when the
    /// capacity is known, otherwise 0 until the estimator fills it in.
    pub fn from_sample(line_id: String, power_mw: f64, capacity_mw: f64) -> Self {
        let capacity_mw = capacity_mw.max(0.0);
        let utilization = if capacity_mw > 0.0 {
            round3((power_mw.abs() / capacity_mw).min(MAX_UTILIZATION))
        } else {
            0.0
        };
        Self {
            line_id,
            power_mw,
            capacity_mw,
            utilization,
            direction: Direction::from_power(power_mw),
        }
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Integral values are written without a fractional part (`100`, not `100.0`).
fn plain_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
