// Display-scale utilization for lines without a known capacity
use crate::application::sample_reducer::TrackedLine;
use crate::domain::line_state::{LineState, MAX_UTILIZATION, round3};
use indexmap::IndexMap;

const REFERENCE_PERCENTILE: f64 = 0.95;

/// Reference flow used as "near capacity" when the real capacity is unknown:
/// the sorted |p| value at index floor(0.95 * n), or 1 when there are no lines.
pub fn reference_flow(lines: &[LineState]) -> f64 {
    let mut flows: Vec<f64> = lines
        .iter()
        .map(|l| l.power_mw.abs())
        .filter(|p| p.is_finite())
        .collect();
    if flows.is_empty() {
        return 1.0;
    }
    flows.sort_by(f64::total_cmp);
    let idx = ((flows.len() as f64 * REFERENCE_PERCENTILE).floor() as usize).min(flows.len() - 1);
    flows[idx]
}

/// Fill in relative utilization for lines that still carry the 0 placeholder
/// and drop the run-scoped time keys. Lines keep their first-seen order.
pub fn finalize(lines: IndexMap<String, TrackedLine>) -> Vec<LineState> {
    let mut states: Vec<LineState> = lines.into_values().map(|t| t.state).collect();
    let p95 = reference_flow(&states);

    if p95 > 0.0 {
        for state in states.iter_mut().filter(|s| s.utilization == 0.0) {
            state.utilization = round3((state.power_mw.abs() / p95).min(MAX_UTILIZATION));
        }
    }

    tracing::debug!(lines = states.len(), p95, "finalized utilization");
    states
}
