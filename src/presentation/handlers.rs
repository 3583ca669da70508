// HTTP request handlers
use crate::presentation::app_state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Most recent snapshot, or 503 until the first run has published one
pub async fn latest_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.snapshots.latest().await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "no snapshot yet").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SnapshotSink;
    use crate::domain::line_state::LineState;
    use crate::domain::snapshot::{Snapshot, SnapshotKey, now_jst};
    use crate::infrastructure::memory_sink::MemorySink;

    #[tokio::test]
    async fn test_latest_snapshot_before_first_run() {
        let state = Arc::new(AppState {
            snapshots: MemorySink::new(),
        });
        let response = latest_snapshot(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_latest_snapshot_served() {
        let sink = MemorySink::new();
        let snapshot = Snapshot::assemble(vec![LineState::from_sample("L1".to_string(), 5.0, 10.0)], now_jst());
        sink.publish(&SnapshotKey::Latest, &snapshot).await.unwrap();

        let state = Arc::new(AppState { snapshots: sink });
        let response = latest_snapshot(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(health_check().await, "ok");
    }
}
