// Application state for HTTP handlers
use crate::infrastructure::memory_sink::MemorySink;

#[derive(Clone)]
pub struct AppState {
    pub snapshots: MemorySink,
}
