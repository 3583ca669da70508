// Presentation layer - Read-only HTTP surface over published snapshots
pub mod app_state;
pub mod handlers;
