// Application layer - Use cases and the collaborator traits they depend on
pub mod ports;
pub mod sample_reducer;
pub mod snapshot_service;
pub mod utilization;
