// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod grid_api_client;
pub mod json_file_sink;
pub mod mapping_file;
pub mod memory_sink;
