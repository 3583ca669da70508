// Domain layer - Pure types and transforms, no I/O
pub mod field_spec;
pub mod line_mapping;
pub mod line_state;
pub mod raw_record;
pub mod snapshot;
