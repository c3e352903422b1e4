//! Schema synthesis and field indexing
//!
//! Turns the flat per-event field tables produced by discovery into nested
//! draft-07 JSON Schemas, and into a flat index of every path across all
//! event types.

mod formats;
mod index;
mod synthesizer;

pub use formats::{Format, common_format, detect_format};
pub use index::{FieldIndex, FieldIndexEntry, build_field_index};
pub use synthesizer::{
    EventSchema, SCHEMA_DIALECT, SchemaNode, schemas_to_json, synthesize, synthesize_all,
};
