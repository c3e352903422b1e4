//! Event Schema Miner - Reverse-engineer event stream schemas from JSONL captures
//!
//! Provides:
//! - Field discovery over capture corpora (per event type, every field path)
//! - Schema synthesis (nested draft-07 JSON Schemas with frequencies and examples)
//! - A flat cross-event field index
//! - Coverage and documentation diff reports
//! - Text chunks of schemas and fields for downstream embedding

pub mod chunk;
pub mod cli;
pub mod discovery;
pub mod report;
pub mod schema;

// Re-export commonly used types
pub use discovery::{
    CorpusScanner, DiscoveryConfig, DiscoveryError, DiscoveryResult, EventInfo, FieldInfo,
    InferredType, JsonType, PathWalker, RecordScanner, SampleSet, scan_directory, scan_file,
    scan_path,
};
pub use schema::{
    EventSchema, FieldIndex, FieldIndexEntry, SchemaNode, build_field_index, synthesize,
    synthesize_all,
};
pub use report::{CoverageReport, DiffReport, full_report, load_field_dictionary, parse_field_dictionary};
pub use chunk::{ChunkFormatter, ChunkKind, SchemaChunk};
