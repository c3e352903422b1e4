//! Field discovery over JSONL event captures
//!
//! This module walks every record of a capture corpus and builds, per event
//! type, a table of every field path ever observed together with its types,
//! occurrence count and a handful of sample values.
//!
//! ## Features
//!
//! - **Path walking** - Flatten nested records into `data.items[].id` style paths
//! - **Dynamic-key detection** - Treat numeric or very wide maps as opaque objects
//! - **Resilient scanning** - Malformed lines are recorded, never fatal
//! - **Parallel corpus scans** - Per-file results reduce with an associative merge
//!
//! ## Example
//!
//! ```rust,ignore
//! use event_schema_miner::discovery::{DiscoveryConfig, scan_directory};
//!
//! let result = scan_directory(Path::new("captures/"), &DiscoveryConfig::default())?;
//! for (name, event) in &result.events {
//!     println!("{name}: {} records, {} fields", event.count, event.fields.len());
//! }
//! ```

mod config;
mod error;
mod merge;
mod scanner;
mod types;
mod walker;

pub use config::{DiscoveryConfig, DiscoveryConfigBuilder};
pub use error::DiscoveryError;
pub use merge::{count_signature, event_from_fields, merge_all, merge_field_maps, merge_results};
pub use scanner::{
    CorpusScanner, FileCallback, RecordScanner, discover_capture_files, event_name, scan_directory,
    scan_file, scan_path,
};
pub use types::{
    ARRAY_MARKER, DiscoveryResult, EventInfo, FieldInfo, InferredType, JsonType, SampleSet,
    UNKNOWN_EVENT, display_value, opaque_object_sample,
};
pub use walker::{PathWalker, discover_fields, is_dynamic_keys_object};
