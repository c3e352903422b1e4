//! Output formatting and artifact writing for CLI

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::chunk::SchemaChunk;
use crate::discovery::{DiscoveryError, DiscoveryResult};

/// Parse errors echoed to stderr after a run
pub const ERROR_PREVIEW: usize = 5;

/// Document format for schema and index artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    /// Encode a document
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String, DiscoveryError> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Write one artifact, creating parent directories as needed
pub fn write_artifact(path: &Path, content: &str) -> Result<(), DiscoveryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DiscoveryError::OutputWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| DiscoveryError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Write chunks as JSON lines
pub fn write_chunks_jsonl(path: &Path, chunks: &[SchemaChunk]) -> Result<(), DiscoveryError> {
    let mut buf = Vec::new();
    for chunk in chunks {
        serde_json::to_writer(&mut buf, chunk)?;
        buf.push(b'\n');
    }

    let mut file = fs::File::create(path).map_err(|source| DiscoveryError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(&buf)
        .map_err(|source| DiscoveryError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })
}

/// Per-event summary, most frequent events first
pub fn format_scan_summary(result: &DiscoveryResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Scanned {} file(s), {} record(s), {} event type(s), {} parse error(s)\n",
        result.files_scanned,
        result.total_records,
        result.events.len(),
        result.errors.len()
    ));

    let mut events: Vec<_> = result.events.values().collect();
    events.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    if !events.is_empty() {
        output.push_str("\nEvents:\n");
        let width = events.iter().map(|e| e.name.len()).max().unwrap_or(0);
        for event in events {
            output.push_str(&format!(
                "  {:<width$}  {:>8} records  {:>5} fields\n",
                event.name,
                event.count,
                event.fields.len(),
                width = width
            ));
        }
    }

    output
}

/// First parse errors, with an overflow line
pub fn format_error_preview(errors: &[String], limit: usize) -> String {
    let mut output = String::new();
    if errors.is_empty() {
        return output;
    }

    output.push_str(&format!("\n⚠️  {} parse error(s):\n", errors.len()));
    for error in errors.iter().take(limit) {
        output.push_str(&format!("  - {}\n", error));
    }
    if errors.len() > limit {
        output.push_str(&format!("  ... and {} more\n", errors.len() - limit));
    }
    output
}
