//! Error types for field discovery

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while discovering and persisting event schemas
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// One malformed capture line. Only ever rendered into
    /// `DiscoveryResult::errors`, never returned from a scan.
    #[error("{}:{line}: {message}", .file.display())]
    RecordParse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// Input file or directory does not exist
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Invalid glob pattern for capture files
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// IO error while reading captures
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure persisting an output artifact
    #[error("Failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document encoding failure
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            DiscoveryError::InputNotFound(path) => {
                format!(
                    "Input not found: {}\n\nHint: Pass a JSONL capture file or a directory containing captures.",
                    path.display()
                )
            }
            DiscoveryError::InvalidPattern(pattern) => {
                format!(
                    "Invalid glob pattern: {pattern}\n\n\
                    Hint: Use standard glob syntax like '*.jsonl' or '**/*.jsonl'."
                )
            }
            DiscoveryError::OutputWrite { path, source } => {
                format!(
                    "Failed to write {}: {source}\n\nHint: Check that the output directory is writable.",
                    path.display()
                )
            }
            DiscoveryError::Config(msg) => {
                format!("Invalid configuration: {msg}\n\nHint: Check your discovery config file.")
            }
            _ => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(e: serde_json::Error) -> Self {
        DiscoveryError::Serialize(e.to_string())
    }
}

impl From<serde_yaml::Error> for DiscoveryError {
    fn from(e: serde_yaml::Error) -> Self {
        DiscoveryError::Serialize(e.to_string())
    }
}
