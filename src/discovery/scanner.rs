//! Capture file scanning
//!
//! [`RecordScanner`] streams one JSONL capture and folds every record into a
//! per-event field table. [`CorpusScanner`] does the same for every capture
//! in a directory, scanning files in parallel and reducing the per-file
//! results in path order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, info, info_span, warn};

use super::config::DiscoveryConfig;
use super::error::DiscoveryError;
use super::merge::merge_all;
use super::types::{DiscoveryResult, EventInfo, JsonType, UNKNOWN_EVENT};
use super::walker::PathWalker;

/// Scans a single capture file
pub struct RecordScanner<'a> {
    config: &'a DiscoveryConfig,
}

impl<'a> RecordScanner<'a> {
    /// Create a scanner for the given configuration
    pub fn new(config: &'a DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Scan a capture file, one line at a time
    pub fn scan_file(&self, path: &Path) -> Result<DiscoveryResult, DiscoveryError> {
        if !path.exists() {
            return Err(DiscoveryError::InputNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let result = self.scan_reader(BufReader::new(file), path)?;
        debug!(
            file = %path.display(),
            records = result.total_records,
            events = result.events.len(),
            "Scanned capture file"
        );
        if !result.errors.is_empty() {
            warn!(
                file = %path.display(),
                errors = result.errors.len(),
                "Capture file contains malformed lines"
            );
        }
        Ok(result)
    }

    /// Scan newline-delimited JSON from any reader
    ///
    /// `source` is only used to label parse errors. Malformed lines are
    /// recorded in `errors` and never abort the scan; read failures do.
    pub fn scan_reader<R: BufRead>(
        &self,
        mut reader: R,
        source: &Path,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        let mut result = DiscoveryResult::new();
        result.files_scanned = 1;

        let mut buf = Vec::new();
        let mut line_num = 0usize;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source_err| DiscoveryError::Io {
                    path: source.to_path_buf(),
                    source: source_err,
                })?;
            if read == 0 {
                break;
            }
            line_num += 1;

            let line = buf.trim_ascii();
            if line.is_empty() {
                continue;
            }
            result.total_records += 1;

            match parse_record(line) {
                Ok(record) => self.absorb(&mut result, &record),
                Err(message) => result.errors.push(
                    DiscoveryError::RecordParse {
                        file: source.to_path_buf(),
                        line: line_num,
                        message,
                    }
                    .to_string(),
                ),
            }
        }

        Ok(result)
    }

    fn absorb(&self, result: &mut DiscoveryResult, record: &Map<String, Value>) {
        let name = event_name(record, &self.config.event_field);
        let mut walker = PathWalker::new(self.config);
        walker.walk_object(record, "", 0);

        result
            .events
            .entry(name.clone())
            .or_insert_with(|| EventInfo::new(name))
            .absorb_record(walker.finish());
    }
}

/// Parse one line into a JSON object
fn parse_record(line: &[u8]) -> Result<Map<String, Value>, String> {
    match serde_json::from_slice::<Value>(line) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "expected JSON object, found {}",
            JsonType::of(&other)
        )),
        Err(e) => Err(e.to_string()),
    }
}

/// Read the event discriminator of a record
///
/// Missing or null discriminators map to `"unknown"`; non-string values are
/// rendered as compact JSON so they still group consistently.
pub fn event_name(record: &Map<String, Value>, event_field: &str) -> String {
    match record.get(event_field) {
        Some(Value::String(name)) => name.clone(),
        None | Some(Value::Null) => UNKNOWN_EVENT.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Callback invoked after each capture file is scanned
pub type FileCallback = Box<dyn Fn(&Path, &DiscoveryResult) + Send + Sync>;

/// Scans every capture file in a directory and merges the results
pub struct CorpusScanner {
    config: DiscoveryConfig,
    on_file: Option<FileCallback>,
}

impl CorpusScanner {
    /// Create a corpus scanner
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            on_file: None,
        }
    }

    /// Register a callback run after each file (progress reporting)
    pub fn on_file<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Path, &DiscoveryResult) + Send + Sync + 'static,
    {
        self.on_file = Some(Box::new(callback));
        self
    }

    /// Scan a capture file or a directory of captures
    pub fn scan_path(&self, path: &Path) -> Result<DiscoveryResult, DiscoveryError> {
        if path.is_file() {
            let result = RecordScanner::new(&self.config).scan_file(path)?;
            self.notify(path, &result);
            Ok(result)
        } else if path.is_dir() {
            self.scan_directory(path)
        } else {
            Err(DiscoveryError::InputNotFound(path.to_path_buf()))
        }
    }

    /// Scan every file matching the configured pattern in a directory
    pub fn scan_directory(&self, dir: &Path) -> Result<DiscoveryResult, DiscoveryError> {
        if !dir.is_dir() {
            return Err(DiscoveryError::InputNotFound(dir.to_path_buf()));
        }

        let _span = info_span!(
            "corpus_scan",
            dir = %dir.display(),
            pattern = %self.config.pattern
        )
        .entered();

        let files = discover_capture_files(dir, &self.config.pattern)?;
        if files.is_empty() {
            warn!(dir = %dir.display(), pattern = %self.config.pattern, "No capture files matched");
        }

        let results = self.scan_files(&files)?;
        let combined = merge_all(results);

        info!(
            files = combined.files_scanned,
            records = combined.total_records,
            events = combined.events.len(),
            errors = combined.errors.len(),
            "Corpus scan complete"
        );

        Ok(combined)
    }

    #[cfg(feature = "parallel")]
    fn scan_files(&self, files: &[PathBuf]) -> Result<Vec<DiscoveryResult>, DiscoveryError> {
        if self.config.parallel {
            // collect() keeps file order, so the reduction matches a serial scan
            files
                .par_iter()
                .map(|path| self.scan_one(path))
                .collect::<Result<Vec<_>, _>>()
        } else {
            files.iter().map(|path| self.scan_one(path)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn scan_files(&self, files: &[PathBuf]) -> Result<Vec<DiscoveryResult>, DiscoveryError> {
        files.iter().map(|path| self.scan_one(path)).collect()
    }

    fn scan_one(&self, path: &Path) -> Result<DiscoveryResult, DiscoveryError> {
        let result = RecordScanner::new(&self.config).scan_file(path)?;
        self.notify(path, &result);
        Ok(result)
    }

    fn notify(&self, path: &Path, result: &DiscoveryResult) {
        if let Some(callback) = &self.on_file {
            callback(path, result);
        }
    }
}

/// Find capture files matching a glob pattern under a directory
///
/// The pattern is always resolved relative to `dir` (a leading `./` is
/// dropped); absolute patterns are rejected. Results are sorted by path.
pub fn discover_capture_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    if Path::new(pattern).has_root() {
        return Err(DiscoveryError::InvalidPattern(format!(
            "{}: pattern must be relative to the capture directory",
            pattern
        )));
    }

    let full_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.display().to_string()),
        pattern.trim_start_matches("./")
    );

    let entries = glob::glob(&full_pattern)
        .map_err(|e| DiscoveryError::InvalidPattern(format!("{}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                warn!("Error accessing path: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Scan a single capture file
pub fn scan_file(path: &Path, config: &DiscoveryConfig) -> Result<DiscoveryResult, DiscoveryError> {
    RecordScanner::new(config).scan_file(path)
}

/// Scan all matching capture files in a directory
pub fn scan_directory(
    dir: &Path,
    config: &DiscoveryConfig,
) -> Result<DiscoveryResult, DiscoveryError> {
    CorpusScanner::new(config.clone()).scan_directory(dir)
}

/// Scan a capture file or directory
pub fn scan_path(path: &Path, config: &DiscoveryConfig) -> Result<DiscoveryResult, DiscoveryError> {
    CorpusScanner::new(config.clone()).scan_path(path)
}
