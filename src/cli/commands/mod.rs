//! CLI command implementations

pub mod diff;
pub mod discover;
pub mod scan;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::error::CliError;
use crate::cli::progress::ScanProgress;
use crate::discovery::{
    CorpusScanner, DiscoveryConfig, DiscoveryConfigBuilder, DiscoveryError, DiscoveryResult,
};

/// Scan settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// TOML discovery config; flags below override it
    pub config: Option<PathBuf>,
    /// Capture file glob pattern
    pub pattern: Option<String>,
    /// Maximum nesting depth
    pub max_depth: Option<usize>,
    /// Sample cap per field path
    pub max_samples: Option<usize>,
    /// Event discriminator field
    pub event_field: Option<String>,
    /// Scan files one at a time
    pub no_parallel: bool,
    /// Hide the progress spinner
    pub quiet: bool,
}

impl ScanOptions {
    /// Resolve the effective discovery configuration
    pub fn discovery_config(&self) -> Result<DiscoveryConfig, CliError> {
        let base = match &self.config {
            Some(path) => DiscoveryConfig::from_toml_file(path)?,
            None => DiscoveryConfig::default(),
        };

        let mut builder = DiscoveryConfigBuilder::from_config(base);
        if let Some(pattern) = &self.pattern {
            builder = builder.pattern(pattern.clone());
        }
        if let Some(depth) = self.max_depth {
            builder = builder.max_depth(depth);
        }
        if let Some(samples) = self.max_samples {
            builder = builder.max_samples(samples);
        }
        if let Some(field) = &self.event_field {
            builder = builder.event_field(field.clone());
        }
        if self.no_parallel {
            builder = builder.parallel(false);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

/// Scan a capture file or directory with a progress spinner
pub fn run_scan(
    input: &Path,
    config: &DiscoveryConfig,
    quiet: bool,
) -> Result<DiscoveryResult, CliError> {
    if !input.exists() {
        return Err(DiscoveryError::InputNotFound(input.to_path_buf()).into());
    }

    let progress = ScanProgress::new(&format!("Scanning {}", input.display()), quiet);
    let scanner = CorpusScanner::new(config.clone()).on_file(progress.file_callback());

    match scanner.scan_path(input) {
        Ok(result) => {
            progress.finish_success(&format!(
                "Scanned {} file(s), {} record(s)",
                result.files_scanned, result.total_records
            ));
            info!(
                events = result.events.len(),
                errors = result.errors.len(),
                "Scan finished"
            );
            Ok(result)
        }
        Err(e) => {
            progress.finish_error("Scan failed");
            Err(e.into())
        }
    }
}
