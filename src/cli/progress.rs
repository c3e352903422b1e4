//! Progress reporting for corpus scans
//!
//! A single `indicatif` spinner that counts scanned files and records. It is
//! hidden entirely in quiet mode.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::discovery::DiscoveryResult;

/// Spinner shown while capture files are scanned
pub struct ScanProgress {
    bar: ProgressBar,
    files: Arc<AtomicUsize>,
    records: Arc<AtomicUsize>,
}

impl ScanProgress {
    /// Create a spinner, or a hidden bar when `quiet`
    pub fn new(msg: &str, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(msg.to_string());

        Self {
            bar,
            files: Arc::new(AtomicUsize::new(0)),
            records: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Callback for `CorpusScanner::on_file`
    pub fn file_callback(&self) -> impl Fn(&Path, &DiscoveryResult) + Send + Sync + 'static {
        let bar = self.bar.clone();
        let files = Arc::clone(&self.files);
        let records = Arc::clone(&self.records);

        move |path: &Path, result: &DiscoveryResult| {
            let done = files.fetch_add(1, Ordering::Relaxed) + 1;
            let total = records.fetch_add(result.total_records, Ordering::Relaxed)
                + result.total_records;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            bar.set_message(format!("Scanned {} files, {} records ({})", done, total, name));
        }
    }

    /// Finish with success
    pub fn finish_success(&self, msg: &str) {
        self.bar.finish_with_message(format!("✓ {}", msg));
    }

    /// Finish with error
    pub fn finish_error(&self, msg: &str) {
        self.bar.abandon_with_message(format!("✗ {}", msg));
    }
}
