//! Scan command: corpus summary without writing artifacts

use std::path::PathBuf;

use super::{ScanOptions, run_scan};
use crate::cli::error::CliError;
use crate::cli::output::{ERROR_PREVIEW, format_error_preview, format_scan_summary};
use crate::discovery::DiscoveryError;
use crate::report::CoverageReport;

/// Arguments for the `scan` command
pub struct ScanArgs {
    /// Capture file or directory
    pub input: PathBuf,
    /// Print the structured coverage report as JSON
    pub json: bool,
    /// Scan settings
    pub options: ScanOptions,
}

/// Handle the `scan` command
pub fn handle_scan(args: &ScanArgs) -> Result<(), CliError> {
    let config = args.options.discovery_config()?;
    let result = run_scan(&args.input, &config, args.options.quiet)?;

    if args.json {
        let report = CoverageReport::from_result(&result);
        let json = serde_json::to_string_pretty(&report).map_err(DiscoveryError::from)?;
        println!("{}", json);
    } else {
        print!("{}", format_scan_summary(&result));
        eprint!("{}", format_error_preview(&result.errors, ERROR_PREVIEW));
    }

    Ok(())
}
