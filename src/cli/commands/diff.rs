//! Diff command: coverage plus documentation diff as Markdown

use std::path::PathBuf;

use super::{ScanOptions, run_scan};
use crate::cli::error::CliError;
use crate::cli::output::write_artifact;
use crate::report::{full_report, load_field_dictionary};

/// Arguments for the `diff` command
pub struct DiffArgs {
    /// Capture file or directory
    pub input: PathBuf,
    /// Markdown field dictionary
    pub dictionary: PathBuf,
    /// Write the report here instead of stdout
    pub output: Option<PathBuf>,
    /// Scan settings
    pub options: ScanOptions,
}

/// Handle the `diff` command
pub fn handle_diff(args: &DiffArgs) -> Result<(), CliError> {
    let config = args.options.discovery_config()?;
    let documented = load_field_dictionary(&args.dictionary)?;
    let result = run_scan(&args.input, &config, args.options.quiet)?;

    let report = full_report(&result, &documented);

    if let Some(ref output_path) = args.output {
        write_artifact(output_path, &report)?;
        eprintln!("Report saved to {}", output_path.display());
    } else {
        println!("{}", report);
    }

    Ok(())
}
