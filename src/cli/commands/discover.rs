//! Discover command: full pipeline from captures to artifacts

use std::path::PathBuf;

use tracing::info;

use super::{ScanOptions, run_scan};
use crate::chunk::ChunkFormatter;
use crate::cli::error::CliError;
use crate::cli::output::{
    ERROR_PREVIEW, OutputFormat, format_error_preview, write_artifact, write_chunks_jsonl,
};
use crate::report::{CoverageReport, DiffReport, load_field_dictionary};
use crate::schema::{build_field_index, schemas_to_json, synthesize_all};

/// Arguments for the `discover` command
pub struct DiscoverArgs {
    /// Capture file or directory
    pub input: PathBuf,
    /// Directory receiving the artifacts
    pub output_dir: PathBuf,
    /// Markdown field dictionary to diff against
    pub dictionary: Option<PathBuf>,
    /// Format of the schema and index documents
    pub format: OutputFormat,
    /// Also write embedding chunks
    pub chunks: bool,
    /// Protocol name mentioned in overview chunks
    pub protocol: Option<String>,
    /// Scan settings
    pub options: ScanOptions,
}

/// Handle the `discover` command
pub fn handle_discover(args: &DiscoverArgs) -> Result<(), CliError> {
    let config = args.options.discovery_config()?;

    // Load the dictionary up front so a bad path fails before the scan
    let documented = args
        .dictionary
        .as_deref()
        .map(load_field_dictionary)
        .transpose()?;

    eprintln!("Phase 1: Discovering fields in {}", args.input.display());
    let result = run_scan(&args.input, &config, args.options.quiet)?;
    eprintln!("  Files scanned: {}", result.files_scanned);
    eprintln!("  Records: {}", result.total_records);
    eprintln!("  Event types: {}", result.events.len());
    eprintln!("  Field paths: {}", result.total_field_paths());

    eprintln!();
    eprintln!("Phase 2: Generating schemas");
    let schemas = synthesize_all(&result);
    let schema_path = args
        .output_dir
        .join(format!("discovered_schemas.{}", args.format.extension()));
    write_artifact(&schema_path, &args.format.render(&schemas_to_json(&schemas))?)?;
    eprintln!("  Saved {} schemas to {}", schemas.len(), schema_path.display());

    let index = build_field_index(&result, config.max_samples);
    let index_path = args
        .output_dir
        .join(format!("discovered_fields.{}", args.format.extension()));
    write_artifact(&index_path, &args.format.render(&index)?)?;
    eprintln!("  Saved {} field paths to {}", index.len(), index_path.display());

    eprintln!();
    eprintln!("Phase 3: Generating reports");
    let coverage_path = args.output_dir.join("coverage_report.md");
    write_artifact(
        &coverage_path,
        &CoverageReport::from_result(&result).to_markdown(),
    )?;
    eprintln!("  Coverage report: {}", coverage_path.display());

    if let Some(documented) = &documented {
        let diff = DiffReport::compute(&result.all_field_paths(), documented);
        let diff_path = args.output_dir.join("diff_report.md");
        write_artifact(&diff_path, &diff.to_markdown())?;
        eprintln!("  Diff report: {}", diff_path.display());
        eprintln!(
            "  Match rate: {:.1}% ({} new, {} stale)",
            diff.match_rate * 100.0,
            diff.undocumented.len(),
            diff.stale.len()
        );
    }

    if args.chunks {
        eprintln!();
        eprintln!("Phase 4: Generating chunks");
        let formatter = match &args.protocol {
            Some(protocol) => ChunkFormatter::new().with_protocol(protocol.clone()),
            None => ChunkFormatter::new(),
        };
        let mut chunks = formatter.chunk_discovery_result(&result);
        chunks.extend(formatter.chunk_field_index(&index));

        let chunks_path = args.output_dir.join("schema_chunks.jsonl");
        write_chunks_jsonl(&chunks_path, &chunks)?;
        eprintln!("  Saved {} chunks to {}", chunks.len(), chunks_path.display());
    }

    info!(output = %args.output_dir.display(), "Discovery complete");
    eprint!("{}", format_error_preview(&result.errors, ERROR_PREVIEW));

    Ok(())
}
