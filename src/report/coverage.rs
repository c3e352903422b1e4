//! Corpus coverage report

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{format_count, inline_code, table_cell};
use crate::discovery::DiscoveryResult;

/// Parse errors listed before the remainder is summarized
pub const ERROR_PREVIEW_LIMIT: usize = 20;

/// Samples shown per field row
pub const FIELD_SAMPLE_LIMIT: usize = 3;

/// Characters kept of each sample shown in a field row
pub const FIELD_SAMPLE_WIDTH: usize = 40;

/// Coverage of one field path within an event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCoverage {
    pub path: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub count: usize,
    pub samples: Vec<String>,
}

/// Coverage of one event type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCoverage {
    pub name: String,
    pub count: usize,
    /// Share of all attempted records, in percent
    pub percent: f64,
    pub unique_fields: usize,
    /// Sorted by path
    pub fields: Vec<FieldCoverage>,
}

/// Summary of a scanned corpus
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub generated_at: DateTime<Utc>,
    pub files_scanned: usize,
    pub total_records: usize,
    pub unique_event_types: usize,
    pub parse_errors: usize,
    /// Field paths summed per event
    pub total_field_paths: usize,
    /// Distinct field paths across all events
    pub distinct_field_paths: usize,
    /// Sorted by descending count, then name
    pub events: Vec<EventCoverage>,
    /// First parse errors, in scan order
    pub errors_preview: Vec<String>,
    /// Errors left out of the preview
    pub errors_omitted: usize,
}

impl CoverageReport {
    /// Summarize a discovery result
    pub fn from_result(result: &DiscoveryResult) -> Self {
        let mut events: Vec<EventCoverage> = result
            .events
            .values()
            .map(|event| EventCoverage {
                name: event.name.clone(),
                count: event.count,
                percent: if result.total_records > 0 {
                    event.count as f64 / result.total_records as f64 * 100.0
                } else {
                    0.0
                },
                unique_fields: event.fields.len(),
                fields: event
                    .fields
                    .values()
                    .map(|field| FieldCoverage {
                        path: field.path.clone(),
                        type_name: field.inferred_type().to_string(),
                        count: field.count,
                        samples: field
                            .samples
                            .iter()
                            .take(FIELD_SAMPLE_LIMIT)
                            .map(sample_text)
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        events.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        Self {
            generated_at: Utc::now(),
            files_scanned: result.files_scanned,
            total_records: result.total_records,
            unique_event_types: result.events.len(),
            parse_errors: result.errors.len(),
            total_field_paths: result.total_field_paths(),
            distinct_field_paths: result.all_field_paths().len(),
            events,
            errors_preview: result
                .errors
                .iter()
                .take(ERROR_PREVIEW_LIMIT)
                .cloned()
                .collect(),
            errors_omitted: result.errors.len().saturating_sub(ERROR_PREVIEW_LIMIT),
        }
    }

    /// Override the generation timestamp
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Render the report as Markdown
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Event Capture Coverage Report\n\n");
        md.push_str(&format!(
            "*Generated: {}*\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        md.push_str("## Coverage Summary\n\n");
        md.push_str(&format!("- **Files Scanned**: {} files\n", self.files_scanned));
        md.push_str(&format!(
            "- **Total Records**: {} records\n",
            format_count(self.total_records)
        ));
        md.push_str(&format!(
            "- **Unique Event Types**: {} unique event types\n",
            self.unique_event_types
        ));
        md.push_str(&format!("- **Parse Errors**: {}\n", self.parse_errors));
        md.push_str(&format!(
            "- **Total Field Paths (per event)**: {}\n",
            format_count(self.total_field_paths)
        ));
        md.push_str(&format!(
            "- **Distinct Field Paths**: {}\n\n",
            format_count(self.distinct_field_paths)
        ));

        md.push_str("## Event Types\n\n");
        md.push_str("| Event | Count | % of Total | Unique Fields |\n");
        md.push_str("|-------|------:|:----------:|:-------------:|\n");
        for event in &self.events {
            md.push_str(&format!(
                "| {} | {} | {:.1}% | {} |\n",
                inline_code(&event.name),
                format_count(event.count),
                event.percent,
                event.unique_fields
            ));
        }
        md.push('\n');

        md.push_str("## Field Coverage by Event\n\n");
        let mut by_name: Vec<&EventCoverage> = self.events.iter().collect();
        by_name.sort_by(|a, b| a.name.cmp(&b.name));
        for event in by_name {
            md.push_str(&format!("### {}\n\n", event.name));
            md.push_str(&format!("**Occurrences**: {}\n\n", format_count(event.count)));
            md.push_str("| Field Path | Type | Count | Sample Values |\n");
            md.push_str("|------------|:----:|------:|---------------|\n");
            for field in &event.fields {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    inline_code(&field.path),
                    field.type_name,
                    format_count(field.count),
                    table_cell(&field.samples.join(", "))
                ));
            }
            md.push('\n');
        }

        if !self.errors_preview.is_empty() {
            md.push_str("## Parse Errors\n\n");
            for error in &self.errors_preview {
                md.push_str(&format!("- {}\n", error));
            }
            if self.errors_omitted > 0 {
                md.push_str(&format!("- *... and {} more*\n", self.errors_omitted));
            }
            md.push('\n');
        }

        md
    }
}

/// Short text form of a sample for table cells
fn sample_text(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.chars().take(FIELD_SAMPLE_WIDTH).collect()
}
