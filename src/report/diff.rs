//! Discovered vs documented field diff

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::coverage::CoverageReport;
use super::inline_code;
use crate::discovery::{DiscoveryError, DiscoveryResult};

/// Table cells holding a backtick-quoted `$.` path
static DICTIONARY_PATH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|\s*`\$\.([^`]+)`\s*\|").unwrap());

/// Set comparison of discovered and documented field paths
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub generated_at: DateTime<Utc>,
    pub discovered_count: usize,
    pub documented_count: usize,
    /// In both sets
    pub matched: BTreeSet<String>,
    /// Discovered but not documented
    pub undocumented: BTreeSet<String>,
    /// Documented but never observed
    pub stale: BTreeSet<String>,
    /// `matched / discovered`, 0 when nothing was discovered
    pub match_rate: f64,
}

impl DiffReport {
    /// Compare two path sets
    pub fn compute(discovered: &BTreeSet<String>, documented: &BTreeSet<String>) -> Self {
        let matched: BTreeSet<String> = discovered.intersection(documented).cloned().collect();
        let undocumented: BTreeSet<String> = discovered.difference(documented).cloned().collect();
        let stale: BTreeSet<String> = documented.difference(discovered).cloned().collect();

        let match_rate = if discovered.is_empty() {
            0.0
        } else {
            matched.len() as f64 / discovered.len() as f64
        };

        Self {
            generated_at: Utc::now(),
            discovered_count: discovered.len(),
            documented_count: documented.len(),
            matched,
            undocumented,
            stale,
            match_rate,
        }
    }

    /// Override the generation timestamp
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Whether every discovered path is documented and nothing is stale
    pub fn is_complete(&self) -> bool {
        self.undocumented.is_empty() && self.stale.is_empty()
    }

    /// Render the diff as Markdown
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Field Coverage Diff Report\n\n");
        md.push_str(&format!(
            "*Generated: {}*\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        md.push_str("## Summary\n\n");
        md.push_str(&format!("- **Discovered Fields**: {}\n", self.discovered_count));
        md.push_str(&format!("- **Documented Fields**: {}\n", self.documented_count));
        md.push_str(&format!(
            "- **Matched/Validated**: {} ({:.1}%)\n",
            self.matched.len(),
            self.match_rate * 100.0
        ));
        md.push_str(&format!("- **New (undocumented)**: {}\n", self.undocumented.len()));
        md.push_str(&format!(
            "- **Stale (not in captures)**: {}\n\n",
            self.stale.len()
        ));

        if self.is_complete() {
            md.push_str("**Status: 100% Coverage Match**\n\n");
        } else if !self.undocumented.is_empty() {
            md.push_str(&format!(
                "**Status: {} fields need documentation**\n\n",
                self.undocumented.len()
            ));
        } else {
            md.push_str(&format!(
                "**Status: {} documented fields not observed**\n\n",
                self.stale.len()
            ));
        }

        if !self.undocumented.is_empty() {
            md.push_str("## New Fields (Need Documentation)\n\n");
            md.push_str("These fields were found in captures but are not documented:\n\n");
            push_path_list(&mut md, &self.undocumented);
        }

        if !self.stale.is_empty() {
            md.push_str("## Stale Fields (Not in Captures)\n\n");
            md.push_str("These fields are documented but were not found in captures:\n\n");
            push_path_list(&mut md, &self.stale);
        }

        if !self.matched.is_empty() {
            md.push_str("## Validated Fields\n\n");
            md.push_str(&format!(
                "<details><summary>{} fields validated</summary>\n\n",
                self.matched.len()
            ));
            push_path_list(&mut md, &self.matched);
            md.push_str("</details>\n\n");
        }

        md
    }
}

fn push_path_list(md: &mut String, paths: &BTreeSet<String>) {
    for path in paths {
        md.push_str(&format!("- {}\n", inline_code(path)));
    }
    md.push('\n');
}

/// Extract documented field paths from a Markdown field dictionary
///
/// Picks up table cells of the form `` | `$.data.items[*].id` | ``; the
/// leading `$.` is dropped and `[*]` becomes `[]`.
pub fn parse_field_dictionary(content: &str) -> BTreeSet<String> {
    DICTIONARY_PATH_REGEX
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().replace("[*]", "[]"))
        .collect()
}

/// Load and parse a field dictionary file
pub fn load_field_dictionary(path: &Path) -> Result<BTreeSet<String>, DiscoveryError> {
    if !path.exists() {
        return Err(DiscoveryError::InputNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_field_dictionary(&content))
}

/// Coverage report followed by the diff against a documented path set
pub fn full_report(result: &DiscoveryResult, documented: &BTreeSet<String>) -> String {
    let coverage = CoverageReport::from_result(result).to_markdown();
    let diff = DiffReport::compute(&result.all_field_paths(), documented).to_markdown();
    format!("{}\n---\n\n{}", coverage, diff)
}
