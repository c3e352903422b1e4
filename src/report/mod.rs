//! Markdown and structured reports over discovery results

mod coverage;
mod diff;

pub use coverage::{
    CoverageReport, ERROR_PREVIEW_LIMIT, EventCoverage, FIELD_SAMPLE_LIMIT, FIELD_SAMPLE_WIDTH,
    FieldCoverage,
};
pub use diff::{DiffReport, full_report, load_field_dictionary, parse_field_dictionary};

/// Format a count with thousands separators (`12,345`)
pub(crate) fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Wrap text in backticks for inline code
pub(crate) fn inline_code(text: &str) -> String {
    format!("`{}`", text)
}

/// Escape pipes so text stays inside one table cell
pub(crate) fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_table_cell_escapes_pipes() {
        assert_eq!(table_cell("a|b\nc"), "a\\|b c");
    }
}
