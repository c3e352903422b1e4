//! Format detection for string samples

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known string format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// ISO 8601 date (YYYY-MM-DD)
    Date,
    /// ISO 8601 date-time (YYYY-MM-DDTHH:MM:SS)
    DateTime,
    /// UUID/GUID
    Uuid,
    /// Email address
    Email,
    /// URI/URL
    Uri,
    /// IPv4 address
    Ipv4,
}

impl Format {
    /// Get the JSON Schema format string for this format
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::Uuid => "uuid",
            Format::Email => "email",
            Format::Uri => "uri",
            Format::Ipv4 => "ipv4",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static URI_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?|wss?|ftp|file)://[^\s/$.?#].[^\s]*$").unwrap());

static IPV4_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .unwrap()
});

/// Detect the format of a single string value
///
/// Checks run from most to least specific.
pub fn detect_format(value: &str) -> Option<Format> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if UUID_REGEX.is_match(value) {
        Some(Format::Uuid)
    } else if DATETIME_REGEX.is_match(value) {
        Some(Format::DateTime)
    } else if DATE_REGEX.is_match(value) {
        Some(Format::Date)
    } else if EMAIL_REGEX.is_match(value) {
        Some(Format::Email)
    } else if URI_REGEX.is_match(value) {
        Some(Format::Uri)
    } else if IPV4_REGEX.is_match(value) {
        Some(Format::Ipv4)
    } else {
        None
    }
}

/// Format shared by every sample, if any
///
/// Returns `None` for an empty sample list, for non-string samples and when
/// the samples disagree.
pub fn common_format<'a>(samples: impl IntoIterator<Item = &'a Value>) -> Option<Format> {
    let mut found: Option<Format> = None;
    for sample in samples {
        let format = detect_format(sample.as_str()?)?;
        match found {
            Some(existing) if existing != format => return None,
            _ => found = Some(format),
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_date_and_datetime() {
        assert_eq!(detect_format("2024-01-15"), Some(Format::Date));
        assert_eq!(detect_format("2024-01-15T10:30:00Z"), Some(Format::DateTime));
        assert_eq!(
            detect_format("2024-01-15T10:30:00.123+05:00"),
            Some(Format::DateTime)
        );
        assert_eq!(detect_format("2024-1-15"), None);
    }

    #[test]
    fn test_detect_uuid_email_uri_ipv4() {
        assert_eq!(
            detect_format("550e8400-e29b-41d4-a716-446655440000"),
            Some(Format::Uuid)
        );
        assert_eq!(detect_format("user@example.com"), Some(Format::Email));
        assert_eq!(detect_format("wss://backend.example.com/ws"), Some(Format::Uri));
        assert_eq!(detect_format("192.168.1.1"), Some(Format::Ipv4));
        assert_eq!(detect_format("   "), None);
    }

    #[test]
    fn test_common_format_requires_agreement() {
        let dates = [json!("2024-01-01"), json!("2024-02-15")];
        assert_eq!(common_format(&dates), Some(Format::Date));

        let mixed = [json!("2024-01-01"), json!("not-a-date")];
        assert_eq!(common_format(&mixed), None);

        let numbers = [json!(1), json!(2)];
        assert_eq!(common_format(&numbers), None);

        assert_eq!(common_format(&Vec::<Value>::new()), None);
    }
}
