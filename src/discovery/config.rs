//! Configuration for field discovery

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::DiscoveryError;

/// Configuration for field discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryConfig {
    /// Maximum nesting depth the walker descends into
    pub max_depth: usize,

    /// Maximum number of distinct sample values kept per field path
    pub max_samples: usize,

    /// Strings longer than this are truncated in samples
    pub max_sample_len: usize,

    /// Number of leading scalar array elements sampled per array
    pub array_sample_limit: usize,

    /// Objects with more keys than this are treated as dynamic maps
    pub dynamic_key_threshold: usize,

    /// Name of the field that carries the event type
    pub event_field: String,

    /// Glob pattern for capture files inside a directory
    pub pattern: String,

    /// Scan capture files on the rayon thread pool
    pub parallel: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_samples: 5,
            max_sample_len: 100,
            array_sample_limit: 3,
            dynamic_key_threshold: 20,
            event_field: "event".to_string(),
            pattern: "*.jsonl".to_string(),
            parallel: true,
        }
    }
}

impl DiscoveryConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> DiscoveryConfigBuilder {
        DiscoveryConfigBuilder::default()
    }

    /// Parse a TOML configuration. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, DiscoveryError> {
        let config: DiscoveryConfig =
            toml::from_str(content).map_err(|e| DiscoveryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn from_toml_file(path: &Path) -> Result<Self, DiscoveryError> {
        if !path.exists() {
            return Err(DiscoveryError::InputNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check the configuration for values that would make discovery meaningless
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.max_depth == 0 {
            return Err(DiscoveryError::Config("maxDepth must be at least 1".to_string()));
        }
        if self.max_samples == 0 {
            return Err(DiscoveryError::Config(
                "maxSamples must be at least 1".to_string(),
            ));
        }
        if self.event_field.is_empty() {
            return Err(DiscoveryError::Config(
                "eventField must not be empty".to_string(),
            ));
        }
        if self.pattern.is_empty() {
            return Err(DiscoveryError::Config("pattern must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for DiscoveryConfig
#[derive(Debug, Default)]
pub struct DiscoveryConfigBuilder {
    config: DiscoveryConfig,
}

impl DiscoveryConfigBuilder {
    /// Start from an existing configuration
    pub fn from_config(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth.max(1);
        self
    }

    /// Set the sample cap per field path
    pub fn max_samples(mut self, max: usize) -> Self {
        self.config.max_samples = max.max(1);
        self
    }

    /// Set the truncation length for string samples
    pub fn max_sample_len(mut self, len: usize) -> Self {
        self.config.max_sample_len = len;
        self
    }

    /// Set how many leading scalar array elements are sampled
    pub fn array_sample_limit(mut self, limit: usize) -> Self {
        self.config.array_sample_limit = limit;
        self
    }

    /// Set the key count above which objects are treated as dynamic maps
    pub fn dynamic_key_threshold(mut self, threshold: usize) -> Self {
        self.config.dynamic_key_threshold = threshold;
        self
    }

    /// Set the event discriminator field name
    pub fn event_field(mut self, field: impl Into<String>) -> Self {
        self.config.event_field = field.into();
        self
    }

    /// Set the capture file glob pattern
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    /// Enable or disable parallel file scanning
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DiscoveryConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.max_samples, 5);
        assert_eq!(config.event_field, "event");
        assert_eq!(config.pattern, "*.jsonl");
    }

    #[test]
    fn test_builder() {
        let config = DiscoveryConfig::builder()
            .max_depth(4)
            .max_samples(8)
            .event_field("type")
            .parallel(false)
            .build();

        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_samples, 8);
        assert_eq!(config.event_field, "type");
        assert!(!config.parallel);
    }

    #[test]
    fn test_builder_clamps_zero() {
        let config = DiscoveryConfig::builder().max_samples(0).max_depth(0).build();
        assert_eq!(config.max_samples, 1);
        assert_eq!(config.max_depth, 1);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = DiscoveryConfig::from_toml_str(
            r#"
maxSamples = 3
eventField = "type"
"#,
        )
        .unwrap();

        assert_eq!(config.max_samples, 3);
        assert_eq!(config.event_field, "type");
        assert_eq!(config.max_depth, 10);
    }

    #[test]
    fn test_from_toml_rejects_zero_samples() {
        let err = DiscoveryConfig::from_toml_str("maxSamples = 0").unwrap_err();
        assert!(matches!(err, DiscoveryError::Config(_)));
    }
}
