//! Pipeline configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use thicket_graph::MAX_LABEL_LENGTH;
use thicket_symbol::DefinitionRules;

/// Default bound on nested statement definitions
pub const DEFAULT_MAX_STATEMENT_DEPTH: usize = 64;

/// Limits and switches shared by every content type pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum nesting of statement definitions
    pub max_statement_depth: usize,
    /// Maximum label length in characters
    pub max_label_length: usize,
    /// Reject reserved classes on resource definitions
    pub reject_reserved_classes: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_statement_depth: DEFAULT_MAX_STATEMENT_DEPTH,
            max_label_length: MAX_LABEL_LENGTH,
            reject_reserved_classes: true,
        }
    }
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set maximum statement nesting
    #[inline]
    #[must_use]
    pub fn with_max_statement_depth(mut self, depth: usize) -> Self {
        self.max_statement_depth = depth;
        self
    }

    /// Builder: set maximum label length
    #[inline]
    #[must_use]
    pub fn with_max_label_length(mut self, length: usize) -> Self {
        self.max_label_length = length;
        self
    }

    /// Builder: allow or reject reserved classes
    #[inline]
    #[must_use]
    pub fn with_reject_reserved_classes(mut self, reject: bool) -> Self {
        self.reject_reserved_classes = reject;
        self
    }

    /// Parse configuration from TOML
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed TOML
    /// - `ConfigError::InvalidValue` for zero limits
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::InvalidValue` naming the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_statement_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_statement_depth",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_label_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_label_length",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Rules handed to the definition validator
    #[inline]
    #[must_use]
    pub fn definition_rules(&self) -> DefinitionRules {
        DefinitionRules {
            max_label_length: self.max_label_length,
            reject_reserved_classes: self.reject_reserved_classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::new();
        assert_eq!(config.max_statement_depth, 64);
        assert_eq!(config.max_label_length, MAX_LABEL_LENGTH);
        assert!(config.reject_reserved_classes);
    }

    #[test]
    fn builder_overrides() {
        let config = PipelineConfig::new()
            .with_max_statement_depth(3)
            .with_max_label_length(10)
            .with_reject_reserved_classes(false);
        assert_eq!(config.max_statement_depth, 3);
        assert_eq!(config.definition_rules().max_label_length, 10);
        assert!(!config.definition_rules().reject_reserved_classes);
    }

    #[test]
    fn toml_fills_missing_keys() {
        let config = PipelineConfig::from_toml_str("max_statement_depth = 8\n").unwrap();
        assert_eq!(config.max_statement_depth, 8);
        assert_eq!(config.max_label_length, MAX_LABEL_LENGTH);
    }

    #[test]
    fn toml_rejects_zero_depth() {
        let err = PipelineConfig::from_toml_str("max_statement_depth = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_statement_depth",
                ..
            }
        ));
    }

    #[test]
    fn toml_rejects_garbage() {
        assert!(matches!(
            PipelineConfig::from_toml_str("max_label_length = \"long\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
