//! Render configuration.
//!
//! Controls how result and proposition descriptions are laid out. The
//! configuration is plain data: it can be built in code or parsed from
//! YAML/JSON, and is validated before use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default width (in characters) above which an operand is expanded into
/// its own block in detailed descriptions.
pub const DEFAULT_MAX_LINE_WIDTH: usize = 80;

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Largest accepted `max_line_width`.
pub const LINE_WIDTH_LIMIT: usize = 10_000;

/// Largest accepted `indent_width`.
pub const INDENT_WIDTH_LIMIT: usize = 16;

/// Errors that can occur when loading a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Render configuration validation failed: {0}")]
    ValidationError(String),
}

/// Layout parameters for detailed descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Operands whose compact form is longer than this are expanded
    /// recursively instead of being printed inline.
    pub max_line_width: usize,

    /// Spaces per nesting level.
    pub indent_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_line_width: DEFAULT_MAX_LINE_WIDTH,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl RenderConfig {
    /// Create a config with the given line width and the default indentation.
    pub fn with_max_line_width(max_line_width: usize) -> Self {
        Self {
            max_line_width,
            ..Default::default()
        }
    }

    /// Parse a render configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a render configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=LINE_WIDTH_LIMIT).contains(&self.max_line_width) {
            return Err(ConfigError::ValidationError(format!(
                "max_line_width must be between 1 and {}, got {}",
                LINE_WIDTH_LIMIT, self.max_line_width
            )));
        }

        if !(1..=INDENT_WIDTH_LIMIT).contains(&self.indent_width) {
            return Err(ConfigError::ValidationError(format!(
                "indent_width must be between 1 and {}, got {}",
                INDENT_WIDTH_LIMIT, self.indent_width
            )));
        }

        Ok(())
    }

    /// Leading whitespace for the given nesting depth.
    ///
    /// Unvalidated widths are clamped to [`INDENT_WIDTH_LIMIT`].
    pub fn indentation(&self, depth: usize) -> String {
        " ".repeat(self.indent_width.min(INDENT_WIDTH_LIMIT).saturating_mul(depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.max_line_width, 80);
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.indentation(2), "        ");
    }

    #[test]
    fn test_parse_partial_yaml_keeps_defaults() {
        let config = RenderConfig::from_yaml("max_line_width: 40\n").unwrap();
        assert_eq!(config.max_line_width, 40);
        assert_eq!(config.indent_width, 4);
    }

    #[test]
    fn test_parse_json() {
        let config = RenderConfig::from_json(r#"{"max_line_width": 20, "indent_width": 2}"#).unwrap();
        assert_eq!(config, RenderConfig { max_line_width: 20, indent_width: 2 });
    }

    #[test]
    fn test_zero_indent_rejected() {
        let result = RenderConfig::from_yaml("indent_width: 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_oversized_widths_rejected() {
        let result = RenderConfig::from_yaml("indent_width: 18446744073709551615\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let result = RenderConfig::from_json(r#"{"max_line_width": 10001}"#);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        assert!(RenderConfig::from_yaml("indent_width: 16\nmax_line_width: 10000\n").is_ok());
    }

    #[test]
    fn test_unvalidated_indent_is_clamped() {
        let config = RenderConfig {
            max_line_width: 80,
            indent_width: usize::MAX,
        };
        assert_eq!(config.indentation(1).len(), INDENT_WIDTH_LIMIT);
        assert_eq!(config.indentation(0), "");
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let result = RenderConfig::from_yaml("max_line_width: [1, 2]\n");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }
}
