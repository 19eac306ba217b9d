use crate::trace::{TraceCategory, TraceFilter};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Trace view configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TraceViewConfig {
    /// Buffer sub-lines under a row and only create child rows when the row
    /// is first expanded
    #[serde(default = "default_true")]
    pub cache_sub_text: bool,

    /// Expand rows as the trace is created (disables sub-text caching)
    #[serde(default = "default_false")]
    pub auto_expand: bool,

    /// Spaces of indentation per subgoal level (0-10)
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Number of top-level rows treated as one page by "expand page"
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Trace categories to display
    #[serde(default = "default_show")]
    pub show: Vec<TraceCategory>,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_indent_size() -> usize {
    3
}

fn default_page_size() -> usize {
    50
}

fn default_show() -> Vec<TraceCategory> {
    TraceCategory::ALL.to_vec()
}

const MAX_INDENT_SIZE: usize = 10;

impl Default for TraceViewConfig {
    fn default() -> Self {
        Self {
            cache_sub_text: true,
            auto_expand: false,
            indent_size: default_indent_size(),
            page_size: default_page_size(),
            show: default_show(),
        }
    }
}

impl TraceViewConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.as_ref().display(), e)))?;

        let config: TraceViewConfig = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.as_ref().display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;

        let contents = self.to_json_pretty()?;
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// JSON schema describing this configuration
    pub fn json_schema() -> Result<String, ConfigError> {
        let schema = schemars::schema_for!(TraceViewConfig);
        serde_json::to_string_pretty(&schema).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_size > MAX_INDENT_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "indent_size must be at most {}, got {}",
                MAX_INDENT_SIZE, self.indent_size
            )));
        }

        if self.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "page_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether sub-lines are buffered until expansion
    pub fn caching_enabled(&self) -> bool {
        self.cache_sub_text && !self.auto_expand
    }

    pub fn trace_filter(&self) -> TraceFilter {
        self.show.iter().copied().collect()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = TraceViewConfig::default();
        assert!(config.cache_sub_text);
        assert!(!config.auto_expand);
        assert_eq!(config.indent_size, 3);
        assert_eq!(config.page_size, 50);
        assert!(config.caching_enabled());
        assert_eq!(config.trace_filter(), TraceFilter::all());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: TraceViewConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TraceViewConfig::default());
    }

    #[test]
    fn test_auto_expand_disables_caching() {
        let config = TraceViewConfig {
            auto_expand: true,
            ..Default::default()
        };
        assert!(config.cache_sub_text);
        assert!(!config.caching_enabled());
    }

    #[test]
    fn test_config_validation() {
        let mut config = TraceViewConfig::default();
        assert!(config.validate().is_ok());

        config.indent_size = 11;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        config.indent_size = 0;
        config.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{ "indent_size": 2, "show": ["stack", "firing"] }"#,
        )
        .unwrap();

        let config = TraceViewConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.indent_size, 2);
        assert!(config.cache_sub_text);
        let filter = config.trace_filter();
        assert!(filter.contains(TraceCategory::Stack));
        assert!(!filter.contains(TraceCategory::Phase));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{ "page_size": 0 }"#).unwrap();
        assert!(matches!(
            TraceViewConfig::load_from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));

        std::fs::write(file.path(), "not json").unwrap();
        assert!(matches!(
            TraceViewConfig::load_from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let file = NamedTempFile::new().unwrap();
        let config = TraceViewConfig {
            auto_expand: true,
            page_size: 10,
            ..Default::default()
        };
        config.save_to_file(file.path()).unwrap();

        let loaded = TraceViewConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let result = TraceViewConfig::load_from_file("/nonexistent/trace-view.json");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_schema_mentions_fields() {
        let schema = TraceViewConfig::json_schema().unwrap();
        assert!(schema.contains("cache_sub_text"));
        assert!(schema.contains("wme_change"));
    }
}
