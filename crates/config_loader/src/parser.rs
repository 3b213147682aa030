//! Config parsing
//!
//! TOML (primary) and JSON.

use contracts::{BulkConfig, ContractError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<BulkConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<BulkConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<BulkConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::UnterminatedBlockPolicy;

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
[batching]
threshold = 3
unterminated_block = "flush"

[sinks]
console = false
file_workers = 4
output_dir = "logs"
"#;
        let config = parse_toml(content).unwrap();
        assert_eq!(config.batching.threshold, 3);
        assert_eq!(
            config.batching.unterminated_block,
            UnterminatedBlockPolicy::Flush
        );
        assert!(!config.sinks.console);
        assert_eq!(config.sinks.file_workers, 4);
        assert_eq!(config.sinks.output_dir, std::path::PathBuf::from("logs"));
    }

    #[test]
    fn test_parse_toml_minimal() {
        let config = parse_toml("[batching]\nthreshold = 5\n").unwrap();
        assert_eq!(config, BulkConfig::with_threshold(5));
    }

    #[test]
    fn test_parse_json_minimal() {
        let config = parse_json(r#"{ "batching": { "threshold": 2 }, "sinks": { "file_workers": 1 } }"#)
            .unwrap();
        assert_eq!(config.batching.threshold, 2);
        assert_eq!(config.sinks.file_workers, 1);
        assert!(config.sinks.console);
    }

    #[test]
    fn test_parse_negative_threshold_fails() {
        let err = parse_toml("[batching]\nthreshold = -1\n").unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let err = parse_toml("invalid toml [[[").unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
