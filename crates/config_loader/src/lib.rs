//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Parse a bare threshold given on the command line
//! - Validate configuration before any sink is built
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("bulk.toml")).unwrap();
//! println!("threshold: {}", config.batching.threshold);
//! ```

mod parser;
mod validator;

pub use contracts::BulkConfig;
pub use parser::ConfigFormat;
pub use validator::MAX_FILE_WORKERS;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<BulkConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<BulkConfig, ContractError> {
        let config = parser::parse(content, format)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate an already built configuration
    pub fn validate(config: &BulkConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Parse the batching threshold as given on the command line
    ///
    /// # Errors
    /// `ConfigValidation` for non-numeric, negative, or zero values
    pub fn parse_threshold(raw: &str) -> Result<usize, ContractError> {
        let invalid = || {
            ContractError::config_validation(
                "threshold",
                format!("expected a positive integer, got '{raw}'"),
            )
        };
        let threshold: usize = raw.trim().parse().map_err(|_| invalid())?;
        if threshold == 0 {
            return Err(invalid());
        }
        Ok(threshold)
    }

    /// Serialize BulkConfig to TOML string
    pub fn to_toml(config: &BulkConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    ///
    /// An unreadable file is a configuration error like a malformed one.
    fn read_file(path: &Path) -> Result<String, ContractError> {
        std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }
}
