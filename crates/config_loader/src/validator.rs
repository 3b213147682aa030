//! Config validation
//!
//! Rules:
//! - batching.threshold > 0
//! - sinks.file_workers <= MAX_FILE_WORKERS
//! - sinks.output_dir not empty when the file sink is enabled

use contracts::{BulkConfig, ContractError};

/// Upper bound on file-sink worker threads
pub const MAX_FILE_WORKERS: usize = 64;

/// Validate a BulkConfig
///
/// Returns the first error found, or Ok(()).
pub fn validate(config: &BulkConfig) -> Result<(), ContractError> {
    validate_threshold(config)?;
    validate_sinks(config)?;
    Ok(())
}

fn validate_threshold(config: &BulkConfig) -> Result<(), ContractError> {
    if config.batching.threshold == 0 {
        return Err(ContractError::config_validation(
            "batching.threshold",
            "must be a positive integer",
        ));
    }
    Ok(())
}

fn validate_sinks(config: &BulkConfig) -> Result<(), ContractError> {
    let sinks = &config.sinks;
    if sinks.file_workers > MAX_FILE_WORKERS {
        return Err(ContractError::config_validation(
            "sinks.file_workers",
            format!("must be at most {MAX_FILE_WORKERS}, got {}", sinks.file_workers),
        ));
    }
    if sinks.file_workers > 0 && sinks.output_dir.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "sinks.output_dir",
            "must not be empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_default() {
        assert!(validate(&BulkConfig::with_threshold(1)).is_ok());
    }

    #[test]
    fn test_zero_threshold() {
        let err = validate(&BulkConfig::with_threshold(0)).unwrap_err();
        assert!(
            matches!(err, ContractError::ConfigValidation { ref field, .. } if field == "batching.threshold")
        );
    }

    #[test]
    fn test_too_many_workers() {
        let mut config = BulkConfig::with_threshold(3);
        config.sinks.file_workers = MAX_FILE_WORKERS + 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_dir() {
        let mut config = BulkConfig::with_threshold(3);
        config.sinks.output_dir = PathBuf::new();
        assert!(validate(&config).is_err());

        config.sinks.file_workers = 0;
        assert!(validate(&config).is_ok());
    }
}
