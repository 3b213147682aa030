//! BulkConfig - Config Loader output
//!
//! Batching policy and sink layout for one run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkConfig {
    /// Batching policy
    pub batching: BatchingConfig,

    /// Sink layout
    #[serde(default)]
    pub sinks: SinksConfig,
}

impl BulkConfig {
    /// Default layout with the given threshold
    pub fn with_threshold(threshold: usize) -> Self {
        Self {
            batching: BatchingConfig {
                threshold,
                unterminated_block: UnterminatedBlockPolicy::default(),
            },
            sinks: SinksConfig::default(),
        }
    }
}

/// Batcher configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchingConfig {
    /// Sized-mode bulk size, must be > 0
    pub threshold: usize,

    /// What to do with a dynamic block still open at end of stream
    #[serde(default)]
    pub unterminated_block: UnterminatedBlockPolicy,
}

/// Handling of an unbalanced `{` block at end of stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnterminatedBlockPolicy {
    /// Drop the buffered commands (logged)
    #[default]
    Discard,
    /// Emit the buffered commands as a final bulk
    Flush,
}

/// Sink layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinksConfig {
    /// Print bulks to stdout
    #[serde(default = "default_console")]
    pub console: bool,

    /// Number of file-writing workers (0 disables the file sink)
    #[serde(default = "default_file_workers")]
    pub file_workers: usize,

    /// Directory receiving `bulk_*.log` files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for SinksConfig {
    fn default() -> Self {
        Self {
            console: default_console(),
            file_workers: default_file_workers(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_console() -> bool {
    true
}

fn default_file_workers() -> usize {
    2
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: BulkConfig =
            serde_json::from_str(r#"{ "batching": { "threshold": 3 } }"#).unwrap();
        assert_eq!(config, BulkConfig::with_threshold(3));
        assert!(config.sinks.console);
        assert_eq!(config.sinks.file_workers, 2);
        assert_eq!(
            config.batching.unterminated_block,
            UnterminatedBlockPolicy::Discard
        );
    }

    #[test]
    fn test_policy_snake_case() {
        let policy: UnterminatedBlockPolicy = serde_json::from_str(r#""flush""#).unwrap();
        assert_eq!(policy, UnterminatedBlockPolicy::Flush);
    }
}
