//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid or missing configuration; nothing has been processed
    #[error(transparent)]
    Config(#[from] contracts::ContractError),

    /// A sink could not be built
    #[error(transparent)]
    Dispatcher(#[from] dispatcher::DispatcherError),

    /// Reading the command stream failed
    #[error(transparent)]
    Ingestion(#[from] ingestion::IngestionError),

    /// Pipeline execution error
    #[error("Pipeline execution failed: {message}")]
    PipelineExecution { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn pipeline_execution(message: impl Into<String>) -> Self {
        Self::PipelineExecution {
            message: message.into(),
        }
    }

    /// Process exit code for this error
    ///
    /// 2 for configuration problems, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(e) if e.is_config() => 2,
            _ => 1,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ContractError;

    #[test]
    fn test_exit_codes() {
        let config = CliError::from(ContractError::config_validation("threshold", "bad"));
        assert_eq!(config.exit_code(), 2);

        let closed = CliError::from(ContractError::sink_closed("log"));
        assert_eq!(closed.exit_code(), 1);

        assert_eq!(CliError::pipeline_execution("boom").exit_code(), 1);
    }
}
