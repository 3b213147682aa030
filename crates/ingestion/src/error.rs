//! Ingestion error types

use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Reading the underlying source failed
    #[error("failed to read line {line}: {source}")]
    Read {
        /// 1-based line number that could not be read
        line: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
