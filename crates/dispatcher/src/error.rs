//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// A sink with the same name is already subscribed
    #[error("sink '{name}' is already subscribed")]
    DuplicateSink { name: String },

    /// Worker thread could not be started
    #[error("failed to spawn worker '{worker}' for sink '{sink_name}': {source}")]
    WorkerSpawn {
        sink_name: String,
        worker: String,
        #[source]
        source: std::io::Error,
    },
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
