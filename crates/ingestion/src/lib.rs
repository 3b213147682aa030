//! # Ingestion
//!
//! Command stream reading and the ingestion loop.
//!
//! Responsibilities:
//! - Turn a line-oriented source into an ordered stream of commands
//! - Drive `Batcher` and `DispatchBus` from the single ingestion thread

mod error;
mod pipeline;
mod reader;

pub use error::{IngestionError, Result};
pub use pipeline::{ingest, IngestSummary};
pub use reader::CommandReader;
