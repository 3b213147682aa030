//! # Dispatcher
//!
//! Bulk distribution.
//!
//! Responsibilities:
//! - Fan each completed `Bulk` out to every sink (`DispatchBus`)
//! - Per-sink unbounded queue drained by a worker pool, off the ingestion thread
//! - Graceful drain-and-stop, then final per-worker statistics
//!
//! ## Ordering
//!
//! Every sink receives bulks in ingestion order. Single-worker sinks (console)
//! also produce output in that order. Multi-worker sinks (file) write every
//! bulk exactly once, but concurrent workers may finish in any order.

pub mod bus;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod queue;
pub mod sinks;
pub mod writer;

pub use bus::{DispatchBus, DispatchBusBuilder, CONSOLE_SINK_NAME, FILE_SINK_NAME, STAT_SINK_NAME};
pub use contracts::{Bulk, BulkSink, SinkStat};
pub use error::DispatcherError;
pub use metrics::SinkCounters;
pub use pool::WorkerPool;
pub use queue::BulkQueue;
pub use sinks::{ConsoleSink, ConsoleWriter, FileSink, FileWriter, StatSink};
pub use writer::BulkWriter;
