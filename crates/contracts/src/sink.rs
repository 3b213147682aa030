//! BulkSink trait - Dispatch Bus output interface
//!
//! Defines the abstract interface for sinks.

use crate::{Bulk, ContractError, SinkStat};

/// Downstream consumer of bulks
///
/// All methods take `&self` so a sink can be shared between the ingestion
/// thread (which enqueues) and whoever stops it and reads its stats.
pub trait BulkSink: Send + Sync {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Observe one raw input line, control tokens included
    ///
    /// Called for every line before the batcher sees it. Most sinks ignore it.
    fn observe(&self, _line: &str) {}

    /// Hand over a completed bulk
    ///
    /// Must be O(1): never perform the sink's output work on the caller's thread,
    /// unless the sink is synchronous by nature.
    ///
    /// # Errors
    /// Returns `ContractError::SinkClosed` once the sink has been stopped
    fn enqueue(&self, bulk: Bulk) -> Result<(), ContractError>;

    /// Stop accepting bulks, process everything already queued, join workers
    ///
    /// Idempotent: later calls (from any thread) wait for the first one to finish
    /// and then return immediately.
    fn drain_and_stop(&self);

    /// Final statistics, one entry per worker
    ///
    /// Drains and stops the sink first so the counters are final.
    fn report_stats(&self) -> Vec<SinkStat>;
}
