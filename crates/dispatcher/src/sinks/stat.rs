//! StatSink - synchronous counting sink, no worker thread

use contracts::{Bulk, BulkSink, ContractError, SinkStat};
use tracing::trace;

use crate::metrics::SinkCounters;

/// Sink that only counts, on the caller's thread
///
/// Besides bulks and commands it counts every raw input line (control tokens
/// included), independently of whether a bulk completes. Stopping freezes the
/// counters.
pub struct StatSink {
    name: String,
    counters: SinkCounters,
}

impl StatSink {
    /// Create a new StatSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            counters: SinkCounters::new(),
        }
    }
}

impl Default for StatSink {
    fn default() -> Self {
        Self::new("main")
    }
}

impl BulkSink for StatSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn observe(&self, line: &str) {
        if !self.counters.inc_line_count() {
            trace!(sink = %self.name, line, "Line after stop ignored");
        }
    }

    fn enqueue(&self, bulk: Bulk) -> Result<(), ContractError> {
        if !self.counters.record_bulk(&bulk) {
            return Err(ContractError::sink_closed(&self.name));
        }
        trace!(sink = %self.name, commands = bulk.len(), "Bulk counted");
        Ok(())
    }

    fn drain_and_stop(&self) {
        self.counters.freeze();
    }

    fn report_stats(&self) -> Vec<SinkStat> {
        self.drain_and_stop();
        vec![self.counters.snapshot(&self.name)]
    }
}
