//! Freezable counters for synchronous sinks

use std::sync::Mutex;

use contracts::{Bulk, SinkStat};

use crate::queue::lock;

#[derive(Debug, Default)]
struct Counts {
    line_count: u64,
    bulk_count: u64,
    command_count: u64,
    frozen: bool,
}

/// Counters updated on the caller's thread
///
/// Once frozen, every update is refused, so a snapshot taken after `freeze`
/// never changes again.
#[derive(Debug, Default)]
pub struct SinkCounters {
    counts: Mutex<Counts>,
}

impl SinkCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one raw input line. Returns `false` if frozen.
    pub fn inc_line_count(&self) -> bool {
        let mut counts = lock(&self.counts);
        if counts.frozen {
            return false;
        }
        counts.line_count += 1;
        true
    }

    /// Count one bulk and its commands. Returns `false` if frozen.
    pub fn record_bulk(&self, bulk: &Bulk) -> bool {
        let mut counts = lock(&self.counts);
        if counts.frozen {
            return false;
        }
        counts.bulk_count += 1;
        counts.command_count += bulk.len() as u64;
        true
    }

    /// Refuse all further updates
    pub fn freeze(&self) {
        lock(&self.counts).frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        lock(&self.counts).frozen
    }

    /// Snapshot as a `SinkStat` (for reporting)
    pub fn snapshot(&self, name: &str) -> SinkStat {
        let counts = lock(&self.counts);
        SinkStat {
            name: name.to_string(),
            bulk_count: counts.bulk_count,
            command_count: counts.command_count,
            failed_bulks: 0,
            line_count: Some(counts.line_count),
        }
    }
}
