//! Ingestion loop: reader -> batcher -> dispatch bus

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use batcher::Batcher;
use dispatcher::DispatchBus;
use tracing::{debug, error, info, instrument};

use crate::error::Result;
use crate::reader::CommandReader;

/// What the ingestion loop saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Lines read, control tokens included
    pub lines: u64,
    /// Bulks published on the bus
    pub bulks: u64,
    /// Commands lost in an unterminated block
    pub discarded: usize,
    /// Stopped early through the stop flag
    pub interrupted: bool,
}

/// Run the whole stream through the batcher and publish every bulk
///
/// Every line is shown to the bus before the batcher sees it. At end of stream
/// the batcher is finished and its last bulk published. A read error ends the
/// stream the same way, then is returned. Setting `stop` ends ingestion
/// before the next line without the final flush.
#[instrument(name = "ingest", skip_all, fields(threshold = batcher.threshold()))]
pub fn ingest<R: BufRead>(
    reader: CommandReader<R>,
    batcher: &mut Batcher,
    bus: &DispatchBus,
    stop: &AtomicBool,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();
    let mut failure = None;

    for line in reader {
        if stop.load(Ordering::Acquire) {
            summary.interrupted = true;
            info!(lines = summary.lines, "Ingestion interrupted");
            return Ok(summary);
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "Command stream failed, flushing what was read");
                failure = Some(e);
                break;
            }
        };

        summary.lines += 1;
        bus.observe(&line);
        if let Some(bulk) = batcher.push(&line) {
            bus.publish(&bulk);
            summary.bulks += 1;
        }
    }

    let end = batcher.finish();
    if let Some(bulk) = end.bulk {
        bus.publish(&bulk);
        summary.bulks += 1;
    }
    summary.discarded = end.discarded;

    debug!(
        lines = summary.lines,
        bulks = summary.bulks,
        discarded = summary.discarded,
        "Ingestion finished"
    );

    match failure {
        Some(e) => Err(e),
        None => Ok(summary),
    }
}
