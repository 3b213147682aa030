//! Pipeline statistics and the final report.

use std::io::{self, Write};
use std::time::Duration;

use contracts::SinkStat;
use ingestion::IngestSummary;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::StatsFormat;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Final stats, one entry per sink worker, in subscription order
    pub sinks: Vec<SinkStat>,

    /// Ingestion summary (None if ingestion did not finish)
    pub ingest: Option<IngestSummary>,

    /// Total duration of the run
    pub duration: Duration,

    /// Stopped by a shutdown signal
    pub interrupted: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    sinks: &'a [SinkStat],
    interrupted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    discarded_commands: Option<usize>,
}

impl PipelineStats {
    pub fn new(
        sinks: Vec<SinkStat>,
        ingest: Option<IngestSummary>,
        duration: Duration,
        interrupted: bool,
    ) -> Self {
        Self {
            sinks,
            ingest,
            duration,
            interrupted,
        }
    }

    /// Commands lost to an unterminated block
    pub fn discarded(&self) -> usize {
        self.ingest.map(|s| s.discarded).unwrap_or(0)
    }

    /// Emit a one-line summary through tracing
    pub fn log(&self) {
        info!(
            sinks = self.sinks.len(),
            lines = self.ingest.map(|s| s.lines),
            bulks = self.ingest.map(|s| s.bulks),
            duration_secs = self.duration.as_secs_f64(),
            interrupted = self.interrupted,
            "Pipeline finished"
        );
        if self.discarded() > 0 {
            warn!(
                commands = self.discarded(),
                "Input ended inside a '{{' block; those commands were not emitted"
            );
        }
    }

    /// Write the report in the requested format
    pub fn write_report(&self, format: StatsFormat, out: &mut impl Write) -> io::Result<()> {
        match format {
            StatsFormat::Text => {
                for stat in &self.sinks {
                    writeln!(out, "{stat}")?;
                }
            }
            StatsFormat::Json => {
                let report = JsonReport {
                    sinks: &self.sinks,
                    interrupted: self.interrupted,
                    discarded_commands: (self.discarded() > 0).then_some(self.discarded()),
                };
                serde_json::to_writer_pretty(&mut *out, &report).map_err(io::Error::other)?;
                writeln!(out)?;
            }
            StatsFormat::None => {}
        }
        out.flush()
    }

    /// Print the report to stdout
    pub fn print_report(&self, format: StatsFormat) -> io::Result<()> {
        self.write_report(format, &mut io::stdout().lock())
    }
}
