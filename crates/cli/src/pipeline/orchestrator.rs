//! Pipeline orchestrator - coordinates all components.
//!
//! stdin -> Batcher -> DispatchBus -> sinks, with Ctrl+C handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use batcher::Batcher;
use contracts::BulkConfig;
use dispatcher::{DispatchBus, DispatchBusBuilder};
use ingestion::{ingest, CommandReader, IngestSummary, IngestionError};
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use super::PipelineStats;
use crate::error::{CliError, Result};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated run configuration
    pub bulk: BulkConfig,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

/// How a run ended
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Final stats, collected after every sink drained
    pub stats: PipelineStats,
    /// Ingestion failure, reported after the stats
    pub failure: Option<CliError>,
}

/// Why ingestion stopped
#[derive(Debug)]
enum Ended {
    Finished(IngestSummary),
    Failed(CliError),
    Interrupted,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline over stdin to completion (or Ctrl+C)
    ///
    /// The batcher is validated before any sink exists. Ingestion runs on its
    /// own thread; this task waits for it or for a shutdown signal, then drains
    /// every sink and collects the final stats. A failed ingestion still
    /// yields stats, with the error in `PipelineOutcome::failure`.
    pub async fn run(self) -> Result<PipelineOutcome> {
        let start_time = Instant::now();

        let mut batcher = Batcher::new(self.config.bulk.batching)?;
        let bus = Arc::new(DispatchBusBuilder::new(self.config.bulk.sinks.clone()).build()?);
        let stop = Arc::new(AtomicBool::new(false));

        let (done_tx, done_rx) = oneshot::channel::<std::result::Result<IngestSummary, IngestionError>>();
        {
            let bus = Arc::clone(&bus);
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("ingest".to_string())
                .spawn(move || {
                    let result = ingest(CommandReader::stdin(), &mut batcher, &bus, &stop);
                    let _ = done_tx.send(result);
                })?;
        }

        info!(sinks = bus.len(), "Pipeline started, reading commands from stdin");

        let ended = tokio::select! {
            result = done_rx => match result {
                Ok(Ok(summary)) => Ended::Finished(summary),
                Ok(Err(e)) => Ended::Failed(CliError::from(e)),
                Err(_) => {
                    error!("Ingestion thread ended without a result");
                    Ended::Failed(CliError::pipeline_execution("ingestion thread panicked"))
                }
            },
            _ = shutdown_signal() => {
                warn!("Received shutdown signal, draining sinks...");
                stop.store(true, Ordering::Release);
                Ended::Interrupted
            }
        };

        conclude(bus, ended, start_time).await
    }
}

/// Drain every sink and pair the final stats with how ingestion ended
///
/// After an interrupt the ingestion thread may still be blocked on stdin;
/// anything it delivers later is refused by the stopped sinks.
async fn conclude(bus: Arc<DispatchBus>, ended: Ended, start_time: Instant) -> Result<PipelineOutcome> {
    let sinks = drain(bus).await?;

    let (summary, failure, interrupted) = match ended {
        Ended::Finished(summary) => (Some(summary), None, false),
        Ended::Failed(e) => (None, Some(e), false),
        Ended::Interrupted => (None, None, true),
    };

    let stats = PipelineStats::new(sinks, summary, start_time.elapsed(), interrupted);
    stats.log();
    Ok(PipelineOutcome { stats, failure })
}

/// Stop every sink off the async runtime (joining threads blocks)
async fn drain(bus: Arc<DispatchBus>) -> Result<Vec<contracts::SinkStat>> {
    tokio::task::spawn_blocking(move || bus.report_stats())
        .await
        .map_err(|e| CliError::pipeline_execution(format!("drain task failed: {e}")))
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Bulk, SinksConfig};

    fn stat_only_bus() -> Arc<DispatchBus> {
        let config = SinksConfig {
            console: false,
            file_workers: 0,
            output_dir: ".".into(),
        };
        Arc::new(DispatchBusBuilder::new(config).build().unwrap())
    }

    #[tokio::test]
    async fn test_interrupted_run_still_reports() {
        let bus = stat_only_bus();
        bus.observe("a");
        bus.publish(&Bulk::new(vec!["a".into()]));

        let outcome = conclude(Arc::clone(&bus), Ended::Interrupted, Instant::now())
            .await
            .unwrap();
        assert!(outcome.stats.interrupted);
        assert!(outcome.failure.is_none());
        assert_eq!(outcome.stats.sinks[0].bulk_count, 1);

        // a late line from the still-running ingestion thread changes nothing
        bus.observe("b");
        assert_eq!(bus.publish(&Bulk::new(vec!["b".into()])), 0);
        assert_eq!(bus.report_stats(), outcome.stats.sinks);
    }

    #[tokio::test]
    async fn test_failed_run_keeps_stats() {
        let bus = stat_only_bus();
        bus.publish(&Bulk::new(vec!["a".into(), "b".into()]));

        let outcome = conclude(
            bus,
            Ended::Failed(CliError::pipeline_execution("boom")),
            Instant::now(),
        )
        .await
        .unwrap();
        assert!(!outcome.stats.interrupted);
        assert!(matches!(outcome.failure, Some(CliError::PipelineExecution { .. })));
        assert_eq!(outcome.stats.sinks[0].command_count, 2);
    }
}
