//! DispatchBus - synchronous fan-out of bulks to sinks

use std::io::Write;
use std::sync::Arc;

use contracts::{Bulk, BulkSink, SinkStat, SinksConfig};
use tracing::{debug, info, instrument, warn};

use crate::error::DispatcherError;
use crate::sinks::{ConsoleSink, FileSink, StatSink};

/// Name of the synchronous counting sink
pub const STAT_SINK_NAME: &str = "main";
/// Name of the console sink
pub const CONSOLE_SINK_NAME: &str = "log";
/// Name of the file sink (workers are `file1..fileN`)
pub const FILE_SINK_NAME: &str = "file";

/// Builder for creating a DispatchBus from configuration
pub struct DispatchBusBuilder {
    config: SinksConfig,
    console_out: Option<Box<dyn Write + Send>>,
}

impl DispatchBusBuilder {
    /// Create a new DispatchBusBuilder
    pub fn new(config: SinksConfig) -> Self {
        Self {
            config,
            console_out: None,
        }
    }

    /// Send console output somewhere other than stdout
    pub fn console_writer(mut self, out: impl Write + Send + 'static) -> Self {
        self.console_out = Some(Box::new(out));
        self
    }

    /// Build the sinks and subscribe them: stat, console, file
    #[instrument(
        name = "dispatch_bus_build",
        skip(self),
        fields(console = self.config.console, file_workers = self.config.file_workers)
    )]
    pub fn build(self) -> Result<DispatchBus, DispatcherError> {
        let mut bus = DispatchBus::new();
        bus.subscribe(Arc::new(StatSink::new(STAT_SINK_NAME)))?;

        if self.config.console {
            let sink = match self.console_out {
                Some(out) => ConsoleSink::with_writer(CONSOLE_SINK_NAME, out)?,
                None => ConsoleSink::stdout(CONSOLE_SINK_NAME)?,
            };
            bus.subscribe(Arc::new(sink))?;
        }

        if self.config.file_workers > 0 {
            let sink = FileSink::new(
                FILE_SINK_NAME,
                &self.config.output_dir,
                self.config.file_workers,
            )?;
            bus.subscribe(Arc::new(sink))?;
        }

        info!(sinks = bus.len(), "Dispatch bus ready");
        Ok(bus)
    }
}

/// Fan-out of bulks to every subscribed sink, in subscription order
///
/// Only the ingestion thread drives the bus. Each delivery is a sink's
/// `enqueue`, which never performs output work for threaded sinks.
#[derive(Default)]
pub struct DispatchBus {
    sinks: Vec<Arc<dyn BulkSink>>,
}

impl DispatchBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a sink
    ///
    /// # Errors
    /// `DispatcherError::DuplicateSink` if a sink with the same name is subscribed
    pub fn subscribe(&mut self, sink: Arc<dyn BulkSink>) -> Result<(), DispatcherError> {
        if self.sinks.iter().any(|s| s.name() == sink.name()) {
            return Err(DispatcherError::DuplicateSink {
                name: sink.name().to_string(),
            });
        }
        debug!(sink = %sink.name(), "Sink subscribed");
        self.sinks.push(sink);
        Ok(())
    }

    /// Subscribed sinks, in delivery order
    pub fn sinks(&self) -> &[Arc<dyn BulkSink>] {
        &self.sinks
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Show a raw input line to every sink
    pub fn observe(&self, line: &str) {
        for sink in &self.sinks {
            sink.observe(line);
        }
    }

    /// Deliver a bulk to every sink
    ///
    /// Returns how many sinks accepted it. A refusing sink is logged and skipped.
    pub fn publish(&self, bulk: &Bulk) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.enqueue(bulk.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(sink = %sink.name(), error = %e, "Bulk not delivered"),
            }
        }
        delivered
    }

    /// Drain and stop every sink, in subscription order
    #[instrument(name = "dispatch_bus_shutdown", skip(self))]
    pub fn shutdown(&self) {
        for sink in &self.sinks {
            sink.drain_and_stop();
        }
        debug!("All sinks stopped");
    }

    /// Final stats of every sink (stops them first)
    pub fn report_stats(&self) -> Vec<SinkStat> {
        self.shutdown();
        self.sinks
            .iter()
            .flat_map(|sink| sink.report_stats())
            .collect()
    }
}
