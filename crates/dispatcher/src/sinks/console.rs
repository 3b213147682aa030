//! ConsoleSink - prints each bulk on one line from a dedicated thread

use std::io::{self, Write};

use contracts::{Bulk, BulkSink, ContractError, SinkStat};
use tracing::debug;

use crate::error::DispatcherError;
use crate::pool::WorkerPool;
use crate::writer::BulkWriter;

/// Writer rendering `bulk: c1, c2, ..., cN`
pub struct ConsoleWriter {
    name: String,
    out: Box<dyn Write + Send>,
}

impl ConsoleWriter {
    pub fn new(name: impl Into<String>, out: impl Write + Send + 'static) -> Self {
        Self {
            name: name.into(),
            out: Box::new(out),
        }
    }
}

impl BulkWriter for ConsoleWriter {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, bulk: &Bulk) -> Result<(), ContractError> {
        if bulk.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{bulk}")
            .and_then(|()| self.out.flush())
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        self.out
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }
}

/// Single-worker sink: output order equals arrival order
pub struct ConsoleSink {
    pool: WorkerPool,
}

impl ConsoleSink {
    /// Console sink printing to stdout
    pub fn stdout(name: impl Into<String>) -> Result<Self, DispatcherError> {
        Self::with_writer(name, io::stdout())
    }

    /// Console sink printing to any writer
    pub fn with_writer(
        name: impl Into<String>,
        out: impl Write + Send + 'static,
    ) -> Result<Self, DispatcherError> {
        let name = name.into();
        let writer = ConsoleWriter::new(name.clone(), out);
        let pool = WorkerPool::spawn(name, vec![writer])?;
        debug!(sink = %pool.name(), "ConsoleSink created");
        Ok(Self { pool })
    }
}

impl BulkSink for ConsoleSink {
    fn name(&self) -> &str {
        self.pool.name()
    }

    fn enqueue(&self, bulk: Bulk) -> Result<(), ContractError> {
        self.pool.enqueue(bulk)
    }

    fn drain_and_stop(&self) {
        self.pool.drain_and_stop();
    }

    fn report_stats(&self) -> Vec<SinkStat> {
        self.pool.stats()
    }
}
