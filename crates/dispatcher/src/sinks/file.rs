//! FileSink - N workers writing one file per bulk

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use contracts::{Bulk, BulkSink, ContractError, SinkStat};
use tracing::{debug, instrument};

use crate::error::DispatcherError;
use crate::pool::WorkerPool;
use crate::writer::BulkWriter;

/// Writer creating `bulk_<worker>_<epoch>[_<n>].log`, one command per line
pub struct FileWriter {
    name: String,
    dir: PathBuf,
}

impl FileWriter {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }

    /// Candidate path for the given second and collision index
    fn candidate(&self, epoch: i64, attempt: u32) -> PathBuf {
        let file_name = if attempt == 0 {
            format!("bulk_{}_{}.log", self.name, epoch)
        } else {
            format!("bulk_{}_{}_{}.log", self.name, epoch, attempt)
        };
        self.dir.join(file_name)
    }

    /// Create a file that did not exist before, probing suffixes on collision
    fn create_unique(&self, epoch: i64) -> io::Result<(PathBuf, File)> {
        let mut attempt = 0;
        loop {
            let path = self.candidate(epoch, attempt);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }

    fn write_bulk_to_disk(&self, bulk: &Bulk) -> io::Result<PathBuf> {
        let epoch = chrono::Utc::now().timestamp();
        let (path, file) = self.create_unique(epoch)?;

        let mut out = BufWriter::new(file);
        for command in bulk {
            writeln!(out, "{command}")?;
        }
        out.flush()?;
        Ok(path)
    }
}

impl BulkWriter for FileWriter {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_writer_write",
        skip(self, bulk),
        fields(worker = %self.name, commands = bulk.len())
    )]
    fn write(&mut self, bulk: &Bulk) -> Result<(), ContractError> {
        if bulk.is_empty() {
            return Ok(());
        }
        match self.write_bulk_to_disk(bulk) {
            Ok(path) => {
                debug!(path = %path.display(), "Bulk written");
                Ok(())
            }
            Err(e) => Err(ContractError::sink_write(
                &self.name,
                format!("{}: {e}", self.dir.display()),
            )),
        }
    }
}

/// Multi-worker file sink
///
/// Workers share one queue and keep separate stats, so `report_stats` yields
/// one entry per worker. Bulks are written exactly once, but two bulks taken
/// by different workers may land on disk in either order.
pub struct FileSink {
    pool: WorkerPool,
}

impl FileSink {
    /// Create a FileSink with `workers` threads named `file1..fileN`
    pub fn new(
        name: impl Into<String>,
        dir: impl AsRef<Path>,
        workers: usize,
    ) -> Result<Self, DispatcherError> {
        let name = name.into();
        if workers == 0 {
            return Err(DispatcherError::sink_creation(
                name,
                "at least one worker is required",
            ));
        }

        let dir = dir.as_ref().to_path_buf();
        // Create base directory if it doesn't exist
        fs::create_dir_all(&dir)
            .map_err(|e| DispatcherError::sink_creation(&name, format!("{}: {e}", dir.display())))?;

        let writers = (1..=workers)
            .map(|i| FileWriter::new(format!("{name}{i}"), &dir))
            .collect();
        let pool = WorkerPool::spawn(name, writers)?;

        debug!(sink = %pool.name(), dir = %dir.display(), workers, "FileSink created");
        Ok(Self { pool })
    }
}

impl BulkSink for FileSink {
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
