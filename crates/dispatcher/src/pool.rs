//! WorkerPool - a sink's queue plus the threads draining it

use std::mem;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use contracts::{Bulk, ContractError, SinkStat};
use observability::{record_bulk_rejected, record_bulk_written, record_queue_depth};
use tracing::{debug, error, instrument, warn};

use crate::error::DispatcherError;
use crate::queue::{lock, BulkQueue};
use crate::writer::BulkWriter;

enum PoolState {
    Running(Vec<Worker>),
    Stopped(Vec<SinkStat>),
}

struct Worker {
    name: String,
    handle: JoinHandle<SinkStat>,
}

/// Fixed-size pool of worker threads sharing one queue
///
/// Bulks are taken in insertion order. With a single worker, output order is
/// insertion order too; with several workers, two bulks may be processed at
/// the same time and complete in either order.
pub struct WorkerPool {
    /// Sink name
    name: String,
    /// Queue owned by this pool alone
    queue: Arc<BulkQueue>,
    /// Worker handles until stopped, final stats afterwards
    state: Mutex<PoolState>,
}

impl WorkerPool {
    /// Start one worker thread per writer
    ///
    /// # Errors
    /// `DispatcherError::WorkerSpawn` if a thread cannot be created; workers
    /// already started are stopped before returning.
    pub fn spawn<W: BulkWriter>(
        name: impl Into<String>,
        writers: Vec<W>,
    ) -> Result<Self, DispatcherError> {
        let name = name.into();
        let queue = Arc::new(BulkQueue::new());
        let mut workers = Vec::with_capacity(writers.len());

        for writer in writers {
            let worker_name = writer.name().to_string();
            let worker_queue = Arc::clone(&queue);
            let sink_name = name.clone();

            let spawned = thread::Builder::new()
                .name(worker_name.clone())
                .spawn(move || sink_worker(writer, worker_queue, sink_name));

            match spawned {
                Ok(handle) => workers.push(Worker {
                    name: worker_name,
                    handle,
                }),
                Err(source) => {
                    queue.close();
                    join_workers(&name, workers);
                    return Err(DispatcherError::WorkerSpawn {
                        sink_name: name,
                        worker: worker_name,
                        source,
                    });
                }
            }
        }

        debug!(sink = %name, workers = workers.len(), "Worker pool started");
        Ok(Self {
            name,
            queue,
            state: Mutex::new(PoolState::Running(workers)),
        })
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bulks waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Queue a bulk for the workers (never blocks on I/O)
    pub fn enqueue(&self, bulk: Bulk) -> Result<(), ContractError> {
        match self.queue.push(bulk) {
            Ok(depth) => {
                record_queue_depth(&self.name, depth);
                Ok(())
            }
            Err(bulk) => {
                record_bulk_rejected(&self.name);
                warn!(
                    sink = %self.name,
                    commands = bulk.len(),
                    "Sink stopped, bulk rejected"
                );
                Err(ContractError::sink_closed(&self.name))
            }
        }
    }

    /// Close the queue, let the workers drain it, join them
    ///
    /// Only the first call does any work. Concurrent callers block until the
    /// workers are joined, so every caller returns with final stats in place.
    #[instrument(name = "worker_pool_drain_and_stop", skip(self), fields(sink = %self.name))]
    pub fn drain_and_stop(&self) {
        let mut state = lock(&self.state);
        if let PoolState::Running(workers) = &mut *state {
            self.queue.close();
            let workers = mem::take(workers);
            *state = PoolState::Stopped(join_workers(&self.name, workers));
            debug!(sink = %self.name, "Worker pool stopped");
        }
    }

    /// Final per-worker stats (stops the pool first)
    pub fn stats(&self) -> Vec<SinkStat> {
        self.drain_and_stop();
        match &*lock(&self.state) {
            PoolState::Stopped(stats) => stats.clone(),
            PoolState::Running(_) => Vec::new(),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.drain_and_stop();
    }
}

fn join_workers(sink_name: &str, workers: Vec<Worker>) -> Vec<SinkStat> {
    workers
        .into_iter()
        .map(|worker| match worker.handle.join() {
            Ok(stat) => stat,
            Err(_) => {
                error!(sink = %sink_name, worker = %worker.name, "Worker thread panicked");
                SinkStat::new(worker.name)
            }
        })
        .collect()
}

/// Worker loop: take bulks until the queue is closed and empty
///
/// The queue lock is released before `write`, so I/O never blocks enqueue.
#[instrument(name = "sink_worker_loop", skip(writer, queue), fields(worker = %writer.name()))]
fn sink_worker<W: BulkWriter>(mut writer: W, queue: Arc<BulkQueue>, sink_name: String) -> SinkStat {
    let mut stat = SinkStat::new(writer.name());
    debug!(sink = %sink_name, "Sink worker started");

    while let Some((bulk, depth)) = queue.pop() {
        record_queue_depth(&sink_name, depth);
        match writer.write(&bulk) {
            Ok(()) => {
                stat.record(&bulk);
                record_bulk_written(&sink_name, &stat.name, true);
            }
            Err(e) => {
                stat.record_failure();
                record_bulk_written(&sink_name, &stat.name, false);
                error!(
                    sink = %sink_name,
                    commands = bulk.len(),
                    error = %e,
                    "Write failed"
                );
                // keep going, one bad bulk must not stop the worker
            }
        }
    }

    if let Err(e) = writer.flush() {
        error!(sink = %sink_name, error = %e, "Flush failed on shutdown");
    }

    debug!(
        sink = %sink_name,
        bulks = stat.bulk_count,
        commands = stat.command_count,
        "Sink worker stopped"
    );
    stat
}
