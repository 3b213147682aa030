//! BulkQueue - unbounded FIFO shared by the workers of one sink

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use contracts::Bulk;

/// Lock a mutex, recovering the data if a holder panicked
///
/// Every critical section in this crate leaves the protected value consistent,
/// so a poisoned lock carries no torn state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Thread-safe unbounded FIFO of bulks
///
/// Owned by exactly one sink. `push` never blocks on anything but the short
/// critical section; `pop` blocks until a bulk is available or the queue is
/// closed *and* empty, so closing never loses queued bulks.
#[derive(Debug, Default)]
pub struct BulkQueue {
    entries: Mutex<VecDeque<Bulk>>,
    ready: Condvar,
    closed: AtomicBool,
}

impl BulkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bulk and wake one waiting worker
    ///
    /// Returns the queue depth after insertion, or gives the bulk back if the
    /// queue is closed.
    pub fn push(&self, bulk: Bulk) -> Result<usize, Bulk> {
        let mut entries = lock(&self.entries);
        if self.closed.load(Ordering::Acquire) {
            return Err(bulk);
        }
        entries.push_back(bulk);
        let depth = entries.len();
        drop(entries);

        self.ready.notify_one();
        Ok(depth)
    }

    /// Take the oldest bulk, waiting if necessary
    ///
    /// Returns the bulk with the queue depth left behind it, or `None` once the
    /// queue is closed and fully drained.
    pub fn pop(&self) -> Option<(Bulk, usize)> {
        let entries = lock(&self.entries);
        let mut entries = self
            .ready
            .wait_while(entries, |q| {
                q.is_empty() && !self.closed.load(Ordering::Acquire)
            })
            .unwrap_or_else(PoisonError::into_inner);
        let bulk = entries.pop_front()?;
        Some((bulk, entries.len()))
    }

    /// Refuse further pushes and wake every worker
    pub fn close(&self) {
        {
            // flag flipped under the lock so no waiter misses the wakeup
            let _entries = lock(&self.entries);
            self.closed.store(true, Ordering::Release);
        }
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Bulks waiting to be processed
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
