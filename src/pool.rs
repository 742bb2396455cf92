//! Dispatch queue and worker pool.
//!
//! One producer feeds [`WorkUnit`]s into a crossbeam channel; a fixed set of
//! workers, each running as a job on a dedicated rayon thread pool, pull units,
//! transform them, and write the record into the [`ResultStore`] at the unit's
//! position.
//!
//! # Termination
//! There is no sentinel unit. When the producer is done it drops its
//! [`Dispatcher`], which closes the channel; every worker drains what is left
//! and exits. The scope that spawned the workers only returns once all of them
//! have exited, so the store is never read while a worker may still write.
//!
//! # Failures
//! A strict parse failure is recorded in [`RunControl`] (earliest row
//! position wins). From then on the producer stops submitting and workers skip
//! any unit positioned after the earliest failure, while still transforming
//! the units before it. The reported error is therefore always the failure of
//! the first bad row in input order, regardless of scheduling. A row-source
//! error cancels the run outright: workers skip everything still queued.

use crate::error::{ConvertError, ParseError, Result};
use crate::options::ConvertOptions;
use crate::record::{RawRow, transform};
use crate::schema::Schema;
use crate::store::ResultStore;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// A data row tagged with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub position: usize,
    pub row: RawRow,
}

/// Shared abort state for one run.
#[derive(Debug)]
pub struct RunControl {
    earliest_failure: AtomicUsize,
    failure: Mutex<Option<ParseError>>,
    cancelled: AtomicBool,
}

impl Default for RunControl {
    fn default() -> Self {
        Self {
            earliest_failure: AtomicUsize::new(usize::MAX),
            failure: Mutex::new(None),
            cancelled: AtomicBool::new(false),
        }
    }
}

impl RunControl {
    /// Record a strict failure, keeping the one with the lowest position.
    pub fn fail(&self, err: ParseError) {
        let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_none_or(|cur| err.position < cur.position) {
            self.earliest_failure.fetch_min(err.position, Ordering::SeqCst);
            *slot = Some(err);
        }
    }

    /// Stop all outstanding work.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.earliest_failure.load(Ordering::SeqCst) != usize::MAX
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn should_skip(&self, position: usize) -> bool {
        self.is_cancelled() || position > self.earliest_failure.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> Option<ParseError> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Producer handle onto the dispatch queue.
///
/// Dropping it closes the queue.
pub struct Dispatcher<'a> {
    tx: Sender<WorkUnit>,
    store: &'a ResultStore,
    control: &'a RunControl,
}

impl Dispatcher<'_> {
    /// Enqueue one unit.
    ///
    /// Returns `false` if the run has failed or every worker is gone; the
    /// producer should stop reading in that case.
    pub fn submit(&self, unit: WorkUnit) -> bool {
        if self.control.is_failed() || self.control.is_cancelled() {
            return false;
        }
        self.store.ensure_position(unit.position);
        self.tx.send(unit).is_ok()
    }

    /// Units currently waiting in the queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

/// A fixed-size set of workers bound to one rayon thread pool.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
    queue_capacity: Option<usize>,
}

impl WorkerPool {
    /// Start the worker threads.
    ///
    /// # Errors
    /// [`ConvertError::Pool`] if the threads cannot be spawned.
    pub fn new(options: &ConvertOptions) -> Result<Self> {
        let workers = options.worker_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("ironcast-worker-{i}"))
            .build()?;
        Ok(Self {
            pool,
            workers,
            queue_capacity: options.queue_capacity,
        })
    }

    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Run `produce` on the calling thread while the workers transform what it
    /// submits into `store`.
    ///
    /// Returns once the producer has finished and every worker has exited.
    ///
    /// # Errors
    /// The earliest strict parse failure if any row failed, otherwise the
    /// producer's own error.
    pub fn run<T, F>(&self, schema: &Schema, store: &ResultStore, produce: F) -> Result<T>
    where
        F: FnOnce(&Dispatcher<'_>) -> Result<T>,
    {
        let (tx, rx) = match self.queue_capacity {
            Some(cap) => bounded(cap.max(1)),
            None => unbounded(),
        };
        let control = RunControl::default();

        let produced = self.pool.in_place_scope(|scope| {
            for id in 0..self.workers {
                let rx = rx.clone();
                let control = &control;
                scope.spawn(move |_| worker_loop(id, &rx, schema, store, control));
            }
            drop(rx);

            let dispatcher = Dispatcher {
                tx,
                store,
                control: &control,
            };
            let out = produce(&dispatcher);
            if out.is_err() {
                control.cancel();
            }
            out
        });

        if let Some(err) = control.take_failure() {
            return Err(ConvertError::Parse(err));
        }
        produced
    }
}

fn worker_loop(
    id: usize,
    rx: &Receiver<WorkUnit>,
    schema: &Schema,
    store: &ResultStore,
    control: &RunControl,
) {
    debug!(worker = id, "worker started");
    let mut processed = 0u64;
    let mut skipped = 0u64;
    for unit in rx.iter() {
        if control.should_skip(unit.position) {
            skipped += 1;
            continue;
        }
        match transform(&unit.row, schema) {
            Ok(record) => {
                store.put(unit.position, record);
                processed += 1;
            }
            Err(e) => {
                warn!(worker = id, position = unit.position, error = %e, "strict field failed");
                control.fail(ParseError::at(unit.position, e));
            }
        }
    }
    debug!(worker = id, processed, skipped, "worker finished");
}
