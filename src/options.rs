//! Run-time knobs for a conversion.

use std::time::Duration;

/// Default interval between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(20);

/// Execution options for [`Converter`](crate::Converter).
///
/// ```
/// use ironcast::ConvertOptions;
///
/// let opts = ConvertOptions::default().workers(8).queue_capacity(Some(4096));
/// assert_eq!(opts.workers, 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Number of worker threads. Values below 1 are treated as 1.
    pub workers: usize,
    /// `None` for an unbounded dispatch queue, `Some(n)` to make the producer
    /// wait once `n` units are pending.
    pub queue_capacity: Option<usize>,
    /// Minimum time between two progress log lines.
    pub progress_interval: Duration,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            queue_capacity: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ConvertOptions {
    #[must_use]
    pub const fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub const fn queue_capacity(mut self, capacity: Option<usize>) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub const fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.workers.max(1)
    }
}
