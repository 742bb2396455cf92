//! End-to-end orchestration of one conversion.
//!
//! The calling thread is the single producer: it reads rows, consults the
//! [`Deduplicator`], and submits surviving rows tagged with their input
//! position. Workers fill the [`ResultStore`]; once they have all exited the
//! store is compacted into the ordered record list. Because positions are
//! assigned by the producer in input order, output order equals input order
//! among accepted rows no matter how the workers were scheduled.

use crate::dedup::Deduplicator;
use crate::error::Result;
use crate::options::ConvertOptions;
use crate::pool::{WorkUnit, WorkerPool};
use crate::record::{RawRow, TypedRecord};
use crate::schema::Schema;
use crate::stats::RunStats;
use crate::store::ResultStore;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Records in input order, duplicates removed.
    pub records: Vec<TypedRecord>,
    pub stats: RunStats,
}

/// Applies a [`Schema`] to a row source using a worker pool.
///
/// ```
/// use ironcast::{ColumnRule, Converter, ConvertOptions, DataType, Schema};
///
/// # fn main() -> ironcast::Result<()> {
/// let schema = Schema::new(vec![
///     ColumnRule::new(0, "id", DataType::Int),
///     ColumnRule::new(1, "when", DataType::Date).with_format("%m/%d/%Y"),
/// ]);
/// let converter = Converter::new(schema, ConvertOptions::default().workers(2))?;
/// let out = converter.run_rows(vec![vec!["7".to_string(), "01/02/2023".to_string()]])?;
/// assert_eq!(
///     serde_json::to_string(&out.records[0]).unwrap(),
///     r#"{"id":7,"when":"2023-01-02"}"#
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    schema: Schema,
    options: ConvertOptions,
}

impl Converter {
    /// # Errors
    /// [`ConvertError::Schema`](crate::ConvertError::Schema) if the schema
    /// does not validate.
    pub fn new(schema: Schema, options: ConvertOptions) -> Result<Self> {
        schema.validate()?;
        Ok(Self { schema, options })
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub const fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert rows from a fallible source.
    ///
    /// `expected_rows` pre-sizes the result store and drives progress
    /// percentages; it may be wrong in either direction.
    ///
    /// # Errors
    /// - [`ConvertError::Parse`](crate::ConvertError::Parse) for the first row
    ///   (in input order) with a failing `strict` column
    /// - [`ConvertError::Io`](crate::ConvertError::Io) if the source fails
    ///
    /// No records are returned on error.
    pub fn run<I>(&self, rows: I, expected_rows: usize) -> Result<Conversion>
    where
        I: IntoIterator<Item = io::Result<RawRow>>,
    {
        let started = Instant::now();
        let pool = WorkerPool::new(&self.options)?;
        let store = ResultStore::with_capacity(expected_rows);
        info!(
            workers = pool.workers(),
            expected_rows,
            deduplicate = self.schema.ignore_duplicates,
            "conversion started"
        );

        let (rows_read, duplicates, accepted) = pool.run(&self.schema, &store, |dispatcher| {
            let mut dedup = Deduplicator::new(self.schema.ignore_duplicates);
            let mut progress = Progress::new(expected_rows, self.options.progress_interval);
            let mut rows_read = 0u64;
            let mut accepted = 0u64;

            for (position, row) in rows.into_iter().enumerate() {
                let row = row?;
                rows_read += 1;
                if !dedup.is_duplicate(&row) {
                    if !dispatcher.submit(WorkUnit { position, row }) {
                        debug!(position, "dispatch stopped early");
                        break;
                    }
                    accepted += 1;
                }
                progress.tick(rows_read, dispatcher.pending());
            }
            Ok((rows_read, dedup.duplicates(), accepted))
        })?;

        let records = store.into_records();
        debug_assert_eq!(records.len() as u64, accepted);

        let stats = RunStats {
            rows_read,
            duplicates_ignored: duplicates,
            unique_rows_accepted: accepted,
            deduplication: self.schema.ignore_duplicates,
            elapsed: started.elapsed(),
        };
        info!(
            rows_read,
            duplicates_ignored = duplicates,
            records = records.len(),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "conversion finished"
        );
        Ok(Conversion { records, stats })
    }

    /// Convert an in-memory, infallible row source.
    ///
    /// # Errors
    /// As [`run`](Self::run), minus source errors.
    pub fn run_rows<I>(&self, rows: I) -> Result<Conversion>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let rows = rows.into_iter();
        let expected = rows.size_hint().0;
        self.run(rows.map(Ok), expected)
    }
}

/// Periodic progress logging from the producer.
struct Progress {
    total: usize,
    interval: Duration,
    last: Instant,
}

impl Progress {
    fn new(total: usize, interval: Duration) -> Self {
        Self {
            total,
            interval,
            last: Instant::now(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn tick(&mut self, rows_read: u64, pending: usize) {
        if self.last.elapsed() < self.interval {
            return;
        }
        self.last = Instant::now();
        if self.total == 0 {
            info!(rows_read, pending, "progress");
        } else {
            let pct = rows_read as f64 / self.total as f64 * 100.0;
            info!(
                rows_read,
                total = self.total,
                pending,
                "processed {} of {} rows ({:.2}% complete)",
                rows_read,
                self.total,
                pct
            );
        }
    }
}
