//! Run statistics.
//!
//! Informational only: nothing in a conversion depends on them. They are not
//! produced for a run that fails.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Counters and timing for one conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    /// Data rows read from the source (header excluded, duplicates included).
    pub rows_read: u64,
    /// Rows dropped as exact repeats. Always 0 when deduplication is off.
    pub duplicates_ignored: u64,
    /// Rows dispatched to the workers.
    pub unique_rows_accepted: u64,
    /// Whether duplicate suppression was enabled for the run.
    pub deduplication: bool,
    pub elapsed: Duration,
}

impl RunStats {
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Throughput over the whole run; 0 when no time was measured.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rows_per_second(&self) -> f64 {
        let secs = self.elapsed_seconds();
        if secs > 0.0 {
            self.rows_read as f64 / secs
        } else {
            0.0
        }
    }

    /// All statistics as a JSON object, throughput included.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "rows_read": self.rows_read,
            "duplicates_ignored": self.duplicates_ignored,
            "unique_rows_accepted": self.unique_rows_accepted,
            "deduplication": self.deduplication,
            "elapsed_seconds": self.elapsed_seconds(),
            "rows_per_second": self.rows_per_second(),
        })
    }

    /// Print a human-readable summary to stdout.
    ///
    /// Duplicate counts are only shown when deduplication was enabled.
    pub fn print(&self) {
        println!(
            "Processed {} rows in {:.2} seconds",
            self.rows_read,
            self.elapsed_seconds()
        );
        if self.deduplication {
            println!("Ignored {} duplicate rows", self.duplicates_ignored);
            println!("Found {} unique rows", self.unique_rows_accepted);
        }
        println!(
            "Average processing speed: {:.2} rows/second",
            self.rows_per_second()
        );
    }

    /// Save the statistics as pretty-printed JSON.
    ///
    /// # Errors
    /// If the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let formatted = serde_json::to_string_pretty(&self.to_json())?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
