//! # Ironcast
//!
//! **Schema-driven CSV to JSON conversion.** A declarative, per-column
//! [`Schema`] decides how every raw text cell is typed, what empty cells turn
//! into, and what happens when a value does not parse. Rows are transformed in
//! parallel by a fixed worker pool while the output keeps the input order.
//!
//! ## Key Features
//!
//! - **Typed columns** - `string`, `int`, `float`, `bool`, `date`, `datetime`
//!   with `strftime`-style formats
//! - **Per-column policies** - `strict` (fail the run), `flexible` (keep the
//!   raw text), `nullable` (emit `null`)
//! - **Defaults** - a per-column value for empty or missing cells
//! - **Duplicate suppression** - opt-in, exact row equality, first one wins
//! - **Parallel, ordered** - a worker pool fills a position-indexed store
//! - **All-or-nothing** - a strict failure aborts the run and nothing is written
//! - **I/O** - CSV in, JSON array or JSON Lines out, transparent compression
//!
//! ## Quick Start
//!
//! ```
//! use ironcast::*;
//!
//! # fn main() -> ironcast::Result<()> {
//! let schema = Schema::from_yaml_str(r#"
//! ignore_duplicates: true
//! columns:
//!   - { index: 0, field: id, type: int }
//!   - { index: 1, field: when, type: date, format: "%m/%d/%Y" }
//! "#)?;
//!
//! let rows = vec![
//!     vec!["7".to_string(), "01/02/2023".to_string()],
//!     vec!["7".to_string(), "01/02/2023".to_string()],
//! ];
//! let out = Converter::new(schema, ConvertOptions::default())?.run_rows(rows)?;
//! assert_eq!(out.records.len(), 1);
//! assert_eq!(out.stats.duplicates_ignored, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. [`coerce`] types one cell according to one [`ColumnRule`]
//! 2. [`record::transform`] applies every rule to a row
//! 3. [`Deduplicator`] filters repeated rows on the producer thread
//! 4. [`pool`] fans rows out to workers over a channel
//! 5. [`ResultStore`] collects records by input position
//! 6. [`Converter`] drives the run and returns records plus [`RunStats`]
//!
//! ## Feature Flags
//!
//! - `io-csv` - CSV row source and the `ironcast` binary
//! - `parallel-io` - parallel JSON Lines writer
//! - `compression-gzip`, `compression-zstd`, `compression-bzip2`,
//!   `compression-xz` - transparent compressed input and output

pub mod coerce;
pub mod dedup;
pub mod error;
pub mod io;
pub mod options;
pub mod pipeline;
pub mod pool;
pub mod record;
pub mod schema;
pub mod stats;
pub mod store;
pub mod testing;
pub mod value;

pub use coerce::coerce;
pub use dedup::Deduplicator;
pub use error::{ConvertError, FieldError, ParseError, Result};
pub use io::json::{OutputFormat, write_json_vec, write_jsonl_vec, write_records};
pub use options::ConvertOptions;
pub use pipeline::{Conversion, Converter};
pub use pool::{WorkUnit, WorkerPool};
pub use record::{RawRow, TypedRecord, transform};
pub use schema::{ColumnRule, DataType, NullPolicy, Schema};
pub use stats::RunStats;
pub use store::ResultStore;
pub use value::TypedValue;

#[cfg(feature = "parallel-io")]
pub use io::json::write_jsonl_par;

#[cfg(feature = "io-csv")]
pub use io::csv::{CsvOptions, CsvRows, count_rows};
