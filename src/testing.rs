//! Testing utilities for schema conversions.
//!
//! - [`RowsBuilder`]: build raw rows fluently
//! - [`assert_records_equal`]: compare records against JSON literals
//! - [`sample_schema`], [`sample_rows`]: a small ready-made dataset
//!
//! ```
//! use ironcast::testing::*;
//! use ironcast::{Converter, ConvertOptions};
//! use serde_json::json;
//!
//! # fn main() -> ironcast::Result<()> {
//! let rows = RowsBuilder::new().row(["7", "01/02/2023"]).build();
//! let out = Converter::new(sample_schema(), ConvertOptions::default())?.run_rows(rows)?;
//! assert_records_equal(&out.records, &[json!({"id": 7, "when": "2023-01-02"})]);
//! # Ok(())
//! # }
//! ```

use crate::record::{RawRow, TypedRecord};
use crate::schema::{ColumnRule, DataType, Schema};
use serde_json::Value;

/// A fluent builder for raw input rows.
#[derive(Debug, Default)]
pub struct RowsBuilder {
    rows: Vec<RawRow>,
}

impl RowsBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append one row.
    #[must_use]
    pub fn row<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Append the same row `count` times.
    #[must_use]
    pub fn repeat<I, S>(mut self, fields: I, count: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: RawRow = fields.into_iter().map(Into::into).collect();
        self.rows.extend(std::iter::repeat_n(row, count));
        self
    }

    /// Append `count` rows generated from their index.
    #[must_use]
    pub fn generate<F>(mut self, count: usize, f: F) -> Self
    where
        F: Fn(usize) -> RawRow,
    {
        self.rows.extend((0..count).map(f));
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<RawRow> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render records as a JSON array value.
///
/// # Panics
/// If a record cannot be represented as JSON, which does not happen for
/// records produced by this crate.
#[must_use]
pub fn records_to_json(records: &[TypedRecord]) -> Value {
    serde_json::to_value(records).expect("records serialize to JSON")
}

/// Assert that `actual` serializes to exactly `expected`, in order.
///
/// # Panics
/// If the lengths or any record differ.
pub fn assert_records_equal(actual: &[TypedRecord], expected: &[Value]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Record count mismatch:\n  Expected: {expected:?}\n  Actual: {}",
        records_to_json(actual)
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let a = serde_json::to_value(a).expect("record serializes to JSON");
        assert_eq!(
            &a, e,
            "Record mismatch at index {i}:\n  Expected: {e}\n  Actual: {a}"
        );
    }
}

/// Two columns: `id` (strict int from column 0) and `when` (strict date in
/// `%m/%d/%Y` from column 1).
#[must_use]
pub fn sample_schema() -> Schema {
    Schema::new(vec![
        ColumnRule::new(0, "id", DataType::Int),
        ColumnRule::new(1, "when", DataType::Date).with_format("%m/%d/%Y"),
    ])
}

/// Rows matching [`sample_schema`], the second one repeating the first.
#[must_use]
pub fn sample_rows() -> Vec<RawRow> {
    RowsBuilder::new()
        .row(["1", "01/02/2023"])
        .row(["1", "01/02/2023"])
        .row(["2", "12/31/2022"])
        .row(["3", ""])
        .build()
}
