//! CSV row source.
//!
//! This module provides:
//! - [`CsvRows`]: a lazy iterator of raw rows from a (possibly compressed) file
//! - [`count_rows`]: a counting pass used to pre-size the result store
//! - [`Converter::run_csv`]: count, then convert a CSV file in one call
//!
//! # Design notes
//! - Rows are read as plain text; all typing is left to the schema.
//! - Readers are `flexible`: rows may have any number of fields. Missing
//!   trailing fields are seen as absent values by the coercer.
//! - Read errors are surfaced as `std::io::Error` so they flow into
//!   [`ConvertError::Io`].

use crate::error::ConvertError;
use crate::io::compression::auto_detect_reader;
use crate::pipeline::{Conversion, Converter};
use crate::record::RawRow;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// How the CSV text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Skip the first row.
    pub has_header: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: false,
            delimiter: b',',
        }
    }
}

impl CsvOptions {
    #[must_use]
    pub const fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn reader<R: Read>(&self, rdr: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(rdr)
    }
}

/// Lazy sequence of data rows (header already skipped).
pub struct CsvRows {
    inner: csv::StringRecordsIntoIter<Box<dyn Read>>,
}

impl CsvRows {
    /// Read rows from any reader.
    pub fn from_reader<R: Read + 'static>(rdr: R, opts: CsvOptions) -> Self {
        let boxed: Box<dyn Read> = Box::new(rdr);
        Self {
            inner: opts.reader(boxed).into_records(),
        }
    }

    /// Open `path`, decompressing transparently.
    ///
    /// # Errors
    /// If the file cannot be opened or its decoder cannot be set up.
    pub fn open(path: impl AsRef<Path>, opts: CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let rdr = auto_detect_reader(f, path)
            .with_context(|| format!("setup decompression for {}", path.display()))?;
        Ok(Self::from_reader(rdr, opts))
    }
}

impl Iterator for CsvRows {
    type Item = io::Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let rec = self.inner.next()?;
        Some(
            rec.map(|r| r.iter().map(str::to_string).collect())
                .map_err(io::Error::from),
        )
    }
}

/// Count the data rows in a CSV file (header excluded).
///
/// # Errors
/// If the file cannot be opened or is not valid CSV.
pub fn count_rows(path: impl AsRef<Path>, opts: CsvOptions) -> Result<usize> {
    let path = path.as_ref();
    let mut total = 0usize;
    for (i, row) in CsvRows::open(path, opts)?.enumerate() {
        row.with_context(|| format!("read CSV record #{} in {}", i + 1, path.display()))?;
        total += 1;
    }
    Ok(total)
}

fn input_error(e: &anyhow::Error) -> ConvertError {
    ConvertError::Io(io::Error::other(format!("{e:#}")))
}

impl Converter {
    /// Convert a CSV file, skipping the header row when the schema says so.
    ///
    /// The file is read twice: once to count rows, once to convert.
    ///
    /// # Errors
    /// [`ConvertError::Io`] if the file cannot be read, otherwise as
    /// [`Converter::run`].
    pub fn run_csv(&self, path: impl AsRef<Path>, delimiter: u8) -> crate::Result<Conversion> {
        let path = path.as_ref();
        let opts = CsvOptions::default()
            .with_header(self.schema().has_header_row)
            .with_delimiter(delimiter);
        let total = count_rows(path, opts).map_err(|e| input_error(&e))?;
        tracing::debug!(path = %path.display(), total, "counted input rows");
        let rows = CsvRows::open(path, opts).map_err(|e| input_error(&e))?;
        self.run(rows, total)
    }
}
