//! Error types for schema loading, row conversion, and output.
//!
//! Two layers are used throughout the crate:
//! - [`FieldError`] is what a single column coercion produces when a `strict`
//!   column rejects its value. It knows nothing about row positions.
//! - [`ConvertError`] is the run-level error. A `FieldError` raised by a worker
//!   is lifted into [`ConvertError::Parse`] together with the row position.
//!
//! File-oriented helpers in [`crate::io`] return `anyhow::Result` with path
//! context instead; those errors surface here as [`ConvertError::Output`].

use crate::schema::DataType;
use std::fmt;
use thiserror::Error;

/// Result alias for conversion runs.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// A strict-policy column failed to coerce its raw value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {value:?} as {data_type} for field '{field}': {reason}")]
pub struct FieldError {
    pub field: String,
    pub value: String,
    pub data_type: DataType,
    pub reason: String,
}

/// A strict-policy failure tagged with the row it came from.
///
/// `position` is the 0-based index of the data row (header excluded) in the
/// input, counted before duplicate filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub position: usize,
    pub field: String,
    pub value: String,
    pub data_type: DataType,
    pub reason: String,
}

impl ParseError {
    pub(crate) fn at(position: usize, err: FieldError) -> Self {
        Self {
            position,
            field: err.field,
            value: err.value,
            data_type: err.data_type,
            reason: err.reason,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: cannot parse {:?} as {} for field '{}': {}",
            self.position, self.value, self.data_type, self.field, self.reason
        )
    }
}

impl std::error::Error for ParseError {}

/// Fatal errors for a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Malformed or missing column rule; raised before any row is processed.
    #[error("schema error: {0}")]
    Schema(String),

    /// A `strict` column rejected a value. The whole run is aborted.
    #[error("parse error at {0}")]
    Parse(ParseError),

    /// The row source failed while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker threads could not be started.
    #[error("worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Writing the output document or statistics failed.
    #[error("output error: {0:#}")]
    Output(#[from] anyhow::Error),
}

impl ConvertError {
    /// The parse failure, if this is one.
    #[must_use]
    pub const fn as_parse(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for ConvertError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Schema(e.to_string())
    }
}
