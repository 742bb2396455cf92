//! Declarative per-column conversion rules.
//!
//! A [`Schema`] maps raw CSV column positions to output fields and tells the
//! coercer how to type each value. Schemas are normally written in YAML:
//!
//! ```yaml
//! header: true
//! ignore_duplicates: true
//! columns:
//!   - index: 0
//!     field: id
//!     type: int
//!   - index: 1
//!     field: when
//!     type: date
//!     format: "%m/%d/%Y"
//!     type_policy: nullable
//!   - index: 2
//!     field: score
//!     type: float
//!     default: 0.0
//! ```
//!
//! Omitted keys take their defaults: `type: string`, `type_policy: strict`,
//! `header: false`, `ignore_duplicates: false`. A schema is immutable once
//! loaded and is shared read-only by every worker.

use crate::error::{ConvertError, Result};
use crate::value::TypedValue;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Target type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    String,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    /// Any type name this crate does not know. Values pass through as raw text.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Unknown => "unknown",
        })
    }
}

/// How a column treats empty input and values that fail to parse.
///
/// | policy     | empty / missing  | parse failure          |
/// |------------|------------------|------------------------|
/// | `strict`   | `default`        | run fails              |
/// | `flexible` | `default`        | raw text as a string   |
/// | `nullable` | `null`           | `null`                 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPolicy {
    #[default]
    Strict,
    Flexible,
    Nullable,
}

/// One output field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnRule {
    /// Position of the source column in the raw row.
    #[serde(rename = "index")]
    pub source_index: usize,
    /// Name of the output field.
    #[serde(rename = "field")]
    pub field_name: String,
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    /// `strftime`-style layout; only read for `date` and `datetime`.
    #[serde(default)]
    pub format: Option<String>,
    /// Returned for empty or missing values unless the policy is `nullable`.
    #[serde(rename = "default", default)]
    pub default_value: Option<TypedValue>,
    #[serde(rename = "type_policy", default)]
    pub null_policy: NullPolicy,
}

impl ColumnRule {
    pub fn new(source_index: usize, field_name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            source_index,
            field_name: field_name.into(),
            data_type,
            format: None,
            default_value: None,
            null_policy: NullPolicy::Strict,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<TypedValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }
}

/// The full set of rules for one conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Schema {
    /// The first input row is a header and is skipped by the row source.
    #[serde(rename = "header", default)]
    pub has_header_row: bool,
    /// Drop rows that exactly repeat an earlier row.
    #[serde(default)]
    pub ignore_duplicates: bool,
    pub columns: Vec<ColumnRule>,
}

impl Schema {
    #[must_use]
    pub fn new(columns: Vec<ColumnRule>) -> Self {
        Self {
            has_header_row: false,
            ignore_duplicates: false,
            columns,
        }
    }

    #[must_use]
    pub fn with_header(mut self, has_header_row: bool) -> Self {
        self.has_header_row = has_header_row;
        self
    }

    #[must_use]
    pub fn with_ignore_duplicates(mut self, ignore: bool) -> Self {
        self.ignore_duplicates = ignore;
        self
    }

    /// Check the rules before any row is read.
    ///
    /// # Errors
    /// [`ConvertError::Schema`] if there are no columns, a field name is empty,
    /// or two columns write the same field.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(ConvertError::Schema("schema has no columns".into()));
        }
        let mut seen = HashSet::with_capacity(self.columns.len());
        for (i, col) in self.columns.iter().enumerate() {
            if col.field_name.trim().is_empty() {
                return Err(ConvertError::Schema(format!(
                    "column #{i} (index {}) has an empty field name",
                    col.source_index
                )));
            }
            if !seen.insert(col.field_name.as_str()) {
                return Err(ConvertError::Schema(format!(
                    "field '{}' is defined more than once",
                    col.field_name
                )));
            }
            if col.format.is_some() && !matches!(col.data_type, DataType::Date | DataType::DateTime)
            {
                tracing::debug!(
                    field = %col.field_name,
                    data_type = %col.data_type,
                    "format ignored for non-date column"
                );
            }
        }
        Ok(())
    }

    /// Decode and validate a YAML schema document.
    ///
    /// # Errors
    /// [`ConvertError::Schema`] on malformed YAML, missing required keys
    /// (`index`, `field`, `columns`), or a failed [`validate`](Self::validate).
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let schema: Self = serde_yaml::from_str(text)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Read, decode and validate a YAML schema file.
    ///
    /// # Errors
    /// [`ConvertError::Io`] if the file cannot be read, otherwise as
    /// [`from_yaml_str`](Self::from_yaml_str).
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }
}
