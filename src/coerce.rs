//! Field coercion: one raw cell plus one [`ColumnRule`] in, one typed value out.
//!
//! The decision table, in order:
//! 1. Empty or missing input returns `null` for `nullable` columns and the
//!    column `default` (itself possibly unset, i.e. `null`) otherwise.
//! 2. The text is parsed according to the column's [`DataType`].
//! 3. On a parse failure `flexible` returns the raw text unchanged, `nullable`
//!    returns `null`, and `strict` returns a [`FieldError`].
//!
//! Unknown data types are not an error; the raw text passes through.

use crate::error::FieldError;
use crate::schema::{ColumnRule, DataType, NullPolicy};
use crate::value::TypedValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Layout used for `date` columns without a `format`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Layout used for `datetime` columns without a `format`.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Coerce a single raw value according to `rule`.
///
/// `raw` is `None` when the row has no column at `rule.source_index`.
///
/// # Errors
/// Only for `strict` columns whose non-empty value fails to parse.
pub fn coerce(raw: Option<&str>, rule: &ColumnRule) -> Result<TypedValue, FieldError> {
    let text = match raw {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(empty_value(rule)),
    };

    match parse_as(text, rule) {
        Ok(v) => Ok(v),
        Err(reason) => match rule.null_policy {
            NullPolicy::Flexible => Ok(TypedValue::String(text.to_string())),
            NullPolicy::Nullable => Ok(TypedValue::Null),
            NullPolicy::Strict => Err(FieldError {
                field: rule.field_name.clone(),
                value: text.to_string(),
                data_type: rule.data_type,
                reason,
            }),
        },
    }
}

fn empty_value(rule: &ColumnRule) -> TypedValue {
    if rule.null_policy == NullPolicy::Nullable {
        return TypedValue::Null;
    }
    rule.default_value.clone().unwrap_or_default()
}

fn parse_as(text: &str, rule: &ColumnRule) -> Result<TypedValue, String> {
    match rule.data_type {
        DataType::String | DataType::Unknown => Ok(TypedValue::String(text.to_string())),
        DataType::Int => text
            .trim()
            .parse::<i64>()
            .map(TypedValue::Int)
            .map_err(|e| e.to_string()),
        DataType::Float => text
            .trim()
            .parse::<f64>()
            .map(TypedValue::Float)
            .map_err(|e| e.to_string()),
        DataType::Bool => parse_bool(text.trim()).map(TypedValue::Bool),
        DataType::Date => {
            let fmt = rule.format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
            parse_date(text, fmt).map(TypedValue::Date)
        }
        DataType::DateTime => {
            let fmt = rule.format.as_deref().unwrap_or(DEFAULT_DATETIME_FORMAT);
            parse_datetime(text, fmt).map(TypedValue::DateTime)
        }
    }
}

fn parse_bool(text: &str) -> Result<bool, String> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err("invalid boolean literal".to_string()),
    }
}

/// A layout carrying time fields still yields a date; the time part is dropped.
fn parse_date(text: &str, fmt: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, fmt).or_else(|e| {
        NaiveDateTime::parse_from_str(text, fmt)
            .map(|dt| dt.date())
            .map_err(|_| format!("does not match '{fmt}': {e}"))
    })
}

/// A date-only layout yields midnight.
fn parse_datetime(text: &str, fmt: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text, fmt).or_else(|e| {
        NaiveDate::parse_from_str(text, fmt)
            .map(|d| d.and_time(NaiveTime::MIN))
            .map_err(|_| format!("does not match '{fmt}': {e}"))
    })
}
