//! Typed field values produced by coercion.
//!
//! [`TypedValue`] is the cell type of a [`TypedRecord`](crate::TypedRecord).
//! It serializes to the natural JSON shape: numbers stay numbers, `Null` becomes
//! `null`, and calendar values are rendered as text (`2023-01-02`,
//! `2023-01-02 10:30:00`).
//!
//! The `Deserialize` impl accepts plain scalars so that a column's `default`
//! can be written directly in a YAML schema (`default: 0`, `default: "n/a"`).

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};
use std::fmt;

/// A single coerced cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypedValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl TypedValue {
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::String(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(s) => serializer.serialize_str(s),
            Self::Date(_) | Self::DateTime(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = TypedValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a scalar default value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<TypedValue, E> {
                Ok(TypedValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<TypedValue, E> {
                Ok(TypedValue::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<TypedValue, D::Error> {
                TypedValue::deserialize(d)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<TypedValue, E> {
                Ok(TypedValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TypedValue, E> {
                Ok(TypedValue::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TypedValue, E> {
                i64::try_from(v)
                    .map(TypedValue::Int)
                    .map_err(|_| E::custom(format!("default {v} does not fit in i64")))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<TypedValue, E> {
                Ok(TypedValue::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TypedValue, E> {
                Ok(TypedValue::String(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<TypedValue, E> {
                Ok(TypedValue::String(v))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for TypedValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}
