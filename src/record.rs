//! Raw input rows, typed output records, and the row transformer.

use crate::coerce::coerce;
use crate::error::FieldError;
use crate::schema::Schema;
use crate::value::TypedValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One input line as an ordered list of text fields.
///
/// Equality and hashing are positional and exact, which is what duplicate
/// detection relies on.
pub type RawRow = Vec<String>;

/// One output record: field name to typed value.
///
/// Fields keep the order of the schema's columns, and serialize as a JSON
/// object in that order. Lookups are by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypedRecord {
    fields: Vec<(String, TypedValue)>,
}

impl TypedRecord {
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: Vec::with_capacity(n),
        }
    }

    /// Set `field` to `value`, replacing an existing entry of the same name.
    pub fn insert(&mut self, field: impl Into<String>, value: TypedValue) {
        let field = field.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.fields.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, TypedValue)> for TypedRecord {
    fn from_iter<I: IntoIterator<Item = (K, TypedValue)>>(iter: I) -> Self {
        let mut rec = Self::default();
        for (k, v) in iter {
            rec.insert(k, v);
        }
        rec
    }
}

impl Serialize for TypedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Apply every column rule of `schema` to `row`.
///
/// A rule whose `source_index` is past the end of the row sees a missing
/// value, which takes the empty-value branch of coercion.
///
/// # Errors
/// The first `strict` column that fails to coerce, in schema order.
pub fn transform(row: &[String], schema: &Schema) -> Result<TypedRecord, FieldError> {
    let mut rec = TypedRecord::with_capacity(schema.columns.len());
    for rule in &schema.columns {
        let raw = row.get(rule.source_index).map(String::as_str);
        rec.insert(rule.field_name.clone(), coerce(raw, rule)?);
    }
    Ok(rec)
}
