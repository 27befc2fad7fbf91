//! Attribute values and their document serialization.
//!
//! Entities expose their attributes as [`Fields`]. Date-times are kept apart
//! from plain JSON values so they can be written in one canonical form.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// Format used for every date-time sent to the search engine.
pub const CANONICAL_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Named attribute values of an entity.
pub type Fields = BTreeMap<String, FieldValue>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Any JSON-representable value, sent as-is.
    Json(Value),
    /// A date-time, sent as `YYYY-MM-DD HH:MM:SS`.
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// Convert the value into its document form.
    pub fn into_document_value(self) -> Value {
        match self {
            FieldValue::Json(value) => value,
            FieldValue::DateTime(at) => {
                Value::String(at.format(CANONICAL_DATE_TIME_FORMAT).to_string())
            }
        }
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, FieldValue::DateTime(_))
    }
}

/// Serialize attributes into a document body, converting date-times.
pub fn to_document(fields: Fields) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, value)| (name, value.into_document_value()))
        .collect()
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(at: NaiveDateTime) -> Self {
        FieldValue::DateTime(at)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(at: DateTime<Utc>) -> Self {
        FieldValue::DateTime(at.naive_utc())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(day: NaiveDate) -> Self {
        FieldValue::DateTime(day.and_hms_opt(0, 0, 0).unwrap_or_default())
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Json(Value::String(text.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Json(Value::String(text))
    }
}

impl From<i64> for FieldValue {
    fn from(number: i64) -> Self {
        FieldValue::Json(Value::from(number))
    }
}

impl From<f64> for FieldValue {
    fn from(number: f64) -> Self {
        FieldValue::Json(Value::from(number))
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Json(Value::Bool(flag))
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Json(Value::Null), Into::into)
    }
}
