//! Field values
//!
//! [`FieldValue`] is the dynamically typed value stored in a
//! [`Record`](super::Record) and accepted as an operation argument. Dates are
//! kept as real `chrono` values so they serialize the way the API expects.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Declared type of a resource field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    DateTime,
    Date,
    StringList,
    DateTimeList,
    Object,
    List,
    #[default]
    Any,
}

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Timestamp with an offset, e.g. `2016-01-15T00:00:00.000Z`
    DateTime(DateTime<FixedOffset>),
    /// Timestamp without zone, serialized without a suffix
    NaiveDateTime(NaiveDateTime),
    Date(NaiveDate),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Convert to the JSON form sent on the wire.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::DateTime(_) | FieldValue::NaiveDateTime(_) | FieldValue::Date(_) => {
                Value::String(self.to_text().unwrap_or_default())
            },
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Scalar text form used in paths and query strings.
    ///
    /// Returns `None` for null, lists and maps.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::Null | FieldValue::List(_) | FieldValue::Map(_) => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Int(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Str(s) => Some(s.clone()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            FieldValue::NaiveDateTime(dt) => Some(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            FieldValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Convert a JSON value to the declared type.
    ///
    /// Errors describe the mismatch; the hydrator decides whether that is fatal.
    pub fn from_json_typed(value: &Value, ty: FieldType) -> Result<Self, String> {
        if value.is_null() {
            return Ok(FieldValue::Null);
        }

        match ty {
            FieldType::Any | FieldType::Object | FieldType::List => {
                let converted = FieldValue::from(value);
                match (ty, &converted) {
                    (FieldType::Object, FieldValue::Map(_)) | (FieldType::List, FieldValue::List(_)) => {
                        Ok(converted)
                    },
                    (FieldType::Any, _) => Ok(converted),
                    _ => Err(format!("expected {:?}, got {}", ty, json_kind(value))),
                }
            },
            FieldType::String => value
                .as_str()
                .map(|s| FieldValue::Str(s.to_string()))
                .ok_or_else(|| format!("expected string, got {}", json_kind(value))),
            FieldType::Integer => value
                .as_i64()
                .map(FieldValue::Int)
                .ok_or_else(|| format!("expected integer, got {}", json_kind(value))),
            FieldType::Number => {
                if let Some(i) = value.as_i64() {
                    Ok(FieldValue::Int(i))
                } else {
                    value
                        .as_f64()
                        .map(FieldValue::Float)
                        .ok_or_else(|| format!("expected number, got {}", json_kind(value)))
                }
            },
            FieldType::Boolean => value
                .as_bool()
                .map(FieldValue::Bool)
                .ok_or_else(|| format!("expected boolean, got {}", json_kind(value))),
            FieldType::DateTime => {
                let text = value
                    .as_str()
                    .ok_or_else(|| format!("expected timestamp, got {}", json_kind(value)))?;
                parse_timestamp(text).ok_or_else(|| format!("unparsable timestamp {:?}", text))
            },
            FieldType::Date => {
                let text = value
                    .as_str()
                    .ok_or_else(|| format!("expected date, got {}", json_kind(value)))?;
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(FieldValue::Date)
                    .map_err(|_| format!("unparsable date {:?}", text))
            },
            FieldType::StringList => typed_list(value, FieldType::String),
            FieldType::DateTimeList => typed_list(value, FieldType::DateTime),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Parse the timestamp formats the API emits: RFC 3339 with an offset, then
/// naive `YYYY-MM-DDTHH:MM:SS[.fff]`, then a bare date.
fn parse_timestamp(text: &str) -> Option<FieldValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(FieldValue::DateTime(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(FieldValue::NaiveDateTime(dt));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(FieldValue::Date)
}

fn typed_list(value: &Value, item: FieldType) -> Result<FieldValue, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected list, got {}", json_kind(value)))?;
    items
        .iter()
        .map(|v| FieldValue::from_json_typed(v, item))
        .collect::<Result<Vec<_>, _>>()
        .map(FieldValue::List)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Untyped conversion: strings stay strings.
impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FieldValue::Str(s.clone()),
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::from(&value)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        FieldValue::NaiveDateTime(dt)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt.fixed_offset())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
