//! Response hydration
//!
//! Converts parsed JSON into [`Record`]s and [`Collection`]s according to a
//! [`ResourceDef`]'s field schema.

use super::registry::{ResourceDef, ResponseShape};
use super::value::FieldValue;
use crate::config::UnknownFields;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keys every collection may carry besides its items
const PAGINATION_KEYS: &[&str] = &[
    "cursor",
    "has_more",
    "page",
    "per_page",
    "current_page",
    "total_pages",
];

/// Fallback list key for generic paginated responses
const GENERIC_ITEMS_KEY: &str = "entries";

/// One resource instance.
///
/// Equality is structural: two records with the same kind and values are
/// equal no matter how they were built.
#[derive(Debug, Clone, Default)]
pub struct Record {
    kind: String,
    fields: BTreeMap<String, FieldValue>,
    extra: BTreeMap<String, FieldValue>,
    /// JSON each hydrated field arrived as, dropped once the field is set
    wire: BTreeMap<String, Value>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.fields == other.fields && self.extra == other.extra
    }
}

impl Record {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Build a record directly from field values.
    pub fn from_fields<K, V, I>(kind: impl Into<String>, fields: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            kind: kind.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            extra: BTreeMap::new(),
            wire: BTreeMap::new(),
        }
    }

    /// Set a declared field.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let name = name.into();
        self.wire.remove(&name);
        self.fields.insert(name, value.into());
        self
    }

    /// Resource kind, e.g. `CustomerSubscription`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Remote identity: `uuid`, or `id` for resources keyed by number.
    pub fn uuid(&self) -> Option<String> {
        match self.get("uuid") {
            Some(FieldValue::Str(s)) => Some(s.clone()),
            _ => self.get("id").and_then(FieldValue::to_text),
        }
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Response keys not claimed by any declared field
    pub fn extra(&self) -> &BTreeMap<String, FieldValue> {
        &self.extra
    }

    /// Hydrate a single JSON object.
    pub fn hydrate(def: &ResourceDef, value: &Value, policy: UnknownFields) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| Error::Hydration {
            resource: def.name.clone(),
            reason: format!("expected an object, got {}", short_kind(value)),
        })?;

        let mut record = Record::new(def.name.clone());

        for (key, raw) in object {
            let Some(field) = def.field_by_key(key) else {
                match policy {
                    UnknownFields::Preserve => {
                        record.extra.insert(key.clone(), FieldValue::from(raw));
                    },
                    UnknownFields::Ignore => {},
                    UnknownFields::Strict => {
                        return Err(Error::Hydration {
                            resource: def.name.clone(),
                            reason: format!("unknown field `{}`", key),
                        });
                    },
                }
                continue;
            };

            let converted = match FieldValue::from_json_typed(raw, field.ty) {
                Ok(v) => v,
                Err(reason) if policy == UnknownFields::Strict => {
                    return Err(Error::Hydration {
                        resource: def.name.clone(),
                        reason: format!("field `{}`: {}", field.name, reason),
                    });
                },
                Err(reason) => {
                    tracing::debug!("{}.{} kept raw: {}", def.name, field.name, reason);
                    FieldValue::from(raw)
                },
            };
            record.wire.insert(field.name.clone(), raw.clone());
            record.fields.insert(field.name.clone(), converted);
        }

        if policy == UnknownFields::Strict {
            if let Some(missing) = def
                .fields
                .iter()
                .find(|f| f.required && !record.fields.contains_key(&f.name))
            {
                return Err(Error::Hydration {
                    resource: def.name.clone(),
                    reason: format!("missing required field `{}`", missing.name),
                });
            }
        }

        Ok(record)
    }

    /// Writable declared fields as a request body, keyed by wire key.
    ///
    /// Fields left as hydrated are written back exactly as received, so
    /// `2016-01-15T00:00:00.000Z` keeps its `Z` and fraction.
    pub fn to_body(&self, def: &ResourceDef) -> Value {
        let body: Map<String, Value> = def
            .fields
            .iter()
            .filter(|f| !f.read_only)
            .filter_map(|f| {
                let value = match self.wire.get(&f.name) {
                    Some(raw) => raw.clone(),
                    None => self.fields.get(&f.name)?.to_json(),
                };
                Some((f.wire_key().to_string(), value))
            })
            .collect();
        Value::Object(body)
    }
}

/// A page of records plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    pub kind: String,
    /// Response key the entries were read from (`subscriptions`, `entries`, ...)
    pub items_key: String,
    pub entries: Vec<Record>,
    /// Cursor as returned by the API
    pub cursor: Option<String>,
    pub has_more: bool,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub current_page: Option<u64>,
    pub total_pages: Option<u64>,
    /// Remaining top-level fields, e.g. `customer_uuid` or `summary`
    pub meta: BTreeMap<String, FieldValue>,
}

impl Collection {
    /// Hydrate a list response, reading items from `items_key` or `entries`.
    pub fn hydrate(
        def: &ResourceDef,
        items_key: &str,
        value: &Value,
        policy: UnknownFields,
    ) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| Error::Hydration {
            resource: def.name.clone(),
            reason: format!("expected a collection object, got {}", short_kind(value)),
        })?;

        let no_items = Vec::new();
        let found = [items_key, GENERIC_ITEMS_KEY]
            .into_iter()
            .find_map(|key| object.get(key).and_then(Value::as_array).map(|items| (key, items)));

        let (used_key, items) = match found {
            Some(found) => found,
            None if policy == UnknownFields::Strict => {
                return Err(Error::Hydration {
                    resource: def.name.clone(),
                    reason: format!("no `{}` list in response", items_key),
                });
            },
            None => {
                tracing::warn!("{}: no `{}` list in response", def.name, items_key);
                (items_key, &no_items)
            },
        };

        let entries = items
            .iter()
            .map(|item| Record::hydrate(def, item, policy))
            .collect::<Result<Vec<_>>>()?;

        let meta = object
            .iter()
            .filter(|(key, _)| key.as_str() != used_key && !PAGINATION_KEYS.contains(&key.as_str()))
            .map(|(key, v)| (key.clone(), FieldValue::from(v)))
            .collect();

        Ok(Collection {
            kind: def.name.clone(),
            items_key: used_key.to_string(),
            entries,
            cursor: object.get("cursor").and_then(Value::as_str).map(str::to_string),
            has_more: object.get("has_more").and_then(Value::as_bool).unwrap_or(false),
            page: object.get("page").and_then(Value::as_u64),
            per_page: object.get("per_page").and_then(Value::as_u64),
            current_page: object.get("current_page").and_then(Value::as_u64),
            total_pages: object.get("total_pages").and_then(Value::as_u64),
            meta,
        })
    }

    /// Cursor for the next page; `None` once `has_more` is false.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.cursor.as_deref()
        } else {
            None
        }
    }

    /// Collection-level value such as `customer_uuid`
    pub fn meta(&self, key: &str) -> Option<&FieldValue> {
        self.meta.get(key)
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta(key).and_then(FieldValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.entries.iter()
    }
}

impl IntoIterator for Collection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Outcome of a dispatched operation
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Record(Record),
    Collection(Collection),
    Empty,
}

impl Response {
    pub fn into_record(self) -> Result<Record> {
        match self {
            Response::Record(record) => Ok(record),
            other => Err(shape_mismatch("a single object", &other)),
        }
    }

    pub fn into_collection(self) -> Result<Collection> {
        match self {
            Response::Collection(collection) => Ok(collection),
            other => Err(shape_mismatch("a collection", &other)),
        }
    }

    pub fn into_empty(self) -> Result<()> {
        match self {
            Response::Empty => Ok(()),
            other => Err(shape_mismatch("no content", &other)),
        }
    }
}

fn shape_mismatch(expected: &str, got: &Response) -> Error {
    let (resource, got) = match got {
        Response::Record(r) => (r.kind().to_string(), "a single object"),
        Response::Collection(c) => (c.kind.clone(), "a collection"),
        Response::Empty => (String::new(), "no content"),
    };
    Error::Hydration {
        resource,
        reason: format!("operation returns {}, not {}", got, expected),
    }
}

/// Hydrate a response body according to the declared shape.
pub fn hydrate_response(
    def: &ResourceDef,
    shape: &ResponseShape,
    value: &Value,
    policy: UnknownFields,
) -> Result<Response> {
    match shape {
        ResponseShape::Single => Record::hydrate(def, value, policy).map(Response::Record),
        ResponseShape::Collection { items_key } => {
            Collection::hydrate(def, items_key, value, policy).map(Response::Collection)
        },
        ResponseShape::Empty => Ok(Response::Empty),
    }
}

fn short_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
