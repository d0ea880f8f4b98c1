//! Operation Dispatch
//!
//! Maps a resource operation plus caller arguments to one concrete REST call.

use super::hydrate::{hydrate_response, Response};
use super::registry::{ResourceDef, ResponseShape};
use super::value::FieldValue;
use crate::api::client;
use crate::api::deferred::Deferred;
use crate::api::http::HttpMethod;
use crate::config::Config;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keyword arguments for an operation.
///
/// Parameters fill `{param}` placeholders first; what is left goes to the
/// body or the query string depending on the verb. An explicit `data`
/// payload is always sent as the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    params: BTreeMap<String, FieldValue>,
    data: Option<BTreeMap<String, FieldValue>>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Args::new().with("uuid", uuid)`
    pub fn uuid(uuid: impl Into<String>) -> Self {
        Self::new().with("uuid", uuid.into())
    }

    /// Add a keyword parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add one field to the explicit body payload.
    pub fn data_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the explicit body payload from field pairs.
    pub fn data<K, V, I>(mut self, data: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.data = Some(data.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Set the explicit body payload from a JSON object.
    ///
    /// Non-object values are dropped with a warning and any payload set
    /// earlier is kept.
    pub fn data_json(mut self, data: Value) -> Self {
        match data {
            Value::Object(map) => {
                self.data = Some(
                    map.iter()
                        .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                        .collect(),
                );
            },
            other => {
                tracing::warn!("dropping non-object request payload: {}", other);
            },
        }
        self
    }

    pub fn param(&self, key: &str) -> Option<&FieldValue> {
        self.params.get(key)
    }
}

/// A request resolved from an operation table, before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    /// Path with placeholders substituted, relative to the API root
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub response: ResponseShape,
}

/// Resolve an operation into a request without sending it.
///
/// Fails with a validation error when the operation is unknown or a path
/// placeholder has no value.
pub fn prepare(def: &ResourceDef, operation: &str, args: Args) -> Result<PreparedRequest> {
    let op = def.operation(operation)?;
    let Args { mut params, data } = args;

    let mut path = String::with_capacity(op.path.len());
    let mut rest = op.path.as_str();
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        let value = params
            .remove(name)
            .and_then(|v| v.to_text())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::MissingArgument {
                resource: def.name.clone(),
                operation: operation.to_string(),
                param: name.to_string(),
            })?;
        path.push_str(&rest[..start]);
        path.push_str(&urlencoding::encode(&value));
        rest = &rest[start + len + 1..];
    }
    path.push_str(rest);

    let (body, leftover) = match data {
        Some(data) => (Some(to_json_object(&data)), params),
        None if op.method.sends_body() && !params.is_empty() => {
            (Some(to_json_object(&params)), BTreeMap::new())
        },
        None => (None, params),
    };

    Ok(PreparedRequest {
        method: op.method,
        path,
        query: to_query(&leftover),
        body,
        response: op.response.clone(),
    })
}

/// Build a lazy call for `operation` on `def`.
///
/// Validation happens now; the request is only sent when the returned
/// [`Deferred`] is resolved.
pub fn call(config: &Config, def: &ResourceDef, operation: &str, args: Args) -> Deferred<Response> {
    let prepared = match prepare(def, operation, args) {
        Ok(prepared) => prepared,
        Err(e) => return Deferred::failed(e),
    };

    let config = config.clone();
    let def = def.clone();
    let operation = operation.to_string();

    Deferred::new(async move {
        tracing::info!(
            "call: resource={}, operation={}, path={}",
            def.name,
            operation,
            prepared.path
        );

        let value = client::send(
            &config,
            &def.name,
            prepared.method,
            &prepared.path,
            &prepared.query,
            prepared.body,
        )
        .await?;

        hydrate_response(&def, &prepared.response, &value, config.unknown_fields())
    })
}

fn to_json_object(fields: &BTreeMap<String, FieldValue>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<Map<String, Value>>(),
    )
}

/// Flatten parameters into query pairs: lists repeat their key, nulls vanish.
fn to_query(params: &BTreeMap<String, FieldValue>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for (key, value) in params {
        match value {
            FieldValue::Null => {},
            FieldValue::List(items) => {
                for item in items {
                    match item.to_text() {
                        Some(text) => pairs.push((key.clone(), text)),
                        None => tracing::warn!("dropping non-scalar item of query parameter {}", key),
                    }
                }
            },
            FieldValue::Map(_) => {
                tracing::warn!("dropping object-valued query parameter {}", key);
            },
            scalar => {
                if let Some(text) = scalar.to_text() {
                    pairs.push((key.clone(), text));
                }
            },
        }
    }

    pairs
}
