//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads all ChartMogul resource definitions from embedded JSON
//! files and provides lookup functions for the rest of the crate.

use super::value::FieldType;
use crate::api::http::HttpMethod;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../../resources/import.json"),
    include_str!("../../resources/metrics.json"),
    include_str!("../../resources/crm.json"),
];

/// Field definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Wire key when it differs from `name` (e.g. `billing-cycle`)
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "type", default)]
    pub ty: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Assigned by the API; never echoed back in a request body
    #[serde(default)]
    pub read_only: bool,
}

impl FieldDef {
    /// Key used in JSON payloads
    pub fn wire_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }
}

/// Expected shape of an operation's response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// One resource object
    Single,
    /// A paginated list found under `items_key`
    Collection { items_key: String },
    /// No meaningful body
    Empty,
}

/// Operation definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct OperationDef {
    pub method: HttpMethod,
    /// URL template relative to the API root, with `{param}` placeholders
    pub path: String,
    pub response: ResponseShape,
}

impl OperationDef {
    /// Names of the `{param}` placeholders, in order of appearance
    pub fn path_params(&self) -> Vec<&str> {
        let mut params = Vec::new();
        let mut rest = self.path.as_str();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            params.push(&rest[start + 1..start + len]);
            rest = &rest[start + len + 1..];
        }
        params
    }
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    /// Kind name stamped on hydrated records, e.g. `CustomerSubscription`
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub operations: HashMap<String, OperationDef>,
}

impl ResourceDef {
    /// Look up an operation, failing with a validation error.
    pub fn operation(&self, name: &str) -> Result<&OperationDef> {
        self.operations
            .get(name)
            .ok_or_else(|| Error::UnsupportedOperation {
                resource: self.name.clone(),
                operation: name.to_string(),
            })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Find the field declared for a wire key
    pub fn field_by_key(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.wire_key() == key)
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

impl Registry {
    /// Parse one definition document.
    pub fn from_json(content: &str) -> Result<Self> {
        let registry: Registry = serde_json::from_str(content)
            .map_err(|e| Error::Configuration(format!("invalid resource definitions: {}", e)))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Merge another document into this one; later keys win.
    pub fn extend(&mut self, other: Registry) {
        self.resources.extend(other.resources);
    }

    /// Look up a resource definition by key
    pub fn get(&self, key: &str) -> Result<&ResourceDef> {
        self.resources
            .get(key)
            .ok_or_else(|| Error::UnknownResource(key.to_string()))
    }

    fn validate(&self) -> Result<()> {
        for (key, def) in &self.resources {
            for (op_name, op) in &def.operations {
                if op.path.matches('{').count() != op.path.matches('}').count() {
                    return Err(Error::Configuration(format!(
                        "{}.{}: unbalanced placeholder in {:?}",
                        key, op_name, op.path
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut final_registry = Registry::default();

        for content in RESOURCE_FILES {
            let partial = Registry::from_json(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_registry.extend(partial);
        }

        final_registry
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<&str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}
