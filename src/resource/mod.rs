//! Resource abstraction layer
//!
//! This module provides a data-driven approach to ChartMogul resources.
//! Resource definitions are loaded from JSON files at compile time, so a new
//! resource type is a JSON entry plus a marker type.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`dispatch`] - Maps an operation and its arguments to a concrete REST call
//! - [`hydrate`] - Turns responses into records and collections
//! - [`pager`] - Follows cursors across pages
//! - [`kinds`] - Marker types and capability traits per resource
//! - [`value`] - Dynamically typed field values
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `resources/`:
//! - `import.json` - Import API resources (customers, plans, invoices, subscriptions)
//! - `metrics.json` - Metrics API resources
//! - `crm.json` - Account and customer attributes
//!
//! # Example
//!
//! ```ignore
//! use chartmogul::prelude::*;
//!
//! async fn list(config: &Config) -> chartmogul::Result<()> {
//!     let subs = CustomerSubscription::all(config, Args::uuid("cus_123")).get().await?;
//!     for sub in subs {
//!         println!("{:?}", sub.get_str("external_id"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod dispatch;
pub mod hydrate;
pub mod kinds;
pub mod pager;
pub mod registry;
pub mod value;

pub use dispatch::{call, prepare, Args, PreparedRequest};
pub use hydrate::{hydrate_response, Collection, Record, Response};
pub use kinds::*;
pub use pager::Pages;
pub use registry::{
    get_all_resource_keys, get_registry, get_resource, FieldDef, OperationDef, Registry,
    ResourceDef, ResponseShape,
};
pub use value::{FieldType, FieldValue};
