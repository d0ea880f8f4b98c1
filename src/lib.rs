//! Client library for the ChartMogul REST API.
//!
//! Resources are declared as data: each one has a field schema and an
//! operation table mapping names such as `all`, `modify` or `cancel` to an
//! HTTP verb, a URL template and a response shape. Every operation returns a
//! [`Deferred`] that sends exactly one request when resolved.
//!
//! ```no_run
//! use chartmogul::prelude::*;
//! use chrono::NaiveDate;
//!
//! # async fn run() -> chartmogul::Result<()> {
//! let config = Config::new("account-token");
//! let cancelled_at = NaiveDate::from_ymd_opt(2016, 1, 15)
//!     .and_then(|d| d.and_hms_opt(0, 0, 0))
//!     .expect("valid date");
//!
//! let subscription = CustomerSubscription::cancel(
//!     &config,
//!     Args::uuid("sub_e6bc5407").data_field("cancelled_at", cancelled_at),
//! )
//! .get()
//! .await?;
//! assert_eq!(subscription.kind(), "CustomerSubscription");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod resource;

pub use api::deferred::Deferred;
pub use api::http::{ApiRequest, ApiResponse, HttpMethod, ReqwestTransport, Transport};
pub use config::{Config, UnknownFields, DEFAULT_BASE_URL};
pub use error::{Error, ErrorKind, Result, TransportError};
pub use resource::{
    call, prepare, Args, Collection, FieldType, FieldValue, Pages, Record, Registry, ResourceDef,
    Response, ResponseShape,
};
pub use resource::{
    Account, Activity, Customer, CustomerSubscription, DataSource, Invoice, Metrics, Plan,
    PlanGroup, Subscription, Tag, Transaction,
};

/// Everything needed to call resources, including the capability traits.
pub mod prelude {
    pub use crate::resource::kinds::{
        ApiResource, Cancel, Create, Destroy, List, ListImported, Modify, Retrieve,
    };
    pub use crate::{
        Account, Activity, Args, Collection, Config, Customer, CustomerSubscription, DataSource,
        Deferred, Error, ErrorKind, FieldValue, Invoice, Metrics, Plan, PlanGroup, Record,
        Subscription, Tag, Transaction, UnknownFields,
    };
}
