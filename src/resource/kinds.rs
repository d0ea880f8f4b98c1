//! Concrete resource types
//!
//! Each type is a marker bound to a registry key. Capability traits expose
//! only the operations a resource declares, so `Plan::cancel` does not
//! compile while `CustomerSubscription::cancel` does.

use super::dispatch::{call, Args};
use super::hydrate::{Collection, Record, Response};
use super::pager::Pages;
use super::registry::{get_resource, ResourceDef};
use crate::api::deferred::Deferred;
use crate::config::Config;
use crate::error::{Error, Result};

/// A resource type backed by a registry definition.
pub trait ApiResource {
    /// Registry key, e.g. `customer_subscription`
    const KEY: &'static str;

    fn definition() -> Result<&'static ResourceDef> {
        get_resource(Self::KEY).ok_or_else(|| Error::UnknownResource(Self::KEY.to_string()))
    }

    /// Run any declared operation.
    fn call(config: &Config, operation: &str, args: Args) -> Deferred<Response> {
        match Self::definition() {
            Ok(def) => call(config, def, operation, args),
            Err(e) => Deferred::failed(e),
        }
    }

    fn fetch_record(config: &Config, operation: &str, args: Args) -> Deferred<Record> {
        Self::call(config, operation, args).and_then(Response::into_record)
    }

    fn fetch_collection(config: &Config, operation: &str, args: Args) -> Deferred<Collection> {
        Self::call(config, operation, args).and_then(Response::into_collection)
    }

    /// Page through a collection operation.
    fn pages(config: &Config, operation: &str, args: Args) -> Result<Pages> {
        Ok(Pages::new(config, Self::definition()?, operation, args))
    }
}

/// `all`: list resources, one page per call
pub trait List: ApiResource {
    fn all(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "all", args)
    }
}

/// `retrieve`: fetch one resource by `uuid`
pub trait Retrieve: ApiResource {
    fn retrieve(config: &Config, args: Args) -> Deferred<Record> {
        Self::fetch_record(config, "retrieve", args)
    }
}

/// `create`: POST a new resource
pub trait Create: ApiResource {
    fn create(config: &Config, args: Args) -> Deferred<Record> {
        Self::fetch_record(config, "create", args)
    }
}

/// `modify`: PATCH an existing resource
pub trait Modify: ApiResource {
    fn modify(config: &Config, args: Args) -> Deferred<Record> {
        Self::fetch_record(config, "modify", args)
    }
}

/// `destroy`: DELETE a resource
pub trait Destroy: ApiResource {
    fn destroy(config: &Config, args: Args) -> Deferred<()> {
        Self::call(config, "destroy", args).and_then(Response::into_empty)
    }
}

/// `cancel`: cancel through the import endpoint
pub trait Cancel: ApiResource {
    fn cancel(config: &Config, args: Args) -> Deferred<Record> {
        Self::fetch_record(config, "cancel", args)
    }
}

/// `list_imported`: list what was imported for a customer
pub trait ListImported: ApiResource {
    fn list_imported(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "list_imported", args)
    }
}

macro_rules! resource {
    ($(#[$doc:meta])* $name:ident => $key:literal: $($cap:ident),*) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl ApiResource for $name {
            const KEY: &'static str = $key;
        }

        $(impl $cap for $name {})*
    };
}

resource!(
    /// Billing system connection that imported data belongs to
    DataSource => "data_source": List, Create, Retrieve, Destroy
);
resource!(Customer => "customer": List, Create, Retrieve, Modify, Destroy);
resource!(Plan => "plan": List, Create, Retrieve, Modify, Destroy);
resource!(PlanGroup => "plan_group": List, Create, Retrieve, Modify, Destroy);
resource!(Invoice => "invoice": List, Retrieve, Destroy);
resource!(Transaction => "transaction": Create);
resource!(
    /// Imported subscription (import API)
    Subscription => "subscription": ListImported, Modify, Cancel
);
resource!(
    /// A customer's subscriptions: import endpoints plus the metrics listing
    CustomerSubscription => "customer_subscription": List, ListImported, Modify, Cancel
);
resource!(
    /// Aggregated SaaS metrics
    Metrics => "metrics": List
);
resource!(Activity => "activity": List);
resource!(Account => "account": Retrieve);
resource!(Tag => "tag":);

impl Customer {
    /// Find customers by email.
    pub fn search(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "search", args)
    }
}

impl Invoice {
    /// Import invoices for the customer `uuid`; the response lists them.
    pub fn create(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "create", args)
    }
}

impl Metrics {
    pub fn mrr(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "mrr", args)
    }

    pub fn arr(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "arr", args)
    }

    pub fn arpa(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "arpa", args)
    }

    pub fn asp(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "asp", args)
    }

    pub fn customer_count(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "customer_count", args)
    }

    pub fn customer_churn_rate(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "customer_churn_rate", args)
    }

    pub fn mrr_churn_rate(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "mrr_churn_rate", args)
    }

    pub fn ltv(config: &Config, args: Args) -> Deferred<Collection> {
        Self::fetch_collection(config, "ltv", args)
    }
}

impl Tag {
    /// Add tags to the customer `uuid`.
    pub fn add(config: &Config, args: Args) -> Deferred<Record> {
        Self::fetch_record(config, "add", args)
    }

    /// Remove tags from the customer `uuid`.
    pub fn remove(config: &Config, args: Args) -> Deferred<Record> {
        Self::fetch_record(config, "remove", args)
    }
}
