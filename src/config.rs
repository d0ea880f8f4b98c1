//! Client configuration
//!
//! Holds the account credentials, base URL and request options shared by
//! every call. Cloning a [`Config`] is cheap: the transport sits behind an
//! `Arc`.

use crate::api::auth::basic_auth_header;
use crate::api::http::{ReqwestTransport, Transport};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.chartmogul.com/v1";

/// What hydration does with response keys that no declared field claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Keep them in [`Record::extra`](crate::Record::extra).
    #[default]
    Preserve,
    /// Drop them.
    Ignore,
    /// Fail hydration on unknown keys, type mismatches and missing required
    /// fields.
    Strict,
}

/// Client configuration
#[derive(Clone)]
pub struct Config {
    account_token: String,
    secret_key: String,
    base_url: String,
    request_timeout: Option<Duration>,
    unknown_fields: UnknownFields,
    transport: Arc<dyn Transport>,
}

impl Config {
    /// Create a configuration for an account token, with an empty secret.
    pub fn new(account_token: impl Into<String>) -> Self {
        Self {
            account_token: account_token.into(),
            secret_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            unknown_fields: UnknownFields::default(),
            transport: Arc::new(ReqwestTransport::default()),
        }
    }

    /// Set the secret key (legacy token + secret authentication).
    pub fn with_secret(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    /// Point the client at another API root, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::Configuration(format!("invalid base URL {:?}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "base URL {:?} cannot carry a path",
                base_url
            )));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Per-request timeout handed to the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Replace the HTTP transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Value of the `Authorization` header sent with every request.
    pub fn auth_header(&self) -> String {
        basic_auth_header(&self.account_token, &self.secret_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn unknown_fields(&self) -> UnknownFields {
        self.unknown_fields
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Join an operation path onto the base URL.
    pub(crate) fn url_for(&self, path: &str) -> Result<Url> {
        let full = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&full).map_err(|e| Error::Configuration(format!("invalid URL {:?}: {}", full, e)))
    }
}

// Security: credentials never end up in logs through Debug.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("account_token", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("unknown_fields", &self.unknown_fields)
            .finish_non_exhaustive()
    }
}
