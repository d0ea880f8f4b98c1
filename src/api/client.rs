//! Request execution
//!
//! Turns a dispatched operation into one transport call and classifies the
//! outcome: parsed JSON on 2xx, [`Error::Api`] otherwise.

use super::http::{sanitize_for_log, ApiRequest, HttpMethod};
use crate::config::Config;
use crate::error::{Error, Result};
use serde_json::Value;

/// Send a single request and parse its JSON body.
///
/// An empty 2xx body is returned as `Value::Null`. `resource` names the
/// kind being fetched in hydration errors.
pub(crate) async fn send(
    config: &Config,
    resource: &str,
    method: HttpMethod,
    path: &str,
    query: &[(String, String)],
    body: Option<Value>,
) -> Result<Value> {
    let mut url = config.url_for(path)?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    let request = ApiRequest {
        method,
        url,
        authorization: config.auth_header(),
        body,
        timeout: config.request_timeout(),
    };

    let response = config.transport().send(request).await?;

    if !response.is_success() {
        // Security: Only log sanitized/truncated error body to avoid leaking customer data
        tracing::error!(
            "API error: {} {} -> {} - {}",
            method,
            path,
            response.status,
            sanitize_for_log(&response.body)
        );
        let body = serde_json::from_str(&response.body)
            .unwrap_or_else(|_| Value::String(response.body.clone()));
        return Err(Error::Api {
            status: response.status,
            body,
        });
    }

    // Handle empty response
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&response.body).map_err(|e| Error::Hydration {
        resource: resource.to_string(),
        reason: format!("response from {} is not JSON: {}", path, e),
    })
}
