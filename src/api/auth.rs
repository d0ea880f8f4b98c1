//! Authentication
//!
//! ChartMogul uses HTTP Basic auth: the account token is the user name and the
//! secret key (empty for token-only accounts) the password.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Build the `Authorization` header value for a token/secret pair.
pub fn basic_auth_header(account_token: &str, secret_key: &str) -> String {
    let credentials = format!("{}:{}", account_token, secret_key);
    format!("Basic {}", STANDARD.encode(credentials))
}
