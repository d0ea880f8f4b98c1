//! ChartMogul API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - Basic auth header construction
//! - [`client`] - Executes one request and classifies the response
//! - [`deferred`] - Lazy handles returned by resource operations
//! - [`http`] - Transport trait and the `reqwest` backend

pub mod auth;
pub(crate) mod client;
pub mod deferred;
pub mod http;
