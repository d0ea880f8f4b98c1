//! Deferred results
//!
//! Every resource operation returns a [`Deferred`] instead of performing the
//! request right away. Nothing touches the network until [`Deferred::get`]
//! (or `.await`) runs it, so callers can build several calls and decide
//! themselves how to drive them.

use crate::error::{Error, Result};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::{Future, IntoFuture};

/// A pending API call.
#[must_use = "a Deferred does nothing until it is resolved with .get() or .await"]
pub struct Deferred<T> {
    future: BoxFuture<'static, Result<T>>,
}

impl<T: Send + 'static> Deferred<T> {
    pub(crate) fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// Wrap data that has already been fetched.
    pub fn ready(value: T) -> Self {
        Self::new(futures::future::ready(Ok(value)))
    }

    /// A call that fails without sending anything (validation errors).
    pub fn failed(error: Error) -> Self {
        Self::new(futures::future::ready(Err(error)))
    }

    /// Run the call and return its outcome.
    pub async fn get(self) -> Result<T> {
        self.future.await
    }

    /// Transform the successful value once resolved.
    pub fn map<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Deferred::new(self.future.map(|res| res.map(f)))
    }

    /// Chain a fallible conversion onto the result.
    pub fn and_then<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        Deferred::new(self.future.map(|res| res.and_then(f)))
    }
}

impl<T: Send + 'static> IntoFuture for Deferred<T> {
    type Output = Result<T>;
    type IntoFuture = BoxFuture<'static, Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}
