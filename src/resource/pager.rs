//! Pagination
//!
//! Walks a collection operation page by page. Cursor pagination is followed
//! while `has_more` is true; responses that only report
//! `current_page`/`total_pages` are walked by page number instead.

use super::dispatch::{call, Args};
use super::hydrate::{Collection, Record};
use super::registry::ResourceDef;
use crate::config::Config;
use crate::error::Result;

/// Where the next request should start
#[derive(Debug, Clone, PartialEq)]
enum Continuation {
    First,
    Cursor(String),
    Page(u64),
    Done,
}

/// A lazy sequence of pages for one collection operation.
///
/// Owns its configuration and definition, so there are no lifetime parameters.
pub struct Pages {
    config: Config,
    def: ResourceDef,
    operation: String,
    args: Args,
    next: Continuation,
}

impl Pages {
    pub fn new(config: &Config, def: &ResourceDef, operation: &str, args: Args) -> Self {
        Self {
            config: config.clone(),
            def: def.clone(),
            operation: operation.to_string(),
            args,
            next: Continuation::First,
        }
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` when all pages have been exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Collection>> {
        let args = match self.next.clone() {
            Continuation::Done => return Ok(None),
            Continuation::First => self.args.clone(),
            Continuation::Cursor(cursor) => self.args.clone().with("cursor", cursor),
            Continuation::Page(page) => match i64::try_from(page) {
                Ok(page) => self.args.clone().with("page", page),
                Err(_) => {
                    tracing::warn!(
                        "{}.{}: page {} out of range, stopping",
                        self.def.name,
                        self.operation,
                        page
                    );
                    self.next = Continuation::Done;
                    return Ok(None);
                },
            },
        };

        let page = call(&self.config, &self.def, &self.operation, args)
            .and_then(|response| response.into_collection())
            .get()
            .await;

        let page = match page {
            Ok(page) => page,
            Err(e) => {
                self.next = Continuation::Done;
                return Err(e);
            },
        };

        self.next = continuation_after(&page, &self.next);
        tracing::debug!(
            "{}.{}: page of {} entries, next={:?}",
            self.def.name,
            self.operation,
            page.len(),
            self.next
        );

        Ok(Some(page))
    }

    /// Collect the entries of every remaining page.
    pub async fn collect_all(mut self) -> Result<Vec<Record>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page.entries);
        }
        Ok(all)
    }
}

fn continuation_after(page: &Collection, previous: &Continuation) -> Continuation {
    if let Some(cursor) = page.next_cursor() {
        // A repeated cursor would loop forever
        if matches!(previous, Continuation::Cursor(c) if c == cursor) {
            return Continuation::Done;
        }
        return Continuation::Cursor(cursor.to_string());
    }

    match (page.current_page, page.total_pages) {
        (Some(current), Some(total)) if current < total => Continuation::Page(current + 1),
        _ => Continuation::Done,
    }
}
