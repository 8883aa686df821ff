// ABOUTME: Lazily paged stream over NDB search results
// ABOUTME: Fetches the next page only when the buffered hits are exhausted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! # Search Stream
//!
//! Pages are requested with `offset`/`max` until the reported `total` is
//! reached, an empty page comes back, or `max_results` hits were yielded.
//! At most one page of hits is buffered at a time.

use std::pin::Pin;

use async_stream::try_stream;
use foodlab_core::constants::defaults;
use foodlab_core::AppError;
use futures_util::{stream, Stream};
use tracing::debug;

use crate::models::SearchHit;
use crate::source::FoodSource;

/// Smallest accepted page size
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest page size the API accepts
pub const MAX_PAGE_SIZE: usize = 1500;

/// Search stream configuration
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Hits requested per page
    pub page_size: usize,
    /// Stop after this many hits (None for all)
    pub max_results: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::NDB_PAGE_SIZE,
            max_results: None,
        }
    }
}

impl SearchConfig {
    /// Configuration with the given page size, clamped to the accepted range
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            max_results: None,
        }
    }

    /// Limit the total number of hits
    #[must_use]
    pub const fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }
}

/// Stream returned by [`search_stream`]
pub type SearchStream<'a> = Pin<Box<dyn Stream<Item = Result<SearchHit, AppError>> + Send + 'a>>;

/// Stream every food matching `query`
///
/// An empty query yields a single `InvalidInput` error.
pub fn search_stream<'a>(
    source: &'a dyn FoodSource,
    query: &str,
    config: SearchConfig,
) -> SearchStream<'a> {
    let query = query.trim().to_owned();
    if query.is_empty() {
        return Box::pin(stream::once(async {
            Err(AppError::invalid_input("Search query cannot be empty"))
        }));
    }

    let page_size = config.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
    let max_results = config.max_results;

    Box::pin(try_stream! {
        let mut offset: usize = 0;
        let mut yielded: usize = 0;

        loop {
            if max_results.is_some_and(|max| yielded >= max) {
                break;
            }

            let page = source.search_page(&query, offset, page_size).await?;
            let fetched = page.items.len();
            debug!(query = %query, offset, fetched, total = page.total, "NDB search page");

            for hit in page.items {
                if max_results.is_some_and(|max| yielded >= max) {
                    break;
                }
                yielded += 1;
                yield hit;
            }

            offset += fetched;
            if fetched == 0 || offset >= page.total {
                break;
            }
        }
    })
}
