// ABOUTME: FoodSource trait implemented by the NDB HTTP client and the mock
// ABOUTME: Lets the composer and search stream run without network access in tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use async_trait::async_trait;
use foodlab_core::AppResult;

use crate::models::{FoodReport, SearchPage};

/// Paged food search plus food reports
#[async_trait]
pub trait FoodSource: Send + Sync {
    /// Fetch one page of foods matching `query`
    ///
    /// # Errors
    ///
    /// Returns an error if the query is empty or the lookup service fails.
    async fn search_page(&self, query: &str, offset: usize, max: usize) -> AppResult<SearchPage>;

    /// Fetch the full nutrient report of a food
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown food number, or an
    /// external service error if the lookup service fails.
    async fn food_report(&self, ndbno: &str) -> AppResult<FoodReport>;
}
