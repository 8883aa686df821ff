// ABOUTME: USDA NDB nutrient-lookup collaborator for foodlab
// ABOUTME: Exposes the FoodSource trait, the HTTP client, a mock, and report conversion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

#![deny(unsafe_code)]

//! # Foodlab NDB
//!
//! Thin collaborator around the USDA National Nutrient Database API. It
//! searches foods page by page, fetches food reports, and converts a report
//! into a [`foodlab_core::Food`] graph ready for the upsert coordinator.
//!
//! ```rust,no_run
//! use foodlab_ndb::{search_stream, NdbClient, NdbClientConfig, SearchConfig};
//! use futures_util::StreamExt;
//!
//! # async fn example() -> foodlab_core::AppResult<()> {
//! let client = NdbClient::new(NdbClientConfig {
//!     api_key: "your_api_key".to_owned(),
//!     ..NdbClientConfig::default()
//! });
//! let mut hits = search_stream(&client, "potato", SearchConfig::with_page_size(25));
//! while let Some(hit) = hits.next().await {
//!     println!("{}", hit?.name);
//! }
//! # Ok(())
//! # }
//! ```

/// HTTP client for the NDB API with caching and rate limiting
pub mod client;
/// Conversion of NDB food reports into graph foods
pub mod conversion;
/// Shared pooled HTTP client
pub mod http_client;
/// In-process food source for tests and offline use
pub mod mock;
/// NDB wire types
pub mod models;
/// Lazily paged search results
pub mod search_stream;
/// Food source abstraction
pub mod source;

pub use client::{NdbClient, NdbClientConfig};
pub use conversion::food_from_report;
pub use mock::MockNdbClient;
pub use models::{FoodReport, ReportMeasure, ReportNutrient, SearchHit, SearchPage};
pub use search_stream::{search_stream, SearchConfig, SearchStream};
pub use source::FoodSource;
