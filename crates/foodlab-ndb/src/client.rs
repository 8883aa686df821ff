// ABOUTME: USDA NDB API client for food search and food reports
// ABOUTME: Caches responses with a TTL and enforces a per-minute request budget
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! NDB HTTP client.
//!
//! Endpoints used:
//! - `GET {base}/search?format=json&q=..&offset=..&max=..&api_key=..`
//! - `GET {base}/reports?format=json&type=b&ndbno=..&api_key=..`
//!
//! The API reports some failures (unknown food number, zero search results)
//! as an `errors` object with a 200 status. A search with zero results is an
//! empty page; a report with errors is `ResourceNotFound`.

use async_trait::async_trait;
use foodlab_core::constants::defaults;
use foodlab_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::http_client::shared_client;
use crate::models::{FoodReport, ReportResponse, SearchPage, SearchResponse};
use crate::source::FoodSource;

const SERVICE: &str = "NDB API";

/// NDB client configuration
#[derive(Debug, Clone)]
pub struct NdbClientConfig {
    /// API key from <https://api.data.gov/signup>
    pub api_key: String,
    /// Base URL of the NDB API
    pub base_url: String,
    /// Cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Requests allowed per rolling minute
    pub rate_limit_per_minute: u32,
}

impl Default for NdbClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: defaults::NDB_BASE_URL.to_owned(),
            cache_ttl_secs: defaults::NDB_CACHE_TTL_SECS,
            rate_limit_per_minute: defaults::NDB_RATE_LIMIT_PER_MINUTE,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// Sliding-window request limiter
#[derive(Debug)]
struct RateLimiter {
    requests: VecDeque<Instant>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(limit: u32, window: Duration) -> Self {
        Self {
            requests: VecDeque::new(),
            limit: (limit as usize).max(1),
            window,
        }
    }

    /// Time to wait before the next request may go out
    fn delay(&mut self, now: Instant) -> Option<Duration> {
        while self
            .requests
            .front()
            .is_some_and(|&t| now.duration_since(t) >= self.window)
        {
            self.requests.pop_front();
        }
        if self.requests.len() < self.limit {
            return None;
        }
        self.requests
            .front()
            .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
    }

    async fn acquire(&mut self) {
        while let Some(wait) = self.delay(Instant::now()) {
            debug!(wait_ms = wait.as_millis() as u64, "NDB rate limit reached, waiting");
            tokio::time::sleep(wait).await;
        }
        self.requests.push_back(Instant::now());
    }
}

/// NDB API client
pub struct NdbClient {
    config: NdbClientConfig,
    http_client: reqwest::Client,
    search_cache: Arc<RwLock<HashMap<String, CacheEntry<SearchPage>>>>,
    report_cache: Arc<RwLock<HashMap<String, CacheEntry<FoodReport>>>>,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl NdbClient {
    /// Create a client using the shared pooled HTTP client
    #[must_use]
    pub fn new(config: NdbClientConfig) -> Self {
        Self::with_http_client(config, shared_client())
    }

    /// Create a client with a caller-provided HTTP client
    #[must_use]
    pub fn with_http_client(config: NdbClientConfig, http_client: reqwest::Client) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute, Duration::from_secs(60));
        Self {
            config,
            http_client,
            search_cache: Arc::new(RwLock::new(HashMap::new())),
            report_cache: Arc::new(RwLock::new(HashMap::new())),
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        }
    }

    /// Number of cached (search pages, reports)
    pub async fn cache_stats(&self) -> (usize, usize) {
        let searches = self.search_cache.read().await.len();
        let reports = self.report_cache.read().await.len();
        (searches, reports)
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache_ttl_secs)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        self.rate_limiter.lock().await.acquire().await;

        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));
        debug!(%url, "NDB request");
        let response = self
            .http_client
            .get(&url)
            .query(&[("format", "json"), ("api_key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()).with_source(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, endpoint, "NDB request failed");
            return Err(AppError::external_service(
                SERVICE,
                format!("HTTP {status}: {body}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::decode(format!("{SERVICE} {endpoint} response: {e}")))
    }
}

#[async_trait]
impl FoodSource for NdbClient {
    async fn search_page(&self, query: &str, offset: usize, max: usize) -> AppResult<SearchPage> {
        if query.trim().is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        let cache_key = format!("{query}:{offset}:{max}");
        {
            let cache = self.search_cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.data.clone());
                }
            }
        }

        let offset_param = offset.to_string();
        let max_param = max.to_string();
        let response: SearchResponse = self
            .get_json(
                "search",
                &[("q", query), ("offset", &offset_param), ("max", &max_param)],
            )
            .await?;

        let page = match (response.list, response.errors) {
            (Some(page), _) => page,
            (None, errors) => {
                if let Some(errors) = errors {
                    debug!(query, reason = %errors.joined(), "NDB search returned no list");
                }
                SearchPage {
                    start: offset,
                    ..SearchPage::default()
                }
            }
        };

        self.search_cache.write().await.insert(
            cache_key,
            CacheEntry {
                data: page.clone(),
                expires_at: Instant::now() + self.ttl(),
            },
        );
        Ok(page)
    }

    async fn food_report(&self, ndbno: &str) -> AppResult<FoodReport> {
        {
            let cache = self.report_cache.read().await;
            if let Some(entry) = cache.get(ndbno) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.data.clone());
                }
            }
        }

        let response: ReportResponse = self
            .get_json("reports", &[("ndbno", ndbno), ("type", "b")])
            .await?;

        let Some(body) = response.report else {
            let reason = response
                .errors
                .map(|e| e.joined())
                .unwrap_or_default();
            return Err(AppError::not_found(format!("NDB food {ndbno} ({reason})")));
        };

        self.report_cache.write().await.insert(
            ndbno.to_owned(),
            CacheEntry {
                data: body.food.clone(),
                expires_at: Instant::now() + self.ttl(),
            },
        );
        Ok(body.food)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_up_to_limit() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.delay(now).is_none());
        limiter.requests.push_back(now);
        assert!(limiter.delay(now).is_none());
        limiter.requests.push_back(now);
        let wait = limiter.delay(now).unwrap();
        assert!(wait <= Duration::from_secs(60));
        assert!(wait > Duration::from_secs(59));
    }

    #[test]
    fn test_rate_limiter_forgets_old_requests() {
        let mut limiter = RateLimiter::new(1, Duration::from_millis(10));
        let start = Instant::now();
        limiter.requests.push_back(start);
        assert!(limiter.delay(start + Duration::from_millis(20)).is_none());
        assert!(limiter.requests.is_empty());
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let mut limiter = RateLimiter::new(0, Duration::from_secs(60));
        assert!(limiter.delay(Instant::now()).is_none());
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_request() {
        let client = NdbClient::with_http_client(
            NdbClientConfig {
                base_url: "http://127.0.0.1:9".to_owned(),
                ..NdbClientConfig::default()
            },
            reqwest::Client::new(),
        );
        let error = client.search_page("   ", 0, 10).await.unwrap_err();
        assert_eq!(error.code, foodlab_core::ErrorCode::InvalidInput);
        assert_eq!(client.cache_stats().await, (0, 0));
    }
}
