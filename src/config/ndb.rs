// ABOUTME: NDB nutrient-lookup client settings loaded from the environment
// ABOUTME: The API key is required only by commands that call the NDB API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::constants::{defaults, env_config};
use foodlab_core::{AppError, AppResult};
use foodlab_ndb::search_stream::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use foodlab_ndb::NdbClientConfig;

use super::{env_var_opt, env_var_or};

/// NDB client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdbConfig {
    /// API key; absent until configured
    pub api_key: Option<String>,
    /// Base URL of the NDB API
    pub base_url: String,
    /// Search page size
    pub page_size: usize,
    /// Cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Requests per minute
    pub rate_limit_per_minute: u32,
}

impl Default for NdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::NDB_BASE_URL.to_owned(),
            page_size: defaults::NDB_PAGE_SIZE,
            cache_ttl_secs: defaults::NDB_CACHE_TTL_SECS,
            rate_limit_per_minute: defaults::NDB_RATE_LIMIT_PER_MINUTE,
        }
    }
}

impl NdbConfig {
    /// Load NDB configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: env_var_opt(env_config::NDB_API_KEY),
            base_url: env_var_or(env_config::NDB_BASE_URL, defaults::NDB_BASE_URL),
            page_size: env_var_or(
                env_config::NDB_PAGE_SIZE,
                &defaults::NDB_PAGE_SIZE.to_string(),
            )
            .parse::<usize>()
            .unwrap_or(defaults::NDB_PAGE_SIZE)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            cache_ttl_secs: env_var_or(
                env_config::NDB_CACHE_TTL_SECS,
                &defaults::NDB_CACHE_TTL_SECS.to_string(),
            )
            .parse()
            .unwrap_or(defaults::NDB_CACHE_TTL_SECS),
            rate_limit_per_minute: env_var_or(
                env_config::NDB_RATE_LIMIT_PER_MINUTE,
                &defaults::NDB_RATE_LIMIT_PER_MINUTE.to_string(),
            )
            .parse()
            .unwrap_or(defaults::NDB_RATE_LIMIT_PER_MINUTE),
        }
    }

    /// Build the client configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no API key is set
    pub fn client_config(&self) -> AppResult<NdbClientConfig> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            AppError::config(format!(
                "{} must be set to use the NDB API",
                env_config::NDB_API_KEY
            ))
        })?;
        Ok(NdbClientConfig {
            api_key,
            base_url: self.base_url.clone(),
            cache_ttl_secs: self.cache_ttl_secs,
            rate_limit_per_minute: self.rate_limit_per_minute,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodlab_core::ErrorCode;
    use serial_test::serial;
    use std::env;

    fn clear() {
        for key in [
            env_config::NDB_API_KEY,
            env_config::NDB_BASE_URL,
            env_config::NDB_PAGE_SIZE,
            env_config::NDB_CACHE_TTL_SECS,
            env_config::NDB_RATE_LIMIT_PER_MINUTE,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_missing_key_is_config_error() {
        clear();
        let config = NdbConfig::from_env();
        assert_eq!(config, NdbConfig::default());
        let error = config.client_config().unwrap_err();
        assert_eq!(error.code, ErrorCode::ConfigError);
        assert!(error.message.contains(env_config::NDB_API_KEY));
    }

    #[test]
    #[serial]
    fn test_page_size_is_clamped() {
        clear();
        env::set_var(env_config::NDB_API_KEY, "key");
        env::set_var(env_config::NDB_PAGE_SIZE, "99999");
        let config = NdbConfig::from_env();
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.client_config().unwrap().api_key, "key");

        env::set_var(env_config::NDB_PAGE_SIZE, "0");
        assert_eq!(NdbConfig::from_env().page_size, MIN_PAGE_SIZE);
        clear();
    }
}
