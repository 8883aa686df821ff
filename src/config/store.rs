// ABOUTME: Dgraph graph store connection settings loaded from the environment
// ABOUTME: Endpoint URL, optional access token, timeouts, and query retry budget
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::constants::{defaults, env_config};
use std::time::Duration;

use super::{env_var_opt, env_var_or};

/// Graph store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Dgraph HTTP endpoint
    pub url: String,
    /// Value of the `X-Dgraph-AccessToken` header
    pub access_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Retries for read-only queries on transport failure
    pub query_retries: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: defaults::DGRAPH_URL.to_owned(),
            access_token: None,
            timeout_secs: defaults::STORE_TIMEOUT_SECS,
            connect_timeout_secs: defaults::STORE_CONNECT_TIMEOUT_SECS,
            query_retries: defaults::STORE_QUERY_RETRIES,
        }
    }
}

impl StoreConfig {
    /// Load graph store configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            url: env_var_or(env_config::DGRAPH_URL, defaults::DGRAPH_URL),
            access_token: env_var_opt(env_config::DGRAPH_TOKEN),
            timeout_secs: env_var_or(
                env_config::STORE_TIMEOUT_SECS,
                &defaults::STORE_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .unwrap_or(defaults::STORE_TIMEOUT_SECS),
            connect_timeout_secs: env_var_or(
                env_config::STORE_CONNECT_TIMEOUT_SECS,
                &defaults::STORE_CONNECT_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .unwrap_or(defaults::STORE_CONNECT_TIMEOUT_SECS),
            query_retries: env_var_or(
                env_config::STORE_QUERY_RETRIES,
                &defaults::STORE_QUERY_RETRIES.to_string(),
            )
            .parse()
            .unwrap_or(defaults::STORE_QUERY_RETRIES),
        }
    }

    /// Per-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear() {
        for key in [
            env_config::DGRAPH_URL,
            env_config::DGRAPH_TOKEN,
            env_config::STORE_TIMEOUT_SECS,
            env_config::STORE_CONNECT_TIMEOUT_SECS,
            env_config::STORE_QUERY_RETRIES,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        assert_eq!(StoreConfig::from_env(), StoreConfig::default());
    }

    #[test]
    #[serial]
    fn test_overrides_and_bad_numbers() {
        clear();
        env::set_var(env_config::DGRAPH_URL, "http://dgraph:8080");
        env::set_var(env_config::DGRAPH_TOKEN, "secret");
        env::set_var(env_config::STORE_TIMEOUT_SECS, "5");
        env::set_var(env_config::STORE_QUERY_RETRIES, "many");

        let config = StoreConfig::from_env();
        assert_eq!(config.url, "http://dgraph:8080");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.query_retries, defaults::STORE_QUERY_RETRIES);
        clear();
    }
}
