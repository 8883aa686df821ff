// ABOUTME: Configuration management for the graph store, NDB client, and upsert behavior
// ABOUTME: Loaded from environment variables; no addresses or credentials are compiled in
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! Configuration module for foodlab
//!
//! - **Store**: Dgraph endpoint, access token, timeouts, query retries
//! - **NDB**: API key, base URL, paging, caching, rate limiting
//! - **Upsert**: post-create duplicate verification

use foodlab_core::constants::env_config;
use std::env;
use tracing::debug;

/// NDB client configuration
pub mod ndb;
/// Graph store configuration
pub mod store;

pub use ndb::NdbConfig;
pub use store::StoreConfig;

/// Upsert coordinator behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertConfig {
    /// Re-query natural keys after creating a node and report duplicates
    pub verify_after_create: bool,
}

impl UpsertConfig {
    /// Load upsert configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            verify_after_create: env_flag(env_config::UPSERT_VERIFY),
        }
    }
}

/// Complete foodlab configuration
#[derive(Debug, Clone)]
pub struct FoodlabConfig {
    /// Graph store connection
    pub store: StoreConfig,
    /// NDB client
    pub ndb: NdbConfig,
    /// Upsert coordinator
    pub upsert: UpsertConfig,
}

impl FoodlabConfig {
    /// Load configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self {
            store: StoreConfig::from_env(),
            ndb: NdbConfig::from_env(),
            upsert: UpsertConfig::from_env(),
        };
        debug!(
            store.url = %config.store.url,
            store.token = config.store.access_token.is_some(),
            ndb.key = config.ndb.api_key.is_some(),
            upsert.verify = config.upsert.verify_after_create,
            "configuration loaded"
        );
        config
    }
}

/// Get environment variable or default value
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Non-empty environment variable
pub(crate) fn env_var_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Boolean flag: `1`, `true`, `yes`, `on` (any case) are true
pub(crate) fn env_flag(key: &str) -> bool {
    env::var(key).is_ok_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_upsert_verify_flag() {
        env::remove_var(env_config::UPSERT_VERIFY);
        assert!(!UpsertConfig::from_env().verify_after_create);

        env::set_var(env_config::UPSERT_VERIFY, "TRUE");
        assert!(UpsertConfig::from_env().verify_after_create);

        env::set_var(env_config::UPSERT_VERIFY, "nope");
        assert!(!UpsertConfig::from_env().verify_after_create);
        env::remove_var(env_config::UPSERT_VERIFY);
    }

    #[test]
    #[serial]
    fn test_blank_optional_is_none() {
        env::set_var("FOODLAB_TEST_BLANK", "  ");
        assert!(env_var_opt("FOODLAB_TEST_BLANK").is_none());
        env::remove_var("FOODLAB_TEST_BLANK");
    }
}
