// ABOUTME: Process-wide pooled reqwest client used by the NDB client and the Dgraph store
// ABOUTME: Pool settings are fixed at startup; later callers reuse the same connections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! Shared outbound HTTP.
//!
//! Every remote call in a foodlab process (NDB lookups and Dgraph requests)
//! goes through one connection pool. The CLI configures it once from the
//! store settings before opening any client; library users who never call
//! [`configure_shared_client`] get [`PoolSettings::default`].

use foodlab_core::constants::defaults;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("foodlab/", env!("CARGO_PKG_VERSION"));

/// Settings applied when the pooled client is first built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Whole-request timeout in seconds; callers may shorten it per request
    pub timeout_secs: u64,
    /// TCP/TLS connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle connections kept per host
    pub max_idle_per_host: usize,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::STORE_TIMEOUT_SECS,
            connect_timeout_secs: defaults::STORE_CONNECT_TIMEOUT_SECS,
            max_idle_per_host: 8,
        }
    }
}

impl PoolSettings {
    fn build(self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .pool_max_idle_per_host(self.max_idle_per_host)
            .build()
    }
}

static SETTINGS: OnceLock<PoolSettings> = OnceLock::new();
static CLIENT: OnceLock<Client> = OnceLock::new();

/// Fix the pool settings for this process
///
/// Returns `false` when settings were already fixed, either by an earlier
/// call or because the pool was built before this call.
pub fn configure_shared_client(settings: PoolSettings) -> bool {
    if CLIENT.get().is_some() {
        warn!("shared HTTP client already built; pool settings ignored");
        return false;
    }
    SETTINGS.set(settings).is_ok()
}

/// Handle to the pooled client
///
/// Clones share the same connection pool.
pub fn shared_client() -> Client {
    CLIENT
        .get_or_init(|| {
            let settings = *SETTINGS.get_or_init(PoolSettings::default);
            debug!(?settings, "building shared HTTP client");
            settings.build().unwrap_or_else(|e| {
                warn!(error = %e, "shared HTTP client fell back to reqwest defaults");
                Client::new()
            })
        })
        .clone()
}
