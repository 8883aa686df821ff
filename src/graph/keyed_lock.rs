// ABOUTME: Per-natural-key async mutexes serializing check-then-create upserts
// ABOUTME: Entries are dropped from the map once no task holds or awaits them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Async mutex per key
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Held lock for one key; released on drop
#[derive(Debug)]
pub struct KeyedLockGuard<'a> {
    owner: &'a KeyedLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    /// Empty lock table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn lock(&self, key: &str) -> KeyedLockGuard<'_> {
        let lock = self
            .locks
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        KeyedLockGuard {
            owner: self,
            key: key.to_owned(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently locked or awaited
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no key is locked or awaited
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl KeyedLockGuard<'_> {
    /// Key this guard holds
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        // Only the map's own Arc remains when nobody else is waiting
        self.owner
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
