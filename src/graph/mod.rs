// ABOUTME: Graph store RPC surface (alter, query, mutate) and its implementations
// ABOUTME: Dgraph over HTTP for production and an in-memory store for tests and offline use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! # Graph Store
//!
//! The core components only need three operations from the store:
//!
//! - `alter(schema)` declares predicates, indexes, and types
//! - `query(text, variables)` runs a read-only query and returns JSON bytes
//! - `mutate(set_json, commit_now)` writes nodes and returns the ids assigned
//!   to every `_:<key>` placeholder, keyed by `<key>`
//!
//! Every call runs under a [`CallContext`] carrying a deadline and a
//! cancellation token.

use async_trait::async_trait;
use foodlab_core::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deadline and cancellation for store calls
pub mod context;
/// Dgraph HTTP API client
pub mod dgraph;
/// Per-key async locks
pub mod keyed_lock;
/// In-memory graph store
pub mod memory;
/// JSON mutation builders
pub mod mutation;
/// Query texts and response decoding
pub mod queries;
/// Dgraph schema
pub mod schema;

pub use context::{CallContext, CancellationToken};
pub use dgraph::DgraphHttpStore;
pub use keyed_lock::KeyedLocks;
pub use memory::MemoryGraphStore;

/// Query variables, keyed with their `$` prefix
pub type QueryVariables = HashMap<String, String>;

/// Result of a committed mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// Assigned id per placeholder key (without the `_:` prefix)
    #[serde(default)]
    pub uids: HashMap<String, String>,
}

/// Graph database RPC surface
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Apply schema text
    ///
    /// # Errors
    ///
    /// `Schema` if the store rejects the schema, `Unavailable` on transport
    /// failure, or a context error.
    async fn alter(&self, ctx: &CallContext, schema: &str) -> Result<(), StoreError>;

    /// Run a read-only query, returning the JSON object of query blocks
    ///
    /// # Errors
    ///
    /// `Rejected` for an invalid query, `Decode` for an unreadable response,
    /// `Unavailable` on transport failure, or a context error.
    async fn query(
        &self,
        ctx: &CallContext,
        query: &str,
        variables: &QueryVariables,
    ) -> Result<Vec<u8>, StoreError>;

    /// Apply a JSON set mutation
    ///
    /// Only immediately committed mutations are supported; `commit_now ==
    /// false` is rejected.
    ///
    /// # Errors
    ///
    /// `Rejected` for an invalid mutation, `Decode` for an unreadable
    /// response, `Unavailable` on transport failure, or a context error.
    async fn mutate(
        &self,
        ctx: &CallContext,
        set_json: &[u8],
        commit_now: bool,
    ) -> Result<MutationResponse, StoreError>;
}
