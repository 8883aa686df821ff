// ABOUTME: Opens the graph store a CLI command runs against
// ABOUTME: Dgraph over HTTP by default, or an empty in-memory store on request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab::config::FoodlabConfig;
use foodlab::graph::{DgraphHttpStore, GraphStore, MemoryGraphStore};
use foodlab::AppResult;
use std::sync::Arc;
use tracing::info;

/// Graph store for this invocation
pub fn open(config: &FoodlabConfig, in_memory: bool) -> AppResult<Arc<dyn GraphStore>> {
    if in_memory {
        info!("using an in-memory graph store; nothing will persist");
        return Ok(Arc::new(MemoryGraphStore::new()));
    }
    Ok(Arc::new(DgraphHttpStore::new(config.store.clone())))
}
