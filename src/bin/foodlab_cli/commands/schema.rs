// ABOUTME: `foodlab schema` applies predicates, indexes, and node types to the graph store
// ABOUTME: Run once before composing recipes against a fresh Dgraph instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab::graph::schema::SCHEMA;
use foodlab::graph::{CallContext, GraphStore};
use foodlab::{AppError, AppResult};
use serde_json::json;
use tracing::info;

use crate::helpers::display::print_json;

/// Apply the schema
pub async fn apply(store: &dyn GraphStore, ctx: &CallContext) -> AppResult<()> {
    store
        .alter(ctx, SCHEMA)
        .await
        .map_err(|e| AppError::from(e).context("apply schema"))?;
    info!("schema applied");
    print_json(&json!({ "schema": "applied" }))
}
