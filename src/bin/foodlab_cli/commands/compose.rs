// ABOUTME: `foodlab compose` runs the interactive recipe composer on the terminal
// ABOUTME: Prompts go to stderr; the saved recipe prints to stdout as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab::composer::session::DEFAULT_SEARCH_RESULTS;
use foodlab::composer::{ComposeOutcome, ComposerConfig, ComposerSession};
use foodlab::config::FoodlabConfig;
use foodlab::graph::{CallContext, GraphStore};
use foodlab::recipes::{RecipePersister, UpsertCoordinator};
use foodlab::AppResult;
use foodlab_ndb::{NdbClient, SearchConfig};
use serde_json::Value;
use std::io;
use std::sync::Arc;

use crate::helpers::display::print_json;

/// Compose one recipe
pub async fn run(
    config: &FoodlabConfig,
    store: Arc<dyn GraphStore>,
    ctx: &CallContext,
    max_attempts: u32,
) -> AppResult<()> {
    let source = NdbClient::new(config.ndb.client_config()?);
    let upserts = UpsertCoordinator::new(store.clone(), config.upsert);
    let persister = RecipePersister::new(store);
    let composer_config = ComposerConfig {
        max_attempts,
        search: SearchConfig::with_page_size(config.ndb.page_size)
            .with_max_results(DEFAULT_SEARCH_RESULTS),
    };

    let session = ComposerSession::new(&source, &upserts, &persister, composer_config);
    match session
        .run(ctx, io::stdin().lock(), io::stderr())
        .await?
    {
        ComposeOutcome::Saved(recipe) => print_json(&recipe),
        ComposeOutcome::Aborted => print_json(&Value::Null),
    }
}
