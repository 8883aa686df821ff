// ABOUTME: `foodlab ndb` subcommands: paged food search and food reports
// ABOUTME: Requires NDB_API_KEY; results print as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab::config::FoodlabConfig;
use foodlab::AppResult;
use foodlab_ndb::{food_from_report, search_stream, FoodSource, NdbClient, SearchConfig};
use futures_util::StreamExt;
use tracing::info;

use crate::helpers::display::print_json;

fn client(config: &FoodlabConfig) -> AppResult<NdbClient> {
    Ok(NdbClient::new(config.ndb.client_config()?))
}

/// Stream search hits and print them as one JSON array
pub async fn search(
    config: &FoodlabConfig,
    query: &str,
    page_size: Option<usize>,
    limit: Option<usize>,
) -> AppResult<()> {
    let client = client(config)?;
    let mut search = SearchConfig::with_page_size(page_size.unwrap_or(config.ndb.page_size));
    if let Some(limit) = limit {
        search = search.with_max_results(limit);
    }

    let mut stream = search_stream(&client, query, search);
    let mut hits = Vec::new();
    while let Some(hit) = stream.next().await {
        hits.push(hit?);
    }
    info!(query, hits = hits.len(), "ndb search finished");
    print_json(&hits)
}

/// Fetch a report and print the food graph built from it
pub async fn report(config: &FoodlabConfig, ndbno: &str) -> AppResult<()> {
    let client = client(config)?;
    let report = client.food_report(ndbno).await?;
    print_json(&food_from_report(&report))
}
