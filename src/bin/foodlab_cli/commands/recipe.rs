// ABOUTME: `foodlab recipe` subcommands: recipe search and nutrition aggregation
// ABOUTME: Loads full recipe graphs from the store and prints JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab::graph::{CallContext, GraphStore};
use foodlab::nutrition::{aggregate_nutrition, UnitPolicy};
use foodlab::recipes::{get_recipe, search_recipes};
use foodlab::{AppError, AppResult};

use crate::helpers::display::print_json;

/// Print recipes whose names match `query`
pub async fn search(store: &dyn GraphStore, ctx: &CallContext, query: &str) -> AppResult<()> {
    let recipes = search_recipes(store, ctx, query).await?;
    print_json(&recipes)
}

/// Print the nutrition totals of the recipe named `name`
pub async fn nutrition(
    store: &dyn GraphStore,
    ctx: &CallContext,
    name: &str,
    strict: bool,
) -> AppResult<()> {
    let recipe = get_recipe(store, ctx, name)
        .await?
        .ok_or_else(|| AppError::not_found(format!("recipe '{name}'")))?;
    let policy = if strict {
        UnitPolicy::Strict
    } else {
        UnitPolicy::Permissive
    };
    let nutrition = aggregate_nutrition(&recipe, policy)
        .map_err(|e| AppError::from(e).context(format_args!("nutrition of '{name}'")))?;
    print_json(&nutrition)
}
