// ABOUTME: Loads full recipe graphs by exact name or by full-text search over recipe names
// ABOUTME: Loaded recipes carry foods, measurements, and nutrients ready for aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::{AppError, AppResult, Recipe};
use tracing::{debug, instrument};

use super::require_name;
use crate::graph::queries::{decode_block, name_variables, recipe_by_name, recipe_search};
use crate::graph::{CallContext, GraphStore};

const RECIPE_BLOCK: &str = "recipe";

async fn load(
    store: &dyn GraphStore,
    ctx: &CallContext,
    query: &str,
    term: &str,
) -> AppResult<Vec<Recipe>> {
    let bytes = store.query(ctx, query, &name_variables(term)).await?;
    let mut recipes: Vec<Recipe> = decode_block(&bytes, RECIPE_BLOCK)?;
    for recipe in &mut recipes {
        recipe.sort_instructions();
    }
    Ok(recipes)
}

/// Recipes whose name shares at least one term with `query`
///
/// # Errors
///
/// `InvalidInput` for a blank query, otherwise store errors with context
#[instrument(skip(store, ctx))]
pub async fn search_recipes(
    store: &dyn GraphStore,
    ctx: &CallContext,
    query: &str,
) -> AppResult<Vec<Recipe>> {
    require_name("search", query)?;
    let recipes = load(store, ctx, &recipe_search(), query)
        .await
        .map_err(|e| e.context(format_args!("search recipes for '{query}'")))?;
    debug!(found = recipes.len(), "recipe search finished");
    Ok(recipes)
}

/// The recipe stored under exactly `name`, if any
///
/// When several recipes share the name the first stored one is returned.
///
/// # Errors
///
/// `InvalidInput` for a blank name, otherwise store errors with context
#[instrument(skip(store, ctx))]
pub async fn get_recipe(
    store: &dyn GraphStore,
    ctx: &CallContext,
    name: &str,
) -> AppResult<Option<Recipe>> {
    require_name("recipe", name)?;
    let recipes = load(store, ctx, &recipe_by_name(), name)
        .await
        .map_err(|e: AppError| e.context(format_args!("load recipe '{name}'")))?;
    Ok(recipes.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpsertConfig;
    use crate::graph::MemoryGraphStore;
    use crate::recipes::{RecipePersister, UpsertCoordinator};
    use foodlab_core::{ErrorCode, Food, FoodMeasurement, Ingredient, Instruction};
    use std::sync::Arc;

    async fn seeded() -> Arc<MemoryGraphStore> {
        let store = Arc::new(MemoryGraphStore::new());
        let persister = RecipePersister::new(store.clone());
        let ctx = CallContext::background();
        let leek = UpsertCoordinator::new(store.clone(), UpsertConfig::default())
            .get_or_create_food(
                &ctx,
                &Food::new("Leek").with_measurement(FoodMeasurement::new("stalk", 1.0)),
            )
            .await
            .unwrap();
        let soup = Recipe {
            instructions: vec![Instruction::new(2, "Simmer"), Instruction::new(1, "Chop")],
            ..Recipe::new("Leek Soup").with_ingredient(Ingredient::new(leek, "stalk", 2.0))
        };
        persister.add_recipe(&ctx, &soup).await.unwrap();
        persister
            .add_recipe(&ctx, &Recipe::new("Onion Soup").with_instruction("Caramelize"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_get_recipe_loads_full_graph() {
        let store = seeded().await;
        let recipe = get_recipe(store.as_ref(), &CallContext::background(), "Leek Soup")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(recipe.instructions[0].text, "Chop");
        assert_eq!(recipe.instructions[1].text, "Simmer");
        let food = recipe.ingredients[0].food.as_ref().unwrap();
        assert_eq!(food.name, "Leek");
        assert_eq!(food.measurements[0].unit, "stalk");
    }

    #[tokio::test]
    async fn test_get_missing_recipe_is_none() {
        let store = seeded().await;
        let recipe = get_recipe(store.as_ref(), &CallContext::background(), "Leek")
            .await
            .unwrap();
        assert!(recipe.is_none());
    }

    #[tokio::test]
    async fn test_search_matches_terms() {
        let store = seeded().await;
        let ctx = CallContext::background();
        let soups = search_recipes(store.as_ref(), &ctx, "soup").await.unwrap();
        assert_eq!(soups.len(), 2);
        let onion = search_recipes(store.as_ref(), &ctx, "onion").await.unwrap();
        assert_eq!(onion.len(), 1);
        assert_eq!(onion[0].name, "Onion Soup");
    }

    #[tokio::test]
    async fn test_blank_search_rejected() {
        let store = MemoryGraphStore::new();
        let err = search_recipes(&store, &CallContext::background(), " ")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
