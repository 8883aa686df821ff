// ABOUTME: Commits a complete recipe subgraph (ingredients, instructions, food references) in one mutation
// ABOUTME: Validates the recipe first so a rejected recipe never reaches the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::{AppError, AppResult, Recipe};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{require_finite, require_name};
use crate::graph::mutation::{recipe_node, to_bytes, PendingIds};
use crate::graph::{CallContext, GraphStore};

/// Writes recipes to the graph store
pub struct RecipePersister {
    store: Arc<dyn GraphStore>,
}

fn validate(recipe: &Recipe) -> AppResult<()> {
    require_name("recipe", &recipe.name)?;

    let mut orders = HashSet::new();
    for instruction in &recipe.instructions {
        if instruction.order == 0 {
            return Err(AppError::invalid_input(
                "instruction order is 1-based; found order 0",
            ));
        }
        if !orders.insert(instruction.order) {
            return Err(AppError::invalid_input(format!(
                "instruction order {} appears more than once",
                instruction.order
            )));
        }
    }

    for ingredient in &recipe.ingredients {
        require_finite("ingredient value", ingredient.value)?;
        if let Some(food) = &ingredient.food {
            require_name("food", &food.name)?;
            if !food.is_resolved() {
                return Err(AppError::invalid_input(format!(
                    "food '{}' has no stored id; store it with get_or_create_food first",
                    food.name
                )));
            }
        }
    }
    Ok(())
}

impl RecipePersister {
    /// Persister writing to `store`
    #[must_use]
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Commit `recipe` in one mutation and return it with assigned ids
    ///
    /// Ingredient foods are linked by reference and must already be stored,
    /// normally through [`UpsertCoordinator::get_or_create_food`].
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank name, a bad instruction order, a
    /// non-finite ingredient value, or a food without a stored id; store
    /// errors with operation context otherwise. Nothing is written on error.
    ///
    /// [`UpsertCoordinator::get_or_create_food`]: super::UpsertCoordinator::get_or_create_food
    #[instrument(skip_all, fields(recipe = %recipe.name, ingredients = recipe.ingredients.len()))]
    pub async fn add_recipe(&self, ctx: &CallContext, recipe: &Recipe) -> AppResult<Recipe> {
        validate(recipe)?;
        let context = || format!("add recipe '{}'", recipe.name);

        let mut pending = recipe.clone();
        pending.sort_instructions();
        pending.assign_placeholders();

        let body = to_bytes(&recipe_node(&pending)).map_err(|e| AppError::from(e).context(context()))?;
        let response = self
            .store
            .mutate(ctx, &body, true)
            .await
            .map_err(|e| AppError::from(e).context(context()))?;
        pending
            .apply_uids(&response.uids)
            .map_err(|e| AppError::from(e).context(context()))?;

        info!(id = ?pending.id, assigned = response.uids.len(), "recipe committed");
        Ok(pending)
    }
}
