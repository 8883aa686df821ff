// ABOUTME: End-to-end tests that store recipes, load them back, and aggregate their nutrition
// ABOUTME: Foods come from mock NDB reports so the graph matches what the composer writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use foodlab::config::UpsertConfig;
use foodlab::graph::{CallContext, MemoryGraphStore};
use foodlab::nutrition::{aggregate_nutrition, UnitPolicy};
use foodlab::recipes::{get_recipe, search_recipes, RecipePersister, UpsertCoordinator};
use foodlab::ErrorCode;
use foodlab_core::constants::graph_types;
use foodlab_core::{
    Food, FoodMeasurement, Ingredient, Nutrient, NutritionError, Recipe, RecipeNutrition,
};
use foodlab_ndb::{food_from_report, FoodSource, MockNdbClient};
use std::sync::Arc;

struct Kitchen {
    store: Arc<MemoryGraphStore>,
    upserts: UpsertCoordinator,
    persister: RecipePersister,
    ctx: CallContext,
}

impl Kitchen {
    fn new() -> Self {
        let store = Arc::new(MemoryGraphStore::new());
        Self {
            upserts: UpsertCoordinator::new(store.clone(), UpsertConfig::default()),
            persister: RecipePersister::new(store.clone()),
            store,
            ctx: CallContext::background(),
        }
    }

    async fn ndb_food(&self, ndbno: &str) -> Food {
        let report = MockNdbClient::new().food_report(ndbno).await.unwrap();
        self.upserts
            .get_or_create_food(&self.ctx, &food_from_report(&report))
            .await
            .unwrap()
    }

    async fn save(&self, recipe: &Recipe) -> Recipe {
        self.persister.add_recipe(&self.ctx, recipe).await.unwrap()
    }

    async fn nutrition(&self, name: &str, policy: UnitPolicy) -> Result<RecipeNutrition, NutritionError> {
        let recipe = get_recipe(self.store.as_ref(), &self.ctx, name)
            .await
            .unwrap()
            .unwrap();
        aggregate_nutrition(&recipe, policy)
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_mashed_potatoes_nutrition() {
    let kitchen = Kitchen::new();
    let potato = kitchen.ndb_food("11352").await;
    kitchen
        .save(
            &Recipe::new("Mash")
                .with_ingredient(Ingredient::new(potato, "cup", 2.0))
                .with_instruction("Boil")
                .with_instruction("Mash"),
        )
        .await;

    let nutrition = kitchen.nutrition("Mash", UnitPolicy::Strict).await.unwrap();
    assert_eq!(nutrition.name, "Mash");
    let calories = nutrition.entry("Calories").unwrap();
    assert_eq!(calories.unit, "kcal");
    assert_close(calories.value, 220.0);
    let potassium = nutrition.entry("Potassium").unwrap();
    assert_eq!(potassium.unit, "mg");
    assert_close(potassium.value, 1240.0);

    let names: Vec<&str> = nutrition
        .entries
        .iter()
        .map(|e| e.nutrient_name.as_str())
        .collect();
    assert_eq!(names, ["Calories", "Potassium"]);
}

#[tokio::test]
async fn test_gram_reference_measurement_scales() {
    let kitchen = Kitchen::new();
    let potato = kitchen.ndb_food("11352").await;
    kitchen
        .save(&Recipe::new("Potato Bites").with_ingredient(Ingredient::new(potato, "g", 50.0)))
        .await;

    let nutrition = kitchen
        .nutrition("Potato Bites", UnitPolicy::Strict)
        .await
        .unwrap();
    assert_close(nutrition.entry("Calories").unwrap().value, 36.5);
    assert_close(nutrition.entry("Potassium").unwrap().value, 206.5);
}

#[tokio::test]
async fn test_ingredients_add_up() {
    let kitchen = Kitchen::new();
    let potato = kitchen.ndb_food("11352").await;
    let apple = kitchen.ndb_food("09003").await;
    kitchen
        .save(
            &Recipe::new("Potato Apple Hash")
                .with_ingredient(Ingredient::new(potato, "cup", 1.0))
                .with_ingredient(Ingredient::new(apple, "medium", 2.0)),
        )
        .await;

    let nutrition = kitchen
        .nutrition("Potato Apple Hash", UnitPolicy::Strict)
        .await
        .unwrap();
    assert_close(nutrition.entry("Calories").unwrap().value, 110.0 + 190.0);
    assert_close(nutrition.entry("Potassium").unwrap().value, 620.0 + 390.0);
    assert_eq!(kitchen.store.count_type(graph_types::NUTRIENT).await, 2);
}

#[tokio::test]
async fn test_unknown_unit_fails_aggregation() {
    let kitchen = Kitchen::new();
    let potato = kitchen.ndb_food("11352").await;
    kitchen
        .save(&Recipe::new("Spoonful").with_ingredient(Ingredient::new(potato, "tbsp", 1.0)))
        .await;

    let error = kitchen
        .nutrition("Spoonful", UnitPolicy::Permissive)
        .await
        .unwrap_err();
    assert!(matches!(error, NutritionError::UnitNotFound { ref unit, .. } if unit == "tbsp"));
}

#[tokio::test]
async fn test_unit_mismatch_depends_on_policy() {
    let kitchen = Kitchen::new();
    let salt = Food::new("Salt").with_measurement(
        FoodMeasurement::new("tsp", 1.0).with_nutrient(Nutrient::new("Sodium"), "mg", 2300.0),
    );
    let broth = Food::new("Broth").with_measurement(
        FoodMeasurement::new("cup", 1.0).with_nutrient(Nutrient::new("Sodium"), "g", 0.8),
    );
    let salt = kitchen.upserts.get_or_create_food(&kitchen.ctx, &salt).await.unwrap();
    let broth = kitchen.upserts.get_or_create_food(&kitchen.ctx, &broth).await.unwrap();
    kitchen
        .save(
            &Recipe::new("Salty Broth")
                .with_ingredient(Ingredient::new(salt, "tsp", 1.0))
                .with_ingredient(Ingredient::new(broth, "cup", 1.0)),
        )
        .await;

    let error = kitchen
        .nutrition("Salty Broth", UnitPolicy::Strict)
        .await
        .unwrap_err();
    assert!(matches!(error, NutritionError::UnitMismatch { .. }));

    let permissive = kitchen
        .nutrition("Salty Broth", UnitPolicy::Permissive)
        .await
        .unwrap();
    let sodium = permissive.entry("Sodium").unwrap();
    assert_eq!(sodium.unit, "mg");
    assert_close(sodium.value, 2300.8);
}

#[tokio::test]
async fn test_unstored_foods_are_rejected() {
    let kitchen = Kitchen::new();
    let potato = kitchen.ndb_food("11352").await;
    let carrot = Food::new("Carrot").with_measurement(
        FoodMeasurement::new("cup", 1.0).with_nutrient(Nutrient::new("Potassium"), "mg", 410.0),
    );

    let error = kitchen
        .persister
        .add_recipe(
            &kitchen.ctx,
            &Recipe::new("Roast Roots")
                .with_ingredient(Ingredient::new(potato, "cup", 1.0))
                .with_ingredient(Ingredient::new(carrot, "cup", 1.0)),
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(error.message.contains("Carrot"));
    assert_eq!(kitchen.store.count_type(graph_types::FOOD).await, 1);
    assert_eq!(kitchen.store.count_type(graph_types::NUTRIENT).await, 2);
    assert_eq!(kitchen.store.count_type(graph_types::RECIPE).await, 0);
}

#[tokio::test]
async fn test_repeated_ingredient_counts_twice() {
    let kitchen = Kitchen::new();
    let potato = kitchen.ndb_food("11352").await;
    let saved = kitchen
        .save(
            &Recipe::new("Double")
                .with_ingredient(Ingredient::new(potato.clone(), "cup", 1.0))
                .with_ingredient(Ingredient::new(potato, "cup", 1.0)),
        )
        .await;
    assert_ne!(saved.ingredients[0].id, saved.ingredients[1].id);

    let recipe = get_recipe(kitchen.store.as_ref(), &kitchen.ctx, "Double")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recipe.ingredients.len(), 2);

    let nutrition = aggregate_nutrition(&recipe, UnitPolicy::Strict).unwrap();
    assert_close(nutrition.entry("Calories").unwrap().value, 220.0);
    assert_eq!(kitchen.store.count_type(graph_types::INGREDIENT).await, 2);
}

#[tokio::test]
async fn test_search_finds_recipes_by_term() {
    let kitchen = Kitchen::new();
    let potato = kitchen.ndb_food("11352").await;
    for name in ["Potato Soup", "Baked Potato", "Apple Pie"] {
        kitchen
            .save(&Recipe::new(name).with_ingredient(Ingredient::new(potato.clone(), "cup", 1.0)))
            .await;
    }

    let found = search_recipes(kitchen.store.as_ref(), &kitchen.ctx, "potato")
        .await
        .unwrap();
    let mut names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["Baked Potato", "Potato Soup"]);
    assert!(found.iter().all(|r| r.ingredients.len() == 1));

    assert_eq!(kitchen.store.count_type(graph_types::FOOD).await, 1);
}

#[tokio::test]
async fn test_loaded_instructions_are_ordered() {
    let kitchen = Kitchen::new();
    kitchen
        .save(
            &Recipe::new("Tea")
                .with_instruction("Boil water")
                .with_instruction("Steep")
                .with_instruction("Pour"),
        )
        .await;

    let recipe = get_recipe(kitchen.store.as_ref(), &kitchen.ctx, "Tea")
        .await
        .unwrap()
        .unwrap();
    let steps: Vec<(u32, &str)> = recipe
        .instructions
        .iter()
        .map(|i| (i.order, i.text.as_str()))
        .collect();
    assert_eq!(steps, [(1, "Boil water"), (2, "Steep"), (3, "Pour")]);
}

#[tokio::test]
async fn test_missing_recipe_is_none() {
    let kitchen = Kitchen::new();
    let recipe = get_recipe(kitchen.store.as_ref(), &kitchen.ctx, "Nothing")
        .await
        .unwrap();
    assert!(recipe.is_none());
}

#[tokio::test]
async fn test_unavailable_store_surfaces_context() {
    let kitchen = Kitchen::new();
    kitchen.store.set_available(false);

    let error = kitchen
        .persister
        .add_recipe(&kitchen.ctx, &Recipe::new("Toast"))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StoreUnavailable);
    assert!(error.message.contains("add recipe 'Toast'"));
}
