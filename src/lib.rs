// ABOUTME: Main library entry point for foodlab recipe graph persistence and nutrition
// ABOUTME: Graph store access, upserts, recipe commits, aggregation, and the composer wizard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

#![deny(unsafe_code)]

//! # Foodlab
//!
//! Stores recipes, foods, and nutrients as a graph in Dgraph and computes
//! per-recipe nutrition totals.
//!
//! ## Architecture
//!
//! - **Graph**: the `alter`/`query`/`mutate` store surface, a Dgraph HTTP
//!   implementation, an in-memory implementation, and call deadlines
//! - **Recipes**: natural-key upserts for foods and nutrients, single-commit
//!   recipe persistence, and recipe loading
//! - **Nutrition**: pure aggregation of nutrient totals over a loaded recipe
//! - **Composer**: interactive recipe building backed by NDB food search
//! - **Config**: environment-driven settings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use foodlab::graph::{CallContext, MemoryGraphStore};
//! use foodlab::nutrition::{aggregate_nutrition, UnitPolicy};
//! use foodlab::recipes::{RecipePersister, UpsertCoordinator};
//! use foodlab::config::UpsertConfig;
//! use foodlab_core::{AppResult, Food, FoodMeasurement, Ingredient, Nutrient, Recipe};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = Arc::new(MemoryGraphStore::new());
//!     let upserts = UpsertCoordinator::new(store.clone(), UpsertConfig::default());
//!     let persister = RecipePersister::new(store);
//!     let ctx = CallContext::background();
//!
//!     let potato = upserts
//!         .get_or_create_food(
//!             &ctx,
//!             &Food::new("Potato").with_measurement(
//!                 FoodMeasurement::new("cup", 1.0)
//!                     .with_nutrient(Nutrient::new("Potassium"), "mg", 620.0),
//!             ),
//!         )
//!         .await?;
//!     let recipe = Recipe::new("Mash").with_ingredient(Ingredient::new(potato, "cup", 2.0));
//!     let saved = persister.add_recipe(&ctx, &recipe).await?;
//!
//!     let nutrition = aggregate_nutrition(&saved, UnitPolicy::Permissive)?;
//!     println!("{nutrition:?}");
//!     Ok(())
//! }
//! ```

/// Interactive recipe composer
pub mod composer;
/// Environment-driven configuration
pub mod config;
/// Graph store surface and implementations
pub mod graph;
/// Structured logging setup
pub mod logging;
/// Nutrition aggregation
pub mod nutrition;
/// Recipe persistence and loading
pub mod recipes;

pub use foodlab_core::{AppError, AppResult, ErrorCode};
