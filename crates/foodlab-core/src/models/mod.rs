// ABOUTME: Recipe graph data model shared by the store layer, aggregator, and NDB conversion
// ABOUTME: Serde field names match the on-wire predicates of existing stored data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! Graph data model.
//!
//! `Nutrient` and `Food` are shared nodes deduplicated by name. Everything
//! else is owned by exactly one parent and is written in the parent's commit.
//! The `id` of every node is `None` until the store assigns one.

mod food;
mod nutrition;
mod recipe;
pub mod reference;
mod uid;

pub use food::{Food, FoodMeasurement, Nutrient, NutrientMeasurement};
pub use nutrition::{NutrientTotal, RecipeNutrition};
pub use recipe::{Ingredient, Instruction, Recipe};
pub use uid::Uid;
