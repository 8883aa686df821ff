// ABOUTME: Core types for the foodlab recipe graph: model, content keys, and errors
// ABOUTME: Foundation crate with no I/O, shared by the store layer and the NDB client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! Core types for foodlab.
//!
//! This crate holds everything that does not touch the network:
//! the recipe/food/nutrient data model, the content addresser that derives
//! placeholder keys for uncommitted nodes, and the error taxonomy.

/// Environment variable names and defaults
pub mod constants;
/// Error types and the unified `AppError`
pub mod errors;
/// Deterministic content keys for uncommitted graph nodes
pub mod hashing;
/// Recipe, food, and nutrient graph model
pub mod models;

pub use errors::{AppError, AppResult, ErrorCode, NutritionError, StoreError};
pub use hashing::ContentAddress;
pub use models::{
    Food, FoodMeasurement, Ingredient, Instruction, Nutrient, NutrientMeasurement, NutrientTotal,
    Recipe, RecipeNutrition, Uid,
};
