// ABOUTME: Recipe graph persistence: natural-key upserts, recipe commits, and recipe loading
// ABOUTME: Every operation talks to a GraphStore under a caller-supplied CallContext
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! # Recipes
//!
//! - [`UpsertCoordinator`] finds foods and nutrients by name or creates them
//! - [`RecipePersister`] commits a whole recipe in one mutation
//! - [`search`] loads stored recipes for display and aggregation

/// Recipe commits
pub mod persister;
/// Recipe lookup by name and full-text search
pub mod search;
/// Get-or-create for foods and nutrients
pub mod upsert;

pub use persister::RecipePersister;
pub use search::{get_recipe, search_recipes};
pub use upsert::UpsertCoordinator;

use foodlab_core::{AppError, AppResult};

/// Reject blank names before they reach the store
pub(crate) fn require_name(kind: &str, name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_input(format!("{kind} name must not be empty")));
    }
    Ok(())
}

/// Reject NaN and infinite quantities
pub(crate) fn require_finite(what: &str, value: f64) -> AppResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "{what} must be a finite number, got {value}"
        )))
    }
}
