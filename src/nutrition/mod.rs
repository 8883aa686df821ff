// ABOUTME: Nutrition aggregation over loaded recipe graphs
// ABOUTME: Pure computation with no store access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

/// Per-recipe nutrient totals
pub mod aggregator;

pub use aggregator::{aggregate_nutrition, UnitPolicy};
