// ABOUTME: Flattened per-recipe nutrient totals produced by the aggregator
// ABOUTME: Serialized as `{name, nutrition: [{name, unit, value}]}`
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use serde::{Deserialize, Serialize};

/// Total amount of one nutrient across a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotal {
    /// Nutrient name
    #[serde(rename = "name")]
    pub nutrient_name: String,
    /// Unit of the first contribution
    pub unit: String,
    /// Scaled sum of all contributions
    pub value: f64,
}

/// Nutrition report for a recipe, entries sorted by nutrient name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeNutrition {
    /// Recipe name
    pub name: String,
    /// Nutrient totals
    #[serde(rename = "nutrition")]
    pub entries: Vec<NutrientTotal>,
}

impl RecipeNutrition {
    /// Look up the total for a nutrient
    #[must_use]
    pub fn entry(&self, nutrient_name: &str) -> Option<&NutrientTotal> {
        self.entries
            .iter()
            .find(|e| e.nutrient_name == nutrient_name)
    }
}
