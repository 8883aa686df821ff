// ABOUTME: Scales each ingredient's nutrient values by its quantity and sums them per nutrient
// ABOUTME: Output is sorted by nutrient name; unit conflicts warn or fail depending on policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! # Nutrition Aggregator
//!
//! For every ingredient, the food measurement whose unit equals the
//! ingredient unit supplies the reference quantity. The ingredient value
//! divided by that quantity is the multiplier applied to each of the
//! measurement's nutrient values. Totals are keyed by nutrient name and keep
//! the unit of their first contribution.
//!
//! No unit conversion happens. When two contributions to one nutrient use
//! different units, [`UnitPolicy::Permissive`] logs a warning and adds the
//! values anyway, while [`UnitPolicy::Strict`] fails with `UnitMismatch`.

use foodlab_core::{NutrientTotal, NutritionError, Recipe, RecipeNutrition};
use std::collections::BTreeMap;
use tracing::warn;

/// How to treat differing units for one nutrient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitPolicy {
    /// Sum regardless of unit and log a warning
    #[default]
    Permissive,
    /// Fail with `UnitMismatch`
    Strict,
}

struct Total {
    unit: String,
    value: f64,
}

/// Flattened nutrient totals for `recipe`
///
/// # Errors
///
/// - `MissingFood` when an ingredient has no food
/// - `UnitNotFound` when the food has no measurement in the ingredient unit
/// - `InvalidMeasurement` when that measurement's quantity is zero or not finite
/// - `MissingNutrient` when a nutrient measurement has no nutrient
/// - `UnitMismatch` under [`UnitPolicy::Strict`]
pub fn aggregate_nutrition(
    recipe: &Recipe,
    policy: UnitPolicy,
) -> Result<RecipeNutrition, NutritionError> {
    let mut totals: BTreeMap<String, Total> = BTreeMap::new();

    for (position, ingredient) in recipe.ingredients.iter().enumerate() {
        let food = ingredient
            .food
            .as_ref()
            .ok_or(NutritionError::MissingFood {
                ingredient: position,
            })?;
        let measurement =
            food.measurement_for_unit(&ingredient.unit)
                .ok_or_else(|| NutritionError::UnitNotFound {
                    food: food.name.clone(),
                    unit: ingredient.unit.clone(),
                })?;
        if !measurement.value.is_normal() {
            return Err(NutritionError::InvalidMeasurement {
                food: food.name.clone(),
                unit: measurement.unit.clone(),
            });
        }
        let multiplier = ingredient.value / measurement.value;

        for nutrient_measurement in &measurement.nutrient_measurements {
            let nutrient = nutrient_measurement.nutrient.as_ref().ok_or_else(|| {
                NutritionError::MissingNutrient {
                    food: food.name.clone(),
                    unit: measurement.unit.clone(),
                }
            })?;
            let contribution = nutrient_measurement.value * multiplier;

            match totals.get_mut(&nutrient.name) {
                None => {
                    totals.insert(
                        nutrient.name.clone(),
                        Total {
                            unit: nutrient_measurement.unit.clone(),
                            value: contribution,
                        },
                    );
                }
                Some(total) => {
                    if total.unit != nutrient_measurement.unit {
                        if policy == UnitPolicy::Strict {
                            return Err(NutritionError::UnitMismatch {
                                nutrient: nutrient.name.clone(),
                                expected: total.unit.clone(),
                                found: nutrient_measurement.unit.clone(),
                            });
                        }
                        warn!(
                            recipe = %recipe.name,
                            nutrient = %nutrient.name,
                            expected = %total.unit,
                            found = %nutrient_measurement.unit,
                            "summing nutrient contributions with different units"
                        );
                    }
                    total.value += contribution;
                }
            }
        }
    }

    Ok(RecipeNutrition {
        name: recipe.name.clone(),
        entries: totals
            .into_iter()
            .map(|(nutrient_name, total)| NutrientTotal {
                nutrient_name,
                unit: total.unit,
                value: total.value,
            })
            .collect(),
    })
}
