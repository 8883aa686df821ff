// ABOUTME: Data-quality errors raised while aggregating recipe nutrition
// ABOUTME: Recipe-specific and reported to the caller, never a panic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

/// Errors produced by nutrition aggregation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NutritionError {
    /// No food measurement uses the ingredient's unit
    #[error("food '{food}' has no measurement in unit '{unit}'")]
    UnitNotFound {
        /// Food name
        food: String,
        /// Requested ingredient unit
        unit: String,
    },

    /// The matching food measurement has a zero or non-finite reference quantity
    #[error("food '{food}' has an invalid reference quantity for unit '{unit}'")]
    InvalidMeasurement {
        /// Food name
        food: String,
        /// Measurement unit
        unit: String,
    },

    /// Two contributions to the same nutrient use different units
    #[error("nutrient '{nutrient}' is measured in '{expected}' and '{found}'")]
    UnitMismatch {
        /// Nutrient name
        nutrient: String,
        /// Unit of the first contribution
        expected: String,
        /// Conflicting unit
        found: String,
    },

    /// Ingredient has no food reference
    #[error("ingredient #{ingredient} has no food")]
    MissingFood {
        /// Zero-based ingredient position in the recipe
        ingredient: usize,
    },

    /// Nutrient measurement has no nutrient reference
    #[error("food '{food}' has a '{unit}' nutrient measurement without a nutrient")]
    MissingNutrient {
        /// Food name
        food: String,
        /// Food measurement unit
        unit: String,
    },
}
