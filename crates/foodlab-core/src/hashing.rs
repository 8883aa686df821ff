// ABOUTME: Content addresser deriving deterministic placeholder keys from entity fields
// ABOUTME: Keys correlate uncommitted nodes with the ids assigned by one mutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! # Content Addressing
//!
//! Every uncommitted node gets a placeholder key of the form
//! `<kind>_<sha256 hex>`, computed from the node's semantic fields only.
//! Ids, child lists, and lookup metadata never participate, so re-hashing the
//! same logical content always yields the same key.
//!
//! | Entity                | Hashed fields                         |
//! |-----------------------|---------------------------------------|
//! | `Recipe`              | name                                  |
//! | `Food`                | name                                  |
//! | `Nutrient`            | name                                  |
//! | `FoodMeasurement`     | unit, value                           |
//! | `NutrientMeasurement` | unit, value, nutrient name            |
//! | `Ingredient`          | unit, value, food name                |
//! | `Instruction`         | order, text                           |
//!
//! Floats hash through their shortest round-trip rendering, so any two
//! distinct values get distinct keys. A missing reference hashes as
//! [`ABSENT_REFERENCE_SENTINEL`].

use sha2::{Digest, Sha256};

use crate::constants::ABSENT_REFERENCE_SENTINEL;
use crate::models::{
    Food, FoodMeasurement, Ingredient, Instruction, Nutrient, NutrientMeasurement, Recipe, Uid,
};

/// Separator between hashed fields; cannot appear in typed input
const FIELD_SEPARATOR: &str = "\u{1f}";

/// Deterministic identity of an entity's semantic content
pub trait ContentAddress {
    /// Short entity kind used as the key prefix
    const KIND: &'static str;

    /// Semantic fields in hashing order
    fn content_fields(&self) -> Vec<String>;

    /// Placeholder key for this entity
    fn content_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(Self::KIND.as_bytes());
        for field in self.content_fields() {
            hasher.update(FIELD_SEPARATOR.as_bytes());
            hasher.update(field.as_bytes());
        }
        format!("{}_{:x}", Self::KIND, hasher.finalize())
    }

    /// Placeholder id (`_:<key>`) for this entity
    fn placeholder(&self) -> Uid {
        Uid::placeholder(&self.content_key())
    }
}

fn number(value: f64) -> String {
    format!("{value:?}")
}

impl ContentAddress for Recipe {
    const KIND: &'static str = "recipe";

    fn content_fields(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

impl ContentAddress for Food {
    const KIND: &'static str = "food";

    fn content_fields(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

impl ContentAddress for Nutrient {
    const KIND: &'static str = "nutrient";

    fn content_fields(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

impl ContentAddress for FoodMeasurement {
    const KIND: &'static str = "foodmeasure";

    fn content_fields(&self) -> Vec<String> {
        vec![self.unit.clone(), number(self.value)]
    }
}

impl ContentAddress for NutrientMeasurement {
    const KIND: &'static str = "nutrientmeasure";

    fn content_fields(&self) -> Vec<String> {
        let nutrient = self
            .nutrient
            .as_ref()
            .map_or(ABSENT_REFERENCE_SENTINEL, |n| n.name.as_str());
        vec![self.unit.clone(), number(self.value), nutrient.to_owned()]
    }
}

impl ContentAddress for Ingredient {
    const KIND: &'static str = "ingredient";

    fn content_fields(&self) -> Vec<String> {
        let food = self
            .food
            .as_ref()
            .map_or(ABSENT_REFERENCE_SENTINEL, |f| f.name.as_str());
        vec![self.unit.clone(), number(self.value), food.to_owned()]
    }
}

impl ContentAddress for Instruction {
    const KIND: &'static str = "instruction";

    fn content_fields(&self) -> Vec<String> {
        vec![self.order.to_string(), self.text.clone()]
    }
}
