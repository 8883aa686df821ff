// ABOUTME: Recipe, Ingredient, and Instruction graph nodes
// ABOUTME: A recipe owns its ingredients and instructions; foods are shared references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use serde::{Deserialize, Serialize};

use super::food::Food;
use super::reference::one_or_many;
use super::uid::Uid;

/// Quantity of a food used in one recipe
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ingredient {
    /// Store-assigned id
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uid>,
    /// Referenced food, shared across recipes
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub food: Option<Food>,
    /// Unit of the quantity used in this recipe
    #[serde(default)]
    pub unit: String,
    /// Quantity used in this recipe
    #[serde(default)]
    pub value: f64,
}

impl Ingredient {
    /// Create an uncommitted ingredient
    #[must_use]
    pub fn new(food: Food, unit: impl Into<String>, value: f64) -> Self {
        Self {
            id: None,
            food: Some(food),
            unit: unit.into(),
            value,
        }
    }
}

/// Preparation step; `order` is 1-based and unique within a recipe
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Instruction {
    /// Store-assigned id
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uid>,
    /// Position of the step
    #[serde(default)]
    pub order: u32,
    /// Step text
    #[serde(default)]
    pub text: String,
}

impl Instruction {
    /// Create an uncommitted instruction
    #[must_use]
    pub fn new(order: u32, text: impl Into<String>) -> Self {
        Self {
            id: None,
            order,
            text: text.into(),
        }
    }
}

/// Recipe with its ingredients and ordered instructions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recipe {
    /// Store-assigned id
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uid>,
    /// Recipe name
    #[serde(default)]
    pub name: String,
    /// Ingredients
    #[serde(rename = "ingredient", default)]
    pub ingredients: Vec<Ingredient>,
    /// Instructions
    #[serde(rename = "instruction", default)]
    pub instructions: Vec<Instruction>,
}

impl Recipe {
    /// Create an empty uncommitted recipe
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an ingredient
    #[must_use]
    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    /// Append an instruction numbered after the existing ones
    #[must_use]
    pub fn with_instruction(mut self, text: impl Into<String>) -> Self {
        self.push_instruction(text);
        self
    }

    /// Append an instruction numbered after the existing ones
    pub fn push_instruction(&mut self, text: impl Into<String>) {
        let order = u32::try_from(self.instructions.len()).map_or(u32::MAX, |n| n + 1);
        self.instructions.push(Instruction::new(order, text));
    }

    /// Sort instructions by their order
    pub fn sort_instructions(&mut self) {
        self.instructions.sort_by_key(|i| i.order);
    }
}
