// ABOUTME: Builds JSON set mutations from model graphs and maps assigned ids back onto them
// ABOUTME: Committed shared nodes are written as bare uid references, never re-created
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! Mutation building.
//!
//! Before a commit, every node without an id gets its content placeholder
//! (`_:<key>`). The mutation JSON mirrors the model with on-wire predicate
//! names plus `dgraph.type`. After the commit, each placeholder is replaced
//! with the id the store assigned to its key. Nodes with identical content
//! in one mutation share a placeholder and therefore one stored node, except
//! ingredients, whose key also carries their position in the recipe.

use foodlab_core::constants::graph_types;
use foodlab_core::{
    ContentAddress, Food, FoodMeasurement, Ingredient, Instruction, Nutrient,
    NutrientMeasurement, Recipe, StoreError, Uid,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

const TYPE_PREDICATE: &str = "dgraph.type";

fn is_committed(id: Option<&Uid>) -> bool {
    id.is_some_and(|id| !id.is_placeholder())
}

fn reference(id: &Uid) -> Value {
    json!({ "uid": id.as_str() })
}

fn node(id: Option<&Uid>, kind: &str) -> Map<String, Value> {
    let mut map = Map::new();
    if let Some(id) = id {
        map.insert("uid".to_owned(), Value::String(id.as_str().to_owned()));
    }
    map.insert(TYPE_PREDICATE.to_owned(), Value::String(kind.to_owned()));
    map
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<&String>) {
    if let Some(value) = value {
        map.insert(key.to_owned(), Value::String(value.clone()));
    }
}

/// Mutation JSON for a nutrient; a committed nutrient becomes a reference
#[must_use]
pub fn nutrient_node(nutrient: &Nutrient) -> Value {
    if let Some(id) = nutrient.id.as_ref().filter(|id| !id.is_placeholder()) {
        return reference(id);
    }
    let mut map = node(nutrient.id.as_ref(), graph_types::NUTRIENT);
    insert_opt(&mut map, "ndb_id", nutrient.external_ref_id.as_ref());
    insert_opt(&mut map, "ndb_group", nutrient.external_group.as_ref());
    map.insert("name".to_owned(), json!(nutrient.name));
    Value::Object(map)
}

fn nutrient_measurement_node(measurement: &NutrientMeasurement) -> Value {
    let mut map = node(measurement.id.as_ref(), graph_types::NUTRIENT_MEASUREMENT);
    if let Some(nutrient) = &measurement.nutrient {
        map.insert("nutrient".to_owned(), nutrient_node(nutrient));
    }
    map.insert("unit".to_owned(), json!(measurement.unit));
    map.insert("value".to_owned(), json!(measurement.value));
    Value::Object(map)
}

fn food_measurement_node(measurement: &FoodMeasurement) -> Value {
    let mut map = node(measurement.id.as_ref(), graph_types::FOOD_MEASUREMENT);
    map.insert("unit".to_owned(), json!(measurement.unit));
    map.insert("value".to_owned(), json!(measurement.value));
    map.insert("eq_unit".to_owned(), json!(measurement.equivalent_unit));
    map.insert("eq_value".to_owned(), json!(measurement.equivalent_value));
    map.insert(
        "nutrient_measurement".to_owned(),
        Value::Array(
            measurement
                .nutrient_measurements
                .iter()
                .map(nutrient_measurement_node)
                .collect(),
        ),
    );
    Value::Object(map)
}

/// Mutation JSON for a food; a committed food becomes a reference
#[must_use]
pub fn food_node(food: &Food) -> Value {
    if let Some(id) = food.id.as_ref().filter(|id| !id.is_placeholder()) {
        return reference(id);
    }
    let mut map = node(food.id.as_ref(), graph_types::FOOD);
    insert_opt(&mut map, "ndb_id", food.external_ref_id.as_ref());
    map.insert("name".to_owned(), json!(food.name));
    map.insert(
        "measurement".to_owned(),
        Value::Array(food.measurements.iter().map(food_measurement_node).collect()),
    );
    Value::Object(map)
}

fn ingredient_node(ingredient: &Ingredient) -> Value {
    let mut map = node(ingredient.id.as_ref(), graph_types::INGREDIENT);
    if let Some(food) = &ingredient.food {
        map.insert("food".to_owned(), food_node(food));
    }
    map.insert("unit".to_owned(), json!(ingredient.unit));
    map.insert("value".to_owned(), json!(ingredient.value));
    Value::Object(map)
}

fn instruction_node(instruction: &Instruction) -> Value {
    let mut map = node(instruction.id.as_ref(), graph_types::INSTRUCTION);
    map.insert("order".to_owned(), json!(instruction.order));
    map.insert("text".to_owned(), json!(instruction.text));
    Value::Object(map)
}

/// Mutation JSON for a whole recipe
#[must_use]
pub fn recipe_node(recipe: &Recipe) -> Value {
    let mut map = node(recipe.id.as_ref(), graph_types::RECIPE);
    map.insert("name".to_owned(), json!(recipe.name));
    map.insert(
        "ingredient".to_owned(),
        Value::Array(recipe.ingredients.iter().map(ingredient_node).collect()),
    );
    map.insert(
        "instruction".to_owned(),
        Value::Array(recipe.instructions.iter().map(instruction_node).collect()),
    );
    Value::Object(map)
}

/// Serialize mutation JSON
///
/// # Errors
///
/// Returns `Decode` if the value cannot be serialized
pub fn to_bytes(value: &Value) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(value).map_err(|e| StoreError::decode("mutation body", e))
}

fn resolve(id: &mut Option<Uid>, uids: &HashMap<String, String>) -> Result<(), StoreError> {
    let Some(key) = id.as_ref().and_then(Uid::placeholder_key) else {
        return Ok(());
    };
    let assigned = uids.get(key).ok_or_else(|| {
        StoreError::decode("mutation response", format!("no id assigned to '{key}'"))
    })?;
    *id = Some(Uid::new(assigned.clone()));
    Ok(())
}

/// Placeholder assignment before a commit and id resolution after it
pub trait PendingIds {
    /// Give every node without an id its content placeholder
    fn assign_placeholders(&mut self);

    /// Replace every placeholder with its assigned id
    ///
    /// # Errors
    ///
    /// Returns `Decode` if a placeholder key is missing from `uids`
    fn apply_uids(&mut self, uids: &HashMap<String, String>) -> Result<(), StoreError>;
}

impl PendingIds for Nutrient {
    fn assign_placeholders(&mut self) {
        if self.id.is_none() {
            self.id = Some(self.placeholder());
        }
    }

    fn apply_uids(&mut self, uids: &HashMap<String, String>) -> Result<(), StoreError> {
        resolve(&mut self.id, uids)
    }
}

impl PendingIds for NutrientMeasurement {
    fn assign_placeholders(&mut self) {
        if let Some(nutrient) = self.nutrient.as_mut() {
            nutrient.assign_placeholders();
        }
        if self.id.is_none() {
            self.id = Some(self.placeholder());
        }
    }

    fn apply_uids(&mut self, uids: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(nutrient) = self.nutrient.as_mut() {
            nutrient.apply_uids(uids)?;
        }
        resolve(&mut self.id, uids)
    }
}

impl PendingIds for FoodMeasurement {
    fn assign_placeholders(&mut self) {
        for measurement in &mut self.nutrient_measurements {
            measurement.assign_placeholders();
        }
        if self.id.is_none() {
            self.id = Some(self.placeholder());
        }
    }

    fn apply_uids(&mut self, uids: &HashMap<String, String>) -> Result<(), StoreError> {
        for measurement in &mut self.nutrient_measurements {
            measurement.apply_uids(uids)?;
        }
        resolve(&mut self.id, uids)
    }
}

impl PendingIds for Food {
    fn assign_placeholders(&mut self) {
        if is_committed(self.id.as_ref()) {
            return;
        }
        for measurement in &mut self.measurements {
            measurement.assign_placeholders();
        }
        if self.id.is_none() {
            self.id = Some(self.placeholder());
        }
    }

    fn apply_uids(&mut self, uids: &HashMap<String, String>) -> Result<(), StoreError> {
        if is_committed(self.id.as_ref()) {
            return Ok(());
        }
        for measurement in &mut self.measurements {
            measurement.apply_uids(uids)?;
        }
        resolve(&mut self.id, uids)
    }
}

impl PendingIds for Recipe {
    fn assign_placeholders(&mut self) {
        for (position, ingredient) in self.ingredients.iter_mut().enumerate() {
            if let Some(food) = ingredient.food.as_mut() {
                food.assign_placeholders();
            }
            if ingredient.id.is_none() {
                // Equal ingredients in one recipe are still separate lines
                let key = format!("{}_{position}", ingredient.content_key());
                ingredient.id = Some(Uid::placeholder(&key));
            }
        }
        for instruction in &mut self.instructions {
            if instruction.id.is_none() {
                instruction.id = Some(instruction.placeholder());
            }
        }
        if self.id.is_none() {
            self.id = Some(self.placeholder());
        }
    }

    fn apply_uids(&mut self, uids: &HashMap<String, String>) -> Result<(), StoreError> {
        for ingredient in &mut self.ingredients {
            if let Some(food) = ingredient.food.as_mut() {
                food.apply_uids(uids)?;
            }
            resolve(&mut ingredient.id, uids)?;
        }
        for instruction in &mut self.instructions {
            resolve(&mut instruction.id, uids)?;
        }
        resolve(&mut self.id, uids)
    }
}
