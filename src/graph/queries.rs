// ABOUTME: Query texts for natural-key lookups and recipe loading, plus response decoding
// ABOUTME: Lookups filter on dgraph.type so equal names of different kinds never match
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::StoreError;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::QueryVariables;

/// Variable holding the natural key or search terms
pub const NAME_VARIABLE: &str = "$name";

/// Food by exact name, fully expanded
pub const FOOD_BY_NAME: &str = r"query food($name: string) {
  food(func: eq(name, $name)) @filter(type(Food)) {
    uid
    ndb_id
    name
    measurement {
      uid
      unit
      value
      eq_unit
      eq_value
      nutrient_measurement {
        uid
        unit
        value
        nutrient {
          uid
          ndb_id
          ndb_group
          name
        }
      }
    }
  }
}";

/// Nutrient by exact name
pub const NUTRIENT_BY_NAME: &str = r"query nutrient($name: string) {
  nutrient(func: eq(name, $name)) @filter(type(Nutrient)) {
    uid
    ndb_id
    ndb_group
    name
  }
}";

/// Body selecting a whole recipe graph
const RECIPE_FIELDS: &str = r"
    uid
    name
    ingredient {
      uid
      unit
      value
      food {
        uid
        ndb_id
        name
        measurement {
          uid
          unit
          value
          eq_unit
          eq_value
          nutrient_measurement {
            uid
            unit
            value
            nutrient {
              uid
              ndb_id
              ndb_group
              name
            }
          }
        }
      }
    }
    instruction {
      uid
      order
      text
    }";

/// Recipes whose name shares any term with `$name`
#[must_use]
pub fn recipe_search() -> String {
    format!(
        "query recipes($name: string) {{\n  recipe(func: anyoftext(name, $name)) @filter(type(Recipe)) {{{RECIPE_FIELDS}\n  }}\n}}"
    )
}

/// Recipes with exactly the name `$name`
#[must_use]
pub fn recipe_by_name() -> String {
    format!(
        "query recipe($name: string) {{\n  recipe(func: eq(name, $name)) @filter(type(Recipe)) {{{RECIPE_FIELDS}\n  }}\n}}"
    )
}

/// Variables binding `$name`
#[must_use]
pub fn name_variables(name: &str) -> QueryVariables {
    QueryVariables::from([(NAME_VARIABLE.to_owned(), name.to_owned())])
}

/// Decode the node list of one query block
///
/// A missing block decodes as an empty list.
///
/// # Errors
///
/// Returns `Decode` if the response is not JSON or the block does not match `T`
pub fn decode_block<T: DeserializeOwned>(bytes: &[u8], block: &str) -> Result<Vec<T>, StoreError> {
    let mut root: Value = serde_json::from_slice(bytes)
        .map_err(|e| StoreError::decode(format!("{block} query response"), e))?;
    let Some(nodes) = root.get_mut(block).map(Value::take) else {
        return Ok(Vec::new());
    };
    if nodes.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(nodes).map_err(|e| StoreError::decode(format!("{block} nodes"), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodlab_core::{Food, Nutrient};

    #[test]
    fn test_decode_block() {
        let bytes = br#"{"nutrient":[{"uid":"0x2","name":"Potassium","ndb_id":"306"}]}"#;
        let nutrients: Vec<Nutrient> = decode_block(bytes, "nutrient").unwrap();
        assert_eq!(nutrients.len(), 1);
        assert_eq!(nutrients[0].id.as_ref().unwrap().as_str(), "0x2");
    }

    #[test]
    fn test_missing_block_is_empty() {
        let foods: Vec<Food> = decode_block(b"{}", "food").unwrap();
        assert!(foods.is_empty());
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_block::<Food>(b"not json", "food"),
            Err(StoreError::Decode { .. })
        ));
        assert!(matches!(
            decode_block::<Food>(br#"{"food": {"name": 3}}"#, "food"),
            Err(StoreError::Decode { .. })
        ));
    }

    #[test]
    fn test_recipe_queries_differ_by_function() {
        assert!(recipe_search().contains("anyoftext(name, $name)"));
        assert!(recipe_by_name().contains("eq(name, $name)"));
        assert!(recipe_by_name().contains("nutrient_measurement"));
    }
}
