// ABOUTME: Dgraph schema for the recipe graph: predicates, indexes, and node types
// ABOUTME: Applied once at startup through GraphStore::alter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

/// Predicate and type declarations
///
/// `name` carries a `hash` index for natural-key lookups and a `fulltext`
/// index for recipe search. Single references (`food`, `nutrient`) are `uid`;
/// owned children are `[uid]`. Every edge keeps a reverse index so shared
/// foods and nutrients can be traced back to their users.
pub const SCHEMA: &str = r"<ingredient>: [uid] @reverse .
<instruction>: [uid] @reverse .
<food>: uid @reverse .
<measurement>: [uid] @reverse .
<nutrient_measurement>: [uid] @reverse .
<nutrient>: uid @reverse .
<name>: string @index(fulltext, hash, term, trigram) .
<unit>: string @index(term) .
<value>: float @index(float) .
<eq_unit>: string @index(term) .
<eq_value>: float @index(float) .
<ndb_id>: string @index(hash) .
<ndb_group>: string @index(hash, term) .
<order>: int @index(int) .
<text>: string @index(fulltext, term, trigram) .

type Recipe {
  name
  ingredient
  instruction
}

type Ingredient {
  food
  unit
  value
}

type Instruction {
  order
  text
}

type Food {
  ndb_id
  name
  measurement
}

type FoodMeasurement {
  unit
  value
  eq_unit
  eq_value
  nutrient_measurement
}

type NutrientMeasurement {
  nutrient
  unit
  value
}

type Nutrient {
  ndb_id
  ndb_group
  name
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use foodlab_core::constants::graph_types;

    #[test]
    fn test_declares_every_node_type() {
        for kind in [
            graph_types::RECIPE,
            graph_types::INGREDIENT,
            graph_types::INSTRUCTION,
            graph_types::FOOD,
            graph_types::FOOD_MEASUREMENT,
            graph_types::NUTRIENT_MEASUREMENT,
            graph_types::NUTRIENT,
        ] {
            assert!(SCHEMA.contains(&format!("type {kind} {{")), "missing type {kind}");
        }
    }

    #[test]
    fn test_name_is_hash_and_fulltext_indexed() {
        let line = SCHEMA.lines().find(|l| l.starts_with("<name>")).unwrap();
        assert!(line.contains("hash"));
        assert!(line.contains("fulltext"));
    }
}
