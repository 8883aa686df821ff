// ABOUTME: Food, FoodMeasurement, NutrientMeasurement, and Nutrient graph nodes
// ABOUTME: A food measurement is a reference quantity that its nutrient values are defined against
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use serde::{Deserialize, Serialize};

use super::reference::one_or_many;
use super::uid::Uid;

/// Globally shared nutrient, deduplicated by name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Nutrient {
    /// Store-assigned id
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uid>,
    /// Nutrient id in the nutrient-lookup database
    #[serde(rename = "ndb_id", default, skip_serializing_if = "Option::is_none")]
    pub external_ref_id: Option<String>,
    /// Nutrient group in the nutrient-lookup database (e.g. "Minerals")
    #[serde(rename = "ndb_group", default, skip_serializing_if = "Option::is_none")]
    pub external_group: Option<String>,
    /// Natural key
    #[serde(default)]
    pub name: String,
}

impl Nutrient {
    /// Create an uncommitted nutrient
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach nutrient-lookup identifiers
    #[must_use]
    pub fn with_external_ref(mut self, id: impl Into<String>, group: impl Into<String>) -> Self {
        self.external_ref_id = Some(id.into());
        self.external_group = Some(group.into());
        self
    }
}

/// Amount of one nutrient within a food measurement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientMeasurement {
    /// Store-assigned id
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uid>,
    /// Measured nutrient
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub nutrient: Option<Nutrient>,
    /// Nutrient unit (e.g. "mg", "kcal")
    #[serde(default)]
    pub unit: String,
    /// Nutrient amount in the owning food measurement's reference quantity
    #[serde(default)]
    pub value: f64,
}

impl NutrientMeasurement {
    /// Create an uncommitted nutrient measurement
    #[must_use]
    pub fn new(nutrient: Nutrient, unit: impl Into<String>, value: f64) -> Self {
        Self {
            id: None,
            nutrient: Some(nutrient),
            unit: unit.into(),
            value,
        }
    }
}

/// Reference quantity of a food and the nutrients it contains
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FoodMeasurement {
    /// Store-assigned id
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uid>,
    /// Reference unit (e.g. "cup")
    #[serde(default)]
    pub unit: String,
    /// Reference quantity in `unit`
    #[serde(default)]
    pub value: f64,
    /// Equivalent unit of the reference quantity (e.g. "g")
    #[serde(rename = "eq_unit", default)]
    pub equivalent_unit: String,
    /// Reference quantity expressed in `equivalent_unit`
    #[serde(rename = "eq_value", default)]
    pub equivalent_value: f64,
    /// Nutrients contained in the reference quantity
    #[serde(rename = "nutrient_measurement", default)]
    pub nutrient_measurements: Vec<NutrientMeasurement>,
}

impl FoodMeasurement {
    /// Create an uncommitted food measurement
    #[must_use]
    pub fn new(unit: impl Into<String>, value: f64) -> Self {
        Self {
            unit: unit.into(),
            value,
            ..Self::default()
        }
    }

    /// Set the equivalent quantity
    #[must_use]
    pub fn with_equivalent(mut self, unit: impl Into<String>, value: f64) -> Self {
        self.equivalent_unit = unit.into();
        self.equivalent_value = value;
        self
    }

    /// Add a nutrient amount
    #[must_use]
    pub fn with_nutrient(mut self, nutrient: Nutrient, unit: impl Into<String>, value: f64) -> Self {
        self.nutrient_measurements
            .push(NutrientMeasurement::new(nutrient, unit, value));
        self
    }
}

/// Food with its nutritional measurements, deduplicated by name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Food {
    /// Store-assigned id
    #[serde(rename = "uid", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uid>,
    /// Food number in the nutrient-lookup database
    #[serde(rename = "ndb_id", default, skip_serializing_if = "Option::is_none")]
    pub external_ref_id: Option<String>,
    /// Natural key
    #[serde(default)]
    pub name: String,
    /// Reference quantities with nutrient values
    #[serde(rename = "measurement", default)]
    pub measurements: Vec<FoodMeasurement>,
}

impl Food {
    /// Create an uncommitted food
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a measurement
    #[must_use]
    pub fn with_measurement(mut self, measurement: FoodMeasurement) -> Self {
        self.measurements.push(measurement);
        self
    }

    /// First measurement whose unit equals `unit` exactly
    #[must_use]
    pub fn measurement_for_unit(&self, unit: &str) -> Option<&FoodMeasurement> {
        self.measurements.iter().find(|m| m.unit == unit)
    }

    /// Whether this food has been committed to the store
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.id.as_ref().is_some_and(|id| !id.is_placeholder())
    }
}
