// ABOUTME: Wire types for NDB search and food report responses
// ABOUTME: Numeric fields arrive as JSON numbers or strings and decode either way
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use serde::{Deserialize, Deserializer, Serialize};

/// One food matching a search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// NDB food number
    pub ndbno: String,
    /// Food name
    pub name: String,
    /// Food group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Data source abbreviation ("SR", "BL")
    #[serde(rename = "ds", default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    /// Manufacturer for branded foods
    #[serde(rename = "manu", default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchPage {
    /// Offset of the first item
    #[serde(default)]
    pub start: usize,
    /// Total number of matches across all pages
    #[serde(default)]
    pub total: usize,
    /// Matches on this page
    #[serde(rename = "item", default)]
    pub items: Vec<SearchHit>,
}

/// Household measure of a nutrient (e.g. "cup")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeasure {
    /// Measure label, used as the food measurement unit
    pub label: String,
    /// Measure quantity in `label` units
    #[serde(rename = "qty", deserialize_with = "number_or_string")]
    pub quantity: f64,
    /// Equivalent quantity
    #[serde(rename = "eqv", deserialize_with = "number_or_string")]
    pub equivalent_quantity: f64,
    /// Equivalent unit
    #[serde(rename = "eunit", default)]
    pub equivalent_unit: String,
    /// Nutrient amount in this measure
    #[serde(deserialize_with = "number_or_string")]
    pub value: f64,
}

/// Nutrient entry of a food report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportNutrient {
    /// NDB nutrient number
    #[serde(deserialize_with = "id_string")]
    pub nutrient_id: String,
    /// Nutrient name
    pub name: String,
    /// Nutrient group
    #[serde(default)]
    pub group: String,
    /// Nutrient unit
    pub unit: String,
    /// Amount per 100 g
    #[serde(deserialize_with = "number_or_string")]
    pub value: f64,
    /// Amounts per household measure
    #[serde(default)]
    pub measures: Vec<ReportMeasure>,
}

/// Food report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodReport {
    /// NDB food number
    pub ndbno: String,
    /// Food name
    pub name: String,
    /// Data source abbreviation
    #[serde(rename = "ds", default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    /// Nutrients
    #[serde(default)]
    pub nutrients: Vec<ReportNutrient>,
}

/// Search endpoint envelope
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub list: Option<SearchPage>,
    pub errors: Option<ApiErrors>,
}

/// Report endpoint envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ReportResponse {
    pub report: Option<ReportBody>,
    pub errors: Option<ApiErrors>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportBody {
    pub food: FoodReport,
}

/// Error list the API returns with a 200 status
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrors {
    #[serde(default)]
    pub error: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

impl ApiErrors {
    pub(crate) fn joined(&self) -> String {
        self.error
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Markers the API uses for an unavailable amount
const UNAVAILABLE_MARKERS: [&str; 2] = ["", "--"];

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => {
            let trimmed = s.trim();
            if UNAVAILABLE_MARKERS.contains(&trimmed) {
                return Ok(0.0);
            }
            trimmed
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid number '{s}'")))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Integer(u64),
    Text(String),
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Integer(n) => n.to_string(),
        IdRepr::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_with_string_numbers() {
        let json = r#"{
            "report": {"food": {
                "ndbno": "11352", "name": "Potatoes, raw", "ds": "SR",
                "nutrients": [{
                    "nutrient_id": "306", "name": "Potassium, K", "group": "Minerals",
                    "unit": "mg", "value": "425",
                    "measures": [{"label": "cup", "eqv": 150.0, "eunit": "g", "qty": 1.0, "value": "637"}]
                }]
            }}
        }"#;
        let response: ReportResponse = serde_json::from_str(json).unwrap();
        let food = response.report.unwrap().food;
        let nutrient = &food.nutrients[0];
        assert_eq!(nutrient.nutrient_id, "306");
        assert!((nutrient.value - 425.0).abs() < f64::EPSILON);
        assert!((nutrient.measures[0].value - 637.0).abs() < f64::EPSILON);
        assert_eq!(nutrient.measures[0].equivalent_unit, "g");
    }

    #[test]
    fn test_numeric_ids_and_unavailable_values() {
        let json = r#"{"nutrient_id": 208, "name": "Energy", "unit": "kcal", "value": "--", "measures": []}"#;
        let nutrient: ReportNutrient = serde_json::from_str(json).unwrap();
        assert_eq!(nutrient.nutrient_id, "208");
        assert!(nutrient.value.abs() < f64::EPSILON);
        assert!(nutrient.group.is_empty());
    }

    #[test]
    fn test_garbage_number_is_rejected() {
        let json = r#"{"nutrient_id": "208", "name": "Energy", "unit": "kcal", "value": "lots"}"#;
        assert!(serde_json::from_str::<ReportNutrient>(json).is_err());
    }

    #[test]
    fn test_search_envelope_with_errors() {
        let json = r#"{"errors": {"error": [{"status": 400, "message": "zero results"}]}}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.list.is_none());
        assert_eq!(response.errors.unwrap().joined(), "zero results");
    }
}
