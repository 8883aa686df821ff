// ABOUTME: Converts an NDB food report into a Food graph with measurements and nutrients
// ABOUTME: One food measurement per household measure label plus a 100 g reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use foodlab_core::{Food, FoodMeasurement, Nutrient, NutrientMeasurement};

use crate::models::{FoodReport, ReportNutrient};

/// Unit of the per-100 g reference measurement
pub const GRAM_UNIT: &str = "g";

/// Quantity that report-level nutrient values refer to
pub const REFERENCE_GRAMS: f64 = 100.0;

fn nutrient_of(entry: &ReportNutrient) -> Nutrient {
    let mut nutrient = Nutrient::new(entry.name.clone());
    if !entry.nutrient_id.is_empty() {
        nutrient.external_ref_id = Some(entry.nutrient_id.clone());
    }
    if !entry.group.is_empty() {
        nutrient.external_group = Some(entry.group.clone());
    }
    nutrient
}

/// Build an uncommitted [`Food`] from a report
///
/// Measurements appear in the order their labels first occur in the report.
/// Each carries every nutrient that reports a value for that label. A `g`
/// measurement of 100 g built from the per-100 g values is appended unless
/// the report already has a `g` measure.
#[must_use]
pub fn food_from_report(report: &FoodReport) -> Food {
    let mut food = Food::new(report.name.clone());
    food.external_ref_id = Some(report.ndbno.clone());

    for entry in &report.nutrients {
        for measure in &entry.measures {
            let index = match food
                .measurements
                .iter()
                .position(|m| m.unit == measure.label)
            {
                Some(index) => index,
                None => {
                    food.measurements.push(
                        FoodMeasurement::new(measure.label.clone(), measure.quantity)
                            .with_equivalent(
                                measure.equivalent_unit.clone(),
                                measure.equivalent_quantity,
                            ),
                    );
                    food.measurements.len() - 1
                }
            };
            food.measurements[index]
                .nutrient_measurements
                .push(NutrientMeasurement::new(
                    nutrient_of(entry),
                    entry.unit.clone(),
                    measure.value,
                ));
        }
    }

    if !report.nutrients.is_empty() && food.measurement_for_unit(GRAM_UNIT).is_none() {
        let mut reference = FoodMeasurement::new(GRAM_UNIT, REFERENCE_GRAMS)
            .with_equivalent(GRAM_UNIT, REFERENCE_GRAMS);
        reference.nutrient_measurements = report
            .nutrients
            .iter()
            .map(|entry| NutrientMeasurement::new(nutrient_of(entry), entry.unit.clone(), entry.value))
            .collect();
        food.measurements.push(reference);
    }

    food
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportMeasure;

    fn measure(label: &str, quantity: f64, grams: f64, value: f64) -> ReportMeasure {
        ReportMeasure {
            label: label.to_owned(),
            quantity,
            equivalent_quantity: grams,
            equivalent_unit: "g".to_owned(),
            value,
        }
    }

    fn potato_report() -> FoodReport {
        FoodReport {
            ndbno: "11352".to_owned(),
            name: "Potato".to_owned(),
            data_source: Some("SR".to_owned()),
            nutrients: vec![
                ReportNutrient {
                    nutrient_id: "306".to_owned(),
                    name: "Potassium".to_owned(),
                    group: "Minerals".to_owned(),
                    unit: "mg".to_owned(),
                    value: 425.0,
                    measures: vec![
                        measure("cup", 1.0, 150.0, 620.0),
                        measure("large", 1.0, 369.0, 1568.0),
                    ],
                },
                ReportNutrient {
                    nutrient_id: "208".to_owned(),
                    name: "Calories".to_owned(),
                    group: "Proximates".to_owned(),
                    unit: "kcal".to_owned(),
                    value: 77.0,
                    measures: vec![measure("cup", 1.0, 150.0, 110.0)],
                },
            ],
        }
    }

    #[test]
    fn test_one_measurement_per_label() {
        let food = food_from_report(&potato_report());
        assert_eq!(food.name, "Potato");
        assert_eq!(food.external_ref_id.as_deref(), Some("11352"));
        let units: Vec<&str> = food.measurements.iter().map(|m| m.unit.as_str()).collect();
        assert_eq!(units, vec!["cup", "large", "g"]);

        let cup = food.measurement_for_unit("cup").unwrap();
        assert!((cup.equivalent_value - 150.0).abs() < f64::EPSILON);
        assert_eq!(cup.nutrient_measurements.len(), 2);
        let large = food.measurement_for_unit("large").unwrap();
        assert_eq!(large.nutrient_measurements.len(), 1);
    }

    #[test]
    fn test_nutrient_metadata_is_carried() {
        let food = food_from_report(&potato_report());
        let cup = food.measurement_for_unit("cup").unwrap();
        let potassium = cup.nutrient_measurements[0].nutrient.as_ref().unwrap();
        assert_eq!(potassium.name, "Potassium");
        assert_eq!(potassium.external_ref_id.as_deref(), Some("306"));
        assert_eq!(potassium.external_group.as_deref(), Some("Minerals"));
        assert!(potassium.id.is_none());
    }

    #[test]
    fn test_hundred_gram_reference() {
        let food = food_from_report(&potato_report());
        let grams = food.measurement_for_unit("g").unwrap();
        assert!((grams.value - REFERENCE_GRAMS).abs() < f64::EPSILON);
        let values: Vec<f64> = grams.nutrient_measurements.iter().map(|n| n.value).collect();
        assert_eq!(values, vec![425.0, 77.0]);
    }

    #[test]
    fn test_report_without_nutrients() {
        let report = FoodReport {
            nutrients: Vec::new(),
            ..potato_report()
        };
        let food = food_from_report(&report);
        assert!(food.measurements.is_empty());
    }
}
