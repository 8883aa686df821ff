// ABOUTME: In-process NDB food source with predefined reports for tests
// ABOUTME: Pages search results like the real API and counts requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use async_trait::async_trait;
use foodlab_core::{AppError, AppResult};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::{FoodReport, ReportMeasure, ReportNutrient, SearchHit, SearchPage};
use crate::source::FoodSource;

/// Mock NDB client (no network)
pub struct MockNdbClient {
    reports: Vec<FoodReport>,
    search_calls: AtomicUsize,
    report_calls: AtomicUsize,
}

fn nutrient(id: &str, name: &str, group: &str, unit: &str, per_100g: f64) -> ReportNutrient {
    ReportNutrient {
        nutrient_id: id.to_owned(),
        name: name.to_owned(),
        group: group.to_owned(),
        unit: unit.to_owned(),
        value: per_100g,
        measures: Vec::new(),
    }
}

fn with_measure(mut entry: ReportNutrient, label: &str, grams: f64, value: f64) -> ReportNutrient {
    entry.measures.push(ReportMeasure {
        label: label.to_owned(),
        quantity: 1.0,
        equivalent_quantity: grams,
        equivalent_unit: "g".to_owned(),
        value,
    });
    entry
}

impl MockNdbClient {
    /// Mock with a potato and an apple
    #[must_use]
    pub fn new() -> Self {
        let potato = FoodReport {
            ndbno: "11352".to_owned(),
            name: "Potato".to_owned(),
            data_source: Some("SR".to_owned()),
            nutrients: vec![
                with_measure(
                    nutrient("306", "Potassium", "Minerals", "mg", 413.0),
                    "cup",
                    150.0,
                    620.0,
                ),
                with_measure(
                    nutrient("208", "Calories", "Proximates", "kcal", 73.0),
                    "cup",
                    150.0,
                    110.0,
                ),
            ],
        };
        let apple = FoodReport {
            ndbno: "09003".to_owned(),
            name: "Apple".to_owned(),
            data_source: Some("SR".to_owned()),
            nutrients: vec![
                with_measure(
                    nutrient("306", "Potassium", "Minerals", "mg", 107.0),
                    "medium",
                    182.0,
                    195.0,
                ),
                with_measure(
                    nutrient("208", "Calories", "Proximates", "kcal", 52.0),
                    "medium",
                    182.0,
                    95.0,
                ),
            ],
        };
        Self::with_reports(vec![potato, apple])
    }

    /// Mock serving exactly the given reports, in order
    #[must_use]
    pub const fn with_reports(reports: Vec<FoodReport>) -> Self {
        Self {
            reports,
            search_calls: AtomicUsize::new(0),
            report_calls: AtomicUsize::new(0),
        }
    }

    /// Mock with `count` foods named `"{prefix} 1"` through `"{prefix} {count}"`
    #[must_use]
    pub fn with_generated_foods(prefix: &str, count: usize) -> Self {
        let reports = (1..=count)
            .map(|i| FoodReport {
                ndbno: format!("{i:05}"),
                name: format!("{prefix} {i}"),
                data_source: None,
                nutrients: vec![with_measure(
                    nutrient("208", "Calories", "Proximates", "kcal", 100.0),
                    "cup",
                    100.0,
                    100.0,
                )],
            })
            .collect();
        Self::with_reports(reports)
    }

    /// Number of search page requests served
    #[must_use]
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of report requests served
    #[must_use]
    pub fn report_calls(&self) -> usize {
        self.report_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockNdbClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FoodSource for MockNdbClient {
    async fn search_page(&self, query: &str, offset: usize, max: usize) -> AppResult<SearchPage> {
        if query.trim().is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        let needle = query.trim().to_lowercase();
        let matches: Vec<&FoodReport> = self
            .reports
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect();

        Ok(SearchPage {
            start: offset,
            total: matches.len(),
            items: matches
                .into_iter()
                .skip(offset)
                .take(max)
                .map(|r| SearchHit {
                    ndbno: r.ndbno.clone(),
                    name: r.name.clone(),
                    group: None,
                    data_source: r.data_source.clone(),
                    manufacturer: None,
                })
                .collect(),
        })
    }

    async fn food_report(&self, ndbno: &str) -> AppResult<FoodReport> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        self.reports
            .iter()
            .find(|r| r.ndbno == ndbno)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("NDB food {ndbno}")))
    }
}
