// ABOUTME: Integration tests for get-or-create of foods and nutrients against the memory store
// ABOUTME: Covers idempotence, concurrent callers on one name, and duplicate detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use async_trait::async_trait;
use foodlab::config::UpsertConfig;
use foodlab::graph::{CallContext, GraphStore, MemoryGraphStore, MutationResponse, QueryVariables};
use foodlab::recipes::UpsertCoordinator;
use foodlab::ErrorCode;
use foodlab_core::constants::graph_types;
use foodlab_core::{Food, FoodMeasurement, Nutrient, StoreError, Uid};
use futures_util::future::join_all;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn potato() -> Food {
    Food::new("Potato").with_measurement(
        FoodMeasurement::new("cup", 1.0)
            .with_equivalent("g", 150.0)
            .with_nutrient(Nutrient::new("Potassium"), "mg", 620.0)
            .with_nutrient(Nutrient::new("Calories"), "kcal", 110.0),
    )
}

#[tokio::test]
async fn test_get_or_create_food_is_idempotent() {
    let store = Arc::new(MemoryGraphStore::new());
    let upserts = UpsertCoordinator::new(store.clone(), UpsertConfig::default());
    let ctx = CallContext::background();

    let first = upserts
        .get_or_create_food(&ctx, &Food::new("Apple"))
        .await
        .unwrap();
    assert_eq!(first.id, Some(Uid::new("0x1")));
    assert_eq!(store.mutation_count(), 1);

    let second = upserts
        .get_or_create_food(&ctx, &Food::new("Apple"))
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(store.mutation_count(), 1);
    assert_eq!(store.count_type(graph_types::FOOD).await, 1);
}

#[tokio::test]
async fn test_foods_share_nutrient_nodes() {
    let store = Arc::new(MemoryGraphStore::new());
    let upserts = UpsertCoordinator::new(store.clone(), UpsertConfig::default());
    let ctx = CallContext::background();

    let apple = Food::new("Apple").with_measurement(
        FoodMeasurement::new("medium", 1.0)
            .with_equivalent("g", 182.0)
            .with_nutrient(
                Nutrient::new("Potassium").with_external_ref("999", "Other"),
                "mg",
                195.0,
            ),
    );
    let potato = upserts.get_or_create_food(&ctx, &potato()).await.unwrap();
    let apple = upserts.get_or_create_food(&ctx, &apple).await.unwrap();

    let potassium_of = |food: &Food| {
        food.measurements[0]
            .nutrient_measurements
            .iter()
            .find_map(|nm| nm.nutrient.as_ref().filter(|n| n.name == "Potassium"))
            .and_then(|n| n.id.clone())
            .unwrap()
    };
    assert_eq!(potassium_of(&potato), potassium_of(&apple));

    let stored = apple.measurements[0].nutrient_measurements[0]
        .nutrient
        .as_ref()
        .unwrap();
    assert_eq!(stored.external_ref_id, None);
    assert_eq!(store.count_type(graph_types::NUTRIENT).await, 2);
    assert_eq!(store.count_type(graph_types::FOOD).await, 2);
}

#[tokio::test]
async fn test_concurrent_callers_create_one_food() {
    let store = Arc::new(MemoryGraphStore::new());
    store.set_latency(Duration::from_millis(5));
    let upserts = UpsertCoordinator::new(store.clone(), UpsertConfig::default());
    let ctx = CallContext::background();
    let food = potato();

    let results = join_all((0..8).map(|_| upserts.get_or_create_food(&ctx, &food))).await;
    let ids: Vec<Option<Uid>> = results.into_iter().map(|r| r.unwrap().id).collect();

    assert!(ids[0].is_some());
    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(store.count_type(graph_types::FOOD).await, 1);
    assert_eq!(store.count_type(graph_types::NUTRIENT).await, 2);
}

#[tokio::test]
async fn test_concurrent_callers_on_different_names_proceed() {
    let store = Arc::new(MemoryGraphStore::new());
    store.set_latency(Duration::from_millis(5));
    let upserts = UpsertCoordinator::new(store.clone(), UpsertConfig::default());
    let ctx = CallContext::background();
    let foods: Vec<Food> = ["Leek", "Onion", "Carrot"].into_iter().map(Food::new).collect();

    let results = join_all(foods.iter().map(|f| upserts.get_or_create_food(&ctx, f))).await;
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(store.count_type(graph_types::FOOD).await, 3);
}

/// Writes a competing food with the same name before the first food mutation
struct RacingStore {
    inner: MemoryGraphStore,
    raced: AtomicBool,
}

#[async_trait]
impl GraphStore for RacingStore {
    async fn alter(&self, ctx: &CallContext, schema: &str) -> Result<(), StoreError> {
        self.inner.alter(ctx, schema).await
    }

    async fn query(
        &self,
        ctx: &CallContext,
        query: &str,
        variables: &QueryVariables,
    ) -> Result<Vec<u8>, StoreError> {
        self.inner.query(ctx, query, variables).await
    }

    async fn mutate(
        &self,
        ctx: &CallContext,
        set_json: &[u8],
        commit_now: bool,
    ) -> Result<MutationResponse, StoreError> {
        let body: serde_json::Value = serde_json::from_slice(set_json).unwrap();
        if body["dgraph.type"] == graph_types::FOOD && !self.raced.swap(true, Ordering::SeqCst) {
            let rival = json!({
                "uid": "_:rival",
                "dgraph.type": graph_types::FOOD,
                "name": body["name"],
            });
            self.inner
                .mutate(ctx, &serde_json::to_vec(&rival).unwrap(), true)
                .await?;
        }
        self.inner.mutate(ctx, set_json, commit_now).await
    }
}

#[tokio::test]
async fn test_verification_reports_duplicate_food() {
    let store = Arc::new(RacingStore {
        inner: MemoryGraphStore::new(),
        raced: AtomicBool::new(false),
    });
    let upserts = UpsertCoordinator::new(
        store.clone(),
        UpsertConfig {
            verify_after_create: true,
        },
    );
    let ctx = CallContext::background();

    let error = upserts
        .get_or_create_food(&ctx, &Food::new("Apple"))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::DuplicateKeyRace);
    assert!(error.message.contains("Apple"));
    assert_eq!(store.inner.count_type(graph_types::FOOD).await, 2);
}

#[tokio::test]
async fn test_without_verification_duplicate_goes_unreported() {
    let store = Arc::new(RacingStore {
        inner: MemoryGraphStore::new(),
        raced: AtomicBool::new(false),
    });
    let upserts = UpsertCoordinator::new(store.clone(), UpsertConfig::default());
    let ctx = CallContext::background();

    let food = upserts
        .get_or_create_food(&ctx, &Food::new("Apple"))
        .await
        .unwrap();
    assert!(food.id.is_some());
}
