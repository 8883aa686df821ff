// ABOUTME: Get-or-create for foods and nutrients keyed by their natural key (name)
// ABOUTME: Serializes check-then-create per key and resolves nested nutrients before their food
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! # Upsert Coordinator
//!
//! For a candidate entity:
//!
//! 1. Query the store for a node of the same type whose `name` equals the
//!    candidate's name. If one exists, return the first match as stored.
//! 2. Otherwise build the pending subgraph. Nested nutrients are resolved
//!    first through [`UpsertCoordinator::get_or_create_nutrient`], so a food
//!    only ever references committed nutrients.
//! 3. Commit the subgraph in one mutation and write the assigned ids back.
//!
//! The whole sequence runs under a per-key lock (`food:<name>` or
//! `nutrient:<name>`), so concurrent upserts of one new name in this process
//! create one node. Other processes are not covered; with
//! `verify_after_create` the key is re-queried after creation and duplicates
//! surface as `DuplicateKeyRace`.

use foodlab_core::{AppError, AppResult, Food, Nutrient, StoreError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{require_finite, require_name};
use crate::config::UpsertConfig;
use crate::graph::mutation::{food_node, nutrient_node, to_bytes, PendingIds};
use crate::graph::queries::{decode_block, name_variables, FOOD_BY_NAME, NUTRIENT_BY_NAME};
use crate::graph::{CallContext, GraphStore, KeyedLocks};

const FOOD_KIND: &str = "food";
const NUTRIENT_KIND: &str = "nutrient";

#[derive(Debug, Deserialize)]
struct NodeId {
    uid: String,
}

fn lock_key(kind: &str, name: &str) -> String {
    format!("{kind}:{name}")
}

/// Clear every id below a candidate food so creation starts from content
fn clear_food_ids(food: &mut Food) {
    food.id = None;
    for measurement in &mut food.measurements {
        measurement.id = None;
        for nutrient_measurement in &mut measurement.nutrient_measurements {
            nutrient_measurement.id = None;
        }
    }
}

fn validate_food(food: &Food) -> AppResult<()> {
    require_name("food", &food.name)?;
    for measurement in &food.measurements {
        require_finite("food measurement value", measurement.value)?;
        require_finite("food measurement equivalent value", measurement.equivalent_value)?;
        for nutrient_measurement in &measurement.nutrient_measurements {
            require_finite("nutrient measurement value", nutrient_measurement.value)?;
            if let Some(nutrient) = &nutrient_measurement.nutrient {
                require_name("nutrient", &nutrient.name)?;
            }
        }
    }
    Ok(())
}

/// Finds or creates shared food and nutrient nodes
pub struct UpsertCoordinator {
    store: Arc<dyn GraphStore>,
    locks: KeyedLocks,
    config: UpsertConfig,
}

impl UpsertCoordinator {
    /// Coordinator over `store`
    #[must_use]
    pub fn new(store: Arc<dyn GraphStore>, config: UpsertConfig) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
            config,
        }
    }

    /// Store this coordinator writes to
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// Return the stored nutrient named like `nutrient`, creating it if absent
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank name, otherwise store errors
    /// (`StoreUnavailable`, `DecodeError`, `DuplicateKeyRace`, ...) with
    /// operation context.
    #[instrument(skip_all, fields(nutrient = %nutrient.name))]
    pub async fn get_or_create_nutrient(
        &self,
        ctx: &CallContext,
        nutrient: &Nutrient,
    ) -> AppResult<Nutrient> {
        require_name("nutrient", &nutrient.name)?;
        let _guard = self.locks.lock(&lock_key(NUTRIENT_KIND, &nutrient.name)).await;
        self.nutrient_locked(ctx, nutrient).await.map_err(|e| {
            AppError::from(e).context(format_args!("get-or-create nutrient '{}'", nutrient.name))
        })
    }

    /// Return the stored food named like `food`, creating it with its
    /// measurements if absent
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank name or non-finite value, otherwise store
    /// errors with operation context.
    #[instrument(skip_all, fields(food = %food.name))]
    pub async fn get_or_create_food(&self, ctx: &CallContext, food: &Food) -> AppResult<Food> {
        validate_food(food)?;
        let context = || format!("get-or-create food '{}'", food.name);
        let _guard = self.locks.lock(&lock_key(FOOD_KIND, &food.name)).await;

        let existing = self
            .find::<Food>(ctx, FOOD_BY_NAME, FOOD_KIND, &food.name)
            .await
            .map_err(|e| AppError::from(e).context(context()))?;
        if let Some(existing) = existing.into_iter().next() {
            debug!(id = ?existing.id, "food already stored");
            return Ok(existing);
        }

        let mut pending = food.clone();
        clear_food_ids(&mut pending);
        self.resolve_nutrients(ctx, &mut pending).await?;

        self.create(ctx, FOOD_KIND, &mut pending, food_node)
            .await
            .map_err(|e| AppError::from(e).context(context()))?;
        if self.config.verify_after_create {
            self.verify(ctx, FOOD_KIND, FOOD_BY_NAME, &pending.name)
                .await
                .map_err(|e| AppError::from(e).context(context()))?;
        }
        Ok(pending)
    }

    /// Replace every nested nutrient with its stored counterpart
    async fn resolve_nutrients(&self, ctx: &CallContext, food: &mut Food) -> AppResult<()> {
        let mut resolved: HashMap<String, Nutrient> = HashMap::new();
        for measurement in &mut food.measurements {
            for nutrient_measurement in &mut measurement.nutrient_measurements {
                let Some(nutrient) = nutrient_measurement.nutrient.as_mut() else {
                    continue;
                };
                if let Some(stored) = resolved.get(&nutrient.name) {
                    *nutrient = stored.clone();
                    continue;
                }
                let stored = self.get_or_create_nutrient(ctx, nutrient).await?;
                resolved.insert(nutrient.name.clone(), stored.clone());
                *nutrient = stored;
            }
        }
        debug!(nutrients = resolved.len(), "nested nutrients resolved");
        Ok(())
    }

    async fn nutrient_locked(
        &self,
        ctx: &CallContext,
        nutrient: &Nutrient,
    ) -> Result<Nutrient, StoreError> {
        let existing = self
            .find::<Nutrient>(ctx, NUTRIENT_BY_NAME, NUTRIENT_KIND, &nutrient.name)
            .await?;
        if let Some(existing) = existing.into_iter().next() {
            debug!(id = ?existing.id, "nutrient already stored");
            return Ok(existing);
        }

        let mut pending = nutrient.clone();
        pending.id = None;
        self.create(ctx, NUTRIENT_KIND, &mut pending, nutrient_node)
            .await?;
        if self.config.verify_after_create {
            self.verify(ctx, NUTRIENT_KIND, NUTRIENT_BY_NAME, &pending.name)
                .await?;
        }
        Ok(pending)
    }

    async fn find<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        query: &str,
        block: &str,
        name: &str,
    ) -> Result<Vec<T>, StoreError> {
        let bytes = self.store.query(ctx, query, &name_variables(name)).await?;
        decode_block(&bytes, block)
    }

    /// Commit a pending entity and write the assigned ids back into it
    async fn create<T: PendingIds>(
        &self,
        ctx: &CallContext,
        kind: &'static str,
        pending: &mut T,
        build: fn(&T) -> serde_json::Value,
    ) -> Result<(), StoreError> {
        pending.assign_placeholders();
        let body = to_bytes(&build(pending))?;
        let response = self.store.mutate(ctx, &body, true).await?;
        pending.apply_uids(&response.uids)?;
        info!(kind, assigned = response.uids.len(), "created {kind}");
        Ok(())
    }

    /// Fail if the store now holds more than one node for the key
    async fn verify(
        &self,
        ctx: &CallContext,
        kind: &'static str,
        query: &str,
        name: &str,
    ) -> Result<(), StoreError> {
        let nodes: Vec<NodeId> = self.find(ctx, query, kind, name).await?;
        if nodes.len() > 1 {
            let ids: Vec<String> = nodes.into_iter().map(|node| node.uid).collect();
            warn!(kind, key = name, ids = ?ids, "duplicate nodes for natural key");
            return Err(StoreError::DuplicateKeyRace {
                kind,
                key: name.to_owned(),
                ids,
            });
        }
        Ok(())
    }
}
