// ABOUTME: In-memory GraphStore supporting the query shapes and JSON mutations foodlab issues
// ABOUTME: Mutations apply atomically; test hooks simulate latency and outages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! # Memory Graph Store
//!
//! A small graph engine that speaks the same wire shapes as Dgraph for the
//! subset foodlab uses:
//!
//! - `alter` validates predicate lines and `type` blocks and records which
//!   predicates are `[uid]` lists
//! - `query` answers `eq(name, $var)` and `anyoftext(name, $var)` root
//!   functions with an optional `@filter(type(T))`, expanding every edge of
//!   each match
//! - `mutate` applies a JSON set mutation, allocating ids for `_:<key>`
//!   placeholders in allocation order (`0x1`, `0x2`, ...)
//!
//! A mutation either applies completely or not at all.

use async_trait::async_trait;
use foodlab_core::StoreError;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CallContext, GraphStore, MutationResponse, QueryVariables};

const TYPE_PREDICATE: &str = "dgraph.type";
const BLANK_PREFIX: &str = "_:";
const MAX_EXPAND_DEPTH: usize = 8;

fn block_regex() -> Option<&'static Regex> {
    static BLOCK_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    BLOCK_REGEX
        .get_or_init(|| {
            Regex::new(
                r"(\w+)\s*\(\s*func\s*:\s*(eq|anyoftext)\s*\(\s*name\s*,\s*(\$\w+)\s*\)\s*\)\s*(?:@filter\s*\(\s*type\s*\(\s*(\w+)\s*\)\s*\))?",
            )
            .ok()
        })
        .as_ref()
}

fn predicate_regex() -> Option<&'static Regex> {
    static PREDICATE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    PREDICATE_REGEX
        .get_or_init(|| Regex::new(r"^<?([\w.]+)>?\s*:\s*(\[)?\s*(\w+)\s*\]?[^.]*\.$").ok())
        .as_ref()
}

fn format_uid(id: u64) -> String {
    format!("0x{id:x}")
}

fn parse_uid(uid: &str) -> Option<u64> {
    uid.strip_prefix("0x")
        .and_then(|hex| u64::from_str_radix(hex, 16).ok())
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Default)]
struct StoredNode {
    types: BTreeSet<String>,
    scalars: BTreeMap<String, Value>,
    edges: BTreeMap<String, Vec<u64>>,
}

impl StoredNode {
    fn name(&self) -> Option<&str> {
        self.scalars.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone)]
struct GraphState {
    next_id: u64,
    nodes: BTreeMap<u64, StoredNode>,
    list_predicates: HashSet<String>,
}

impl Default for GraphState {
    fn default() -> Self {
        Self {
            next_id: 1,
            nodes: BTreeMap::new(),
            list_predicates: HashSet::new(),
        }
    }
}

impl GraphState {
    fn expand(&self, id: u64, depth: usize) -> Value {
        let mut map = Map::new();
        map.insert("uid".to_owned(), Value::String(format_uid(id)));
        let Some(node) = self.nodes.get(&id) else {
            return Value::Object(map);
        };
        for (predicate, value) in &node.scalars {
            map.insert(predicate.clone(), value.clone());
        }
        if depth >= MAX_EXPAND_DEPTH {
            return Value::Object(map);
        }
        for (predicate, targets) in &node.edges {
            let mut children = targets.iter().map(|target| self.expand(*target, depth + 1));
            if self.list_predicates.contains(predicate) {
                let children: Vec<Value> = children.collect();
                if !children.is_empty() {
                    map.insert(predicate.clone(), Value::Array(children));
                }
            } else if let Some(child) = children.next() {
                map.insert(predicate.clone(), child);
            }
        }
        Value::Object(map)
    }

    fn answer(&self, query: &str, variables: &QueryVariables) -> Result<Value, StoreError> {
        let pattern =
            block_regex().ok_or_else(|| StoreError::rejected("query", "query parser unavailable"))?;

        let mut blocks = Map::new();
        for captures in pattern.captures_iter(query) {
            let alias = &captures[1];
            let function = &captures[2];
            let variable = &captures[3];
            let type_filter = captures.get(4).map(|m| m.as_str());

            let needle = variables.get(variable).ok_or_else(|| {
                StoreError::rejected("query", format!("variable {variable} is not bound"))
            })?;
            let needle_terms = terms(needle);

            let matches = self
                .nodes
                .iter()
                .filter(|(_, node)| type_filter.map_or(true, |kind| node.types.contains(kind)))
                .filter(|(_, node)| {
                    node.name().is_some_and(|name| match function {
                        "eq" => name == needle,
                        _ => !terms(name).is_disjoint(&needle_terms),
                    })
                })
                .map(|(id, _)| self.expand(*id, 0))
                .collect();
            blocks.insert(alias.to_owned(), Value::Array(matches));
        }

        if blocks.is_empty() {
            return Err(StoreError::rejected(
                "query",
                "no supported root function in query",
            ));
        }
        Ok(Value::Object(blocks))
    }

    fn count_type(&self, kind: &str) -> usize {
        self.nodes
            .values()
            .filter(|node| node.types.contains(kind))
            .count()
    }
}

/// Applies one set mutation to a staged copy of the graph
struct MutationWriter<'a> {
    state: &'a mut GraphState,
    blanks: HashMap<String, u64>,
}

impl<'a> MutationWriter<'a> {
    fn new(state: &'a mut GraphState) -> Self {
        Self {
            state,
            blanks: HashMap::new(),
        }
    }

    fn apply(mut self, body: &Value) -> Result<HashMap<String, String>, StoreError> {
        match body {
            Value::Object(object) => {
                self.write(object)?;
            }
            Value::Array(items) => {
                for item in items {
                    let Value::Object(object) = item else {
                        return Err(StoreError::rejected("mutate", "set list holds a non-object"));
                    };
                    self.write(object)?;
                }
            }
            _ => return Err(StoreError::rejected("mutate", "set must be an object or list")),
        }
        Ok(self
            .blanks
            .into_iter()
            .map(|(key, id)| (key, format_uid(id)))
            .collect())
    }

    fn allocate(&mut self) -> u64 {
        let id = self.state.next_id;
        self.state.next_id += 1;
        self.state.nodes.insert(id, StoredNode::default());
        id
    }

    fn node_id(&mut self, uid: Option<&Value>) -> Result<u64, StoreError> {
        match uid {
            None => Ok(self.allocate()),
            Some(Value::String(uid)) => {
                if let Some(key) = uid.strip_prefix(BLANK_PREFIX) {
                    if let Some(id) = self.blanks.get(key) {
                        return Ok(*id);
                    }
                    let id = self.allocate();
                    self.blanks.insert(key.to_owned(), id);
                    return Ok(id);
                }
                parse_uid(uid)
                    .filter(|id| self.state.nodes.contains_key(id))
                    .ok_or_else(|| StoreError::rejected("mutate", format!("unknown uid '{uid}'")))
            }
            Some(other) => Err(StoreError::rejected(
                "mutate",
                format!("invalid uid {other}"),
            )),
        }
    }

    fn node(&mut self, id: u64) -> &mut StoredNode {
        self.state.nodes.entry(id).or_default()
    }

    fn link(&mut self, from: u64, predicate: &str, to: u64) {
        let is_list = self.state.list_predicates.contains(predicate);
        let node = self.node(from);
        node.scalars.remove(predicate);
        let targets = node.edges.entry(predicate.to_owned()).or_default();
        if is_list {
            if !targets.contains(&to) {
                targets.push(to);
            }
        } else {
            *targets = vec![to];
        }
    }

    fn write(&mut self, object: &Map<String, Value>) -> Result<u64, StoreError> {
        let id = self.node_id(object.get("uid"))?;
        for (predicate, value) in object {
            match (predicate.as_str(), value) {
                ("uid", _) | (_, Value::Null) => {}
                (TYPE_PREDICATE, Value::String(kind)) => {
                    self.node(id).types.insert(kind.clone());
                }
                (TYPE_PREDICATE, Value::Array(kinds)) => {
                    for kind in kinds {
                        let kind = kind.as_str().ok_or_else(|| {
                            StoreError::rejected("mutate", "dgraph.type must hold strings")
                        })?;
                        self.node(id).types.insert(kind.to_owned());
                    }
                }
                (TYPE_PREDICATE, _) => {
                    return Err(StoreError::rejected(
                        "mutate",
                        "dgraph.type must be a string or list",
                    ));
                }
                (_, Value::Object(child)) => {
                    let child_id = self.write(child)?;
                    self.link(id, predicate, child_id);
                }
                (_, Value::Array(items)) => {
                    self.state.list_predicates.insert(predicate.clone());
                    for item in items {
                        let Value::Object(child) = item else {
                            return Err(StoreError::rejected(
                                "mutate",
                                format!("list predicate '{predicate}' holds a non-object"),
                            ));
                        };
                        let child_id = self.write(child)?;
                        self.link(id, predicate, child_id);
                    }
                }
                (_, scalar) => {
                    let node = self.node(id);
                    node.edges.remove(predicate);
                    node.scalars.insert(predicate.clone(), scalar.clone());
                }
            }
        }
        Ok(id)
    }
}

/// Parse schema text, returning the `[uid]` list predicates it declares
fn parse_schema(schema: &str) -> Result<Vec<String>, StoreError> {
    let pattern = predicate_regex().ok_or_else(|| StoreError::Schema {
        message: "schema parser unavailable".to_owned(),
    })?;
    let invalid = |number: usize, line: &str| StoreError::Schema {
        message: format!("line {number}: cannot parse '{line}'"),
    };

    let mut lists = Vec::new();
    let mut statements = 0_usize;
    let mut open_type: Option<&str> = None;

    for (index, raw) in schema.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(kind) = open_type {
            if line == "}" {
                debug!(kind, "schema type declared");
                open_type = None;
                statements += 1;
            } else if !line.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
                return Err(invalid(index + 1, line));
            }
            continue;
        }
        if let Some(header) = line.strip_prefix("type ") {
            let kind = header
                .strip_suffix('{')
                .map(str::trim)
                .filter(|kind| !kind.is_empty())
                .ok_or_else(|| invalid(index + 1, line))?;
            open_type = Some(kind);
            continue;
        }
        let captures = pattern
            .captures(line)
            .ok_or_else(|| invalid(index + 1, line))?;
        if captures.get(2).is_some() && &captures[3] == "uid" {
            lists.push(captures[1].to_owned());
        }
        statements += 1;
    }

    if let Some(kind) = open_type {
        return Err(StoreError::Schema {
            message: format!("type {kind} is not closed"),
        });
    }
    if statements == 0 {
        return Err(StoreError::Schema {
            message: "schema is empty".to_owned(),
        });
    }
    Ok(lists)
}

/// In-memory graph store
#[derive(Debug)]
pub struct MemoryGraphStore {
    state: RwLock<GraphState>,
    available: AtomicBool,
    latency_ms: AtomicU64,
    queries: AtomicUsize,
    mutations: AtomicUsize,
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraphStore {
    /// Empty, available store with no latency
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(GraphState::default()),
            available: AtomicBool::new(true),
            latency_ms: AtomicU64::new(0),
            queries: AtomicUsize::new(0),
            mutations: AtomicUsize::new(0),
        }
    }

    /// Take the store offline (`Unavailable` errors) or bring it back
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Delay applied to every call before it touches the graph
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Queries answered so far
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Mutations committed so far
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// Number of stored nodes carrying `dgraph.type == kind`
    pub async fn count_type(&self, kind: &str) -> usize {
        self.state.read().await.count_type(kind)
    }

    async fn simulate(&self, operation: &'static str) -> Result<(), StoreError> {
        let latency = Duration::from_millis(self.latency_ms.load(Ordering::SeqCst));
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable(operation, "memory store is offline"))
        }
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn alter(&self, ctx: &CallContext, schema: &str) -> Result<(), StoreError> {
        ctx.run("alter", async {
            self.simulate("alter").await?;
            let lists = parse_schema(schema)?;
            let mut state = self.state.write().await;
            state.list_predicates.extend(lists);
            Ok(())
        })
        .await
    }

    async fn query(
        &self,
        ctx: &CallContext,
        query: &str,
        variables: &QueryVariables,
    ) -> Result<Vec<u8>, StoreError> {
        ctx.run("query", async {
            self.simulate("query").await?;
            let answer = self.state.read().await.answer(query, variables)?;
            self.queries.fetch_add(1, Ordering::SeqCst);
            serde_json::to_vec(&answer).map_err(|e| StoreError::decode("query answer", e))
        })
        .await
    }

    async fn mutate(
        &self,
        ctx: &CallContext,
        set_json: &[u8],
        commit_now: bool,
    ) -> Result<MutationResponse, StoreError> {
        if !commit_now {
            return Err(StoreError::rejected(
                "mutate",
                "only immediately committed mutations are supported",
            ));
        }
        ctx.run("mutate", async {
            let body: Value = serde_json::from_slice(set_json)
                .map_err(|e| StoreError::rejected("mutate", format!("invalid set JSON: {e}")))?;
            self.simulate("mutate").await?;

            let mut state = self.state.write().await;
            let mut staged = state.clone();
            let uids = MutationWriter::new(&mut staged).apply(&body)?;
            *state = staged;
            self.mutations.fetch_add(1, Ordering::SeqCst);
            debug!(assigned = uids.len(), "memory store mutation committed");
            Ok(MutationResponse { uids })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::queries::{decode_block, name_variables, FOOD_BY_NAME};
    use crate::graph::schema::SCHEMA;
    use foodlab_core::Food;
    use serde_json::json;

    fn bytes(value: &Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    #[tokio::test]
    async fn test_alter_accepts_schema() {
        let store = MemoryGraphStore::new();
        store.alter(&CallContext::background(), SCHEMA).await.unwrap();
        assert!(store.state.read().await.list_predicates.contains("measurement"));
        assert!(!store.state.read().await.list_predicates.contains("food"));
    }

    #[tokio::test]
    async fn test_alter_rejects_garbage() {
        let store = MemoryGraphStore::new();
        let ctx = CallContext::background();
        assert!(matches!(
            store.alter(&ctx, "name string index").await,
            Err(StoreError::Schema { .. })
        ));
        assert!(matches!(
            store.alter(&ctx, "   \n").await,
            Err(StoreError::Schema { .. })
        ));
        assert!(matches!(
            store.alter(&ctx, "type Food {\n  name\n").await,
            Err(StoreError::Schema { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_nodes_get_sequential_ids() {
        let store = MemoryGraphStore::new();
        let ctx = CallContext::background();
        let set = json!({
            "uid": "_:food_a",
            "dgraph.type": "Food",
            "name": "Apple",
            "measurement": [{ "uid": "_:m1", "dgraph.type": "FoodMeasurement", "unit": "medium", "value": 1.0 }]
        });
        let response = store.mutate(&ctx, &bytes(&set), true).await.unwrap();
        assert_eq!(response.uids["food_a"], "0x1");
        assert_eq!(response.uids["m1"], "0x2");
    }

    #[tokio::test]
    async fn test_eq_lookup_filters_by_type() {
        let store = MemoryGraphStore::new();
        let ctx = CallContext::background();
        let set = json!([
            { "uid": "_:r", "dgraph.type": "Recipe", "name": "Apple" },
            { "uid": "_:f", "dgraph.type": "Food", "name": "Apple" }
        ]);
        store.mutate(&ctx, &bytes(&set), true).await.unwrap();

        let answer = store
            .query(&ctx, FOOD_BY_NAME, &name_variables("Apple"))
            .await
            .unwrap();
        let foods: Vec<Food> = decode_block(&answer, "food").unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].id.as_ref().unwrap().as_str(), "0x2");
    }

    #[tokio::test]
    async fn test_references_link_existing_nodes() {
        let store = MemoryGraphStore::new();
        let ctx = CallContext::background();
        let nutrient = json!({ "uid": "_:n", "dgraph.type": "Nutrient", "name": "Potassium" });
        let id = store.mutate(&ctx, &bytes(&nutrient), true).await.unwrap().uids["n"].clone();

        let measurement = json!({
            "uid": "_:nm",
            "dgraph.type": "NutrientMeasurement",
            "nutrient": { "uid": id },
            "unit": "mg",
            "value": 620.0
        });
        store.mutate(&ctx, &bytes(&measurement), true).await.unwrap();
        assert_eq!(store.count_type("Nutrient").await, 1);

        let state = store.state.read().await;
        let expanded = state.expand(2, 0);
        assert_eq!(expanded["nutrient"]["name"], "Potassium");
    }

    #[tokio::test]
    async fn test_unknown_uid_rolls_back_whole_mutation() {
        let store = MemoryGraphStore::new();
        let ctx = CallContext::background();
        let set = json!([
            { "uid": "_:ok", "dgraph.type": "Nutrient", "name": "Iron" },
            { "uid": "0x99", "name": "ghost" }
        ]);
        assert!(matches!(
            store.mutate(&ctx, &bytes(&set), true).await,
            Err(StoreError::Rejected { .. })
        ));
        assert_eq!(store.count_type("Nutrient").await, 0);
        assert_eq!(store.mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_commit_later_is_rejected() {
        let store = MemoryGraphStore::new();
        let result = store
            .mutate(&CallContext::background(), b"{}", false)
            .await;
        assert!(matches!(result, Err(StoreError::Rejected { .. })));
    }

    #[tokio::test]
    async fn test_anyoftext_matches_any_term() {
        let store = MemoryGraphStore::new();
        let ctx = CallContext::background();
        let set = json!([
            { "dgraph.type": "Recipe", "name": "Mashed Potatoes" },
            { "dgraph.type": "Recipe", "name": "Apple Pie" },
            { "dgraph.type": "Recipe", "name": "Potato Salad" }
        ]);
        store.mutate(&ctx, &bytes(&set), true).await.unwrap();
        let query = "{ recipe(func: anyoftext(name, $name)) @filter(type(Recipe)) { uid name } }";
        let answer = store
            .query(&ctx, query, &name_variables("pie or salad"))
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&answer).unwrap();
        let names: Vec<&str> = value["recipe"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Apple Pie", "Potato Salad"]);
    }

    #[tokio::test]
    async fn test_unbound_variable_and_unknown_query() {
        let store = MemoryGraphStore::new();
        let ctx = CallContext::background();
        assert!(matches!(
            store.query(&ctx, FOOD_BY_NAME, &QueryVariables::new()).await,
            Err(StoreError::Rejected { .. })
        ));
        assert!(matches!(
            store.query(&ctx, "{ q(func: has(name)) { uid } }", &QueryVariables::new()).await,
            Err(StoreError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let store = MemoryGraphStore::new();
        store.set_available(false);
        let result = store
            .query(&CallContext::background(), FOOD_BY_NAME, &name_variables("Apple"))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable { .. })));
        assert!(result.unwrap_err().is_retryable());
    }
}
