// ABOUTME: Environment variable names, defaults, and graph type names used across foodlab
// ABOUTME: Centralizes configuration keys so no credentials or addresses are compiled in
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

/// Environment variable keys
pub mod env_config {
    /// Base URL of the Dgraph HTTP endpoint
    pub const DGRAPH_URL: &str = "FOODLAB_DGRAPH_URL";
    /// Optional Dgraph access token
    pub const DGRAPH_TOKEN: &str = "FOODLAB_DGRAPH_TOKEN";
    /// Per-request store timeout
    pub const STORE_TIMEOUT_SECS: &str = "FOODLAB_STORE_TIMEOUT_SECS";
    /// Store connect timeout
    pub const STORE_CONNECT_TIMEOUT_SECS: &str = "FOODLAB_STORE_CONNECT_TIMEOUT_SECS";
    /// Retry budget for read-only store queries
    pub const STORE_QUERY_RETRIES: &str = "FOODLAB_STORE_QUERY_RETRIES";
    /// Re-query natural keys after creation to surface duplicates
    pub const UPSERT_VERIFY: &str = "FOODLAB_UPSERT_VERIFY";
    /// NDB API key
    pub const NDB_API_KEY: &str = "NDB_API_KEY";
    /// NDB API base URL
    pub const NDB_BASE_URL: &str = "NDB_BASE_URL";
    /// NDB search page size
    pub const NDB_PAGE_SIZE: &str = "NDB_PAGE_SIZE";
    /// NDB report cache TTL
    pub const NDB_CACHE_TTL_SECS: &str = "NDB_CACHE_TTL_SECS";
    /// NDB requests allowed per minute
    pub const NDB_RATE_LIMIT_PER_MINUTE: &str = "NDB_RATE_LIMIT_PER_MINUTE";
}

/// Default values for configuration
pub mod defaults {
    /// Local Dgraph alpha HTTP port
    pub const DGRAPH_URL: &str = "http://localhost:8080";
    /// Store request timeout in seconds
    pub const STORE_TIMEOUT_SECS: u64 = 30;
    /// Store connect timeout in seconds
    pub const STORE_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Retries for read-only queries
    pub const STORE_QUERY_RETRIES: u32 = 2;
    /// Initial backoff between query retries
    pub const STORE_RETRY_BACKOFF_MS: u64 = 200;
    /// NDB API base URL
    pub const NDB_BASE_URL: &str = "https://api.nal.usda.gov/ndb";
    /// NDB search page size
    pub const NDB_PAGE_SIZE: usize = 50;
    /// NDB report cache TTL (24 hours)
    pub const NDB_CACHE_TTL_SECS: u64 = 86_400;
    /// NDB requests per minute
    pub const NDB_RATE_LIMIT_PER_MINUTE: u32 = 30;
}

/// Dgraph type names written as `dgraph.type` on every node
pub mod graph_types {
    /// Recipe node type
    pub const RECIPE: &str = "Recipe";
    /// Ingredient node type
    pub const INGREDIENT: &str = "Ingredient";
    /// Instruction node type
    pub const INSTRUCTION: &str = "Instruction";
    /// Food node type
    pub const FOOD: &str = "Food";
    /// Food measurement node type
    pub const FOOD_MEASUREMENT: &str = "FoodMeasurement";
    /// Nutrient measurement node type
    pub const NUTRIENT_MEASUREMENT: &str = "NutrientMeasurement";
    /// Nutrient node type
    pub const NUTRIENT: &str = "Nutrient";
}

/// Placeholder used in content keys when a referenced entity is absent
pub const ABSENT_REFERENCE_SENTINEL: &str = "_";
