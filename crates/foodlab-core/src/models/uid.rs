// ABOUTME: Node identifier that is either a store-assigned id or a `_:<key>` placeholder
// ABOUTME: Placeholders correlate uncommitted nodes with the ids a mutation assigns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a placeholder (blank node) identifier
pub const PLACEHOLDER_PREFIX: &str = "_:";

/// Identifier of a graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Wrap a store-assigned id such as `0x1a`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build a placeholder id for the given content key
    #[must_use]
    pub fn placeholder(key: &str) -> Self {
        Self(format!("{PLACEHOLDER_PREFIX}{key}"))
    }

    /// Whether this id still awaits assignment by the store
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(PLACEHOLDER_PREFIX)
    }

    /// The content key of a placeholder, `None` for assigned ids
    #[must_use]
    pub fn placeholder_key(&self) -> Option<&str> {
        self.0.strip_prefix(PLACEHOLDER_PREFIX)
    }

    /// Raw identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_round_trip() {
        let uid = Uid::placeholder("food_abc");
        assert!(uid.is_placeholder());
        assert_eq!(uid.placeholder_key(), Some("food_abc"));
        assert_eq!(uid.as_str(), "_:food_abc");
    }

    #[test]
    fn test_assigned_id_is_not_placeholder() {
        let uid = Uid::new("0x1");
        assert!(!uid.is_placeholder());
        assert_eq!(uid.placeholder_key(), None);
    }
}
