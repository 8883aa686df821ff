// ABOUTME: Normalizes reference predicates returned as a bare object or a one-element list
// ABOUTME: Used with serde `deserialize_with` on the `food` and `nutrient` fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! Reference decoding.
//!
//! Depending on the query shape and predicate schema, the store returns a
//! single-valued edge either as `{"uid": ...}` or as `[{"uid": ...}]`. Both
//! are accepted and normalized to one optional value; extra list elements are
//! ignored.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    // List must be tried first: derived structs also accept sequences
    Many(Vec<T>),
    One(T),
}

/// Deserialize an optional reference from either an object or a list
///
/// # Errors
///
/// Returns an error if the value is neither `null`, an object of `T`, nor a
/// list of `T`.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(
        match Option::<OneOrMany<T>>::deserialize(deserializer)? {
            None => None,
            Some(OneOrMany::One(value)) => Some(value),
            Some(OneOrMany::Many(values)) => values.into_iter().next(),
        },
    )
}
