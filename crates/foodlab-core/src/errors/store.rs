// ABOUTME: Error taxonomy for graph store RPCs (alter, query, mutate)
// ABOUTME: Distinguishes retryable transport failures from protocol drift and rejections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

use std::fmt::Display;

/// Errors raised by a graph store or by decoding its responses
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Transport or RPC failure; retryable
    #[error("graph store unavailable during {operation}: {message}")]
    Unavailable {
        /// Store operation that failed
        operation: &'static str,
        /// Transport error description
        message: String,
    },

    /// Schema alteration rejected; fatal at startup
    #[error("graph store rejected schema: {message}")]
    Schema {
        /// Rejection reason reported by the store
        message: String,
    },

    /// Response body could not be decoded into the expected shape
    #[error("failed to decode {context}: {message}")]
    Decode {
        /// What was being decoded
        context: String,
        /// Decoder error description
        message: String,
    },

    /// Store answered but refused the query or mutation
    #[error("graph store rejected {operation}: {message}")]
    Rejected {
        /// Store operation that was refused
        operation: &'static str,
        /// Rejection reason reported by the store
        message: String,
    },

    /// More than one node exists for a natural key after an upsert
    #[error("duplicate {kind} nodes for natural key '{key}': {}", .ids.join(", "))]
    DuplicateKeyRace {
        /// Entity kind (food, nutrient)
        kind: &'static str,
        /// Natural key value
        key: String,
        /// Ids of every node sharing the key
        ids: Vec<String>,
    },

    /// Caller cancelled the operation
    #[error("{operation} was cancelled")]
    Cancelled {
        /// Store operation that was cancelled
        operation: &'static str,
    },

    /// Caller deadline elapsed before the store answered
    #[error("{operation} exceeded its deadline")]
    DeadlineExceeded {
        /// Store operation that timed out
        operation: &'static str,
    },
}

impl StoreError {
    /// Create an `Unavailable` error
    #[must_use]
    pub fn unavailable(operation: &'static str, message: impl Display) -> Self {
        Self::Unavailable {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a `Decode` error
    #[must_use]
    pub fn decode(context: impl Into<String>, message: impl Display) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a `Rejected` error
    #[must_use]
    pub fn rejected(operation: &'static str, message: impl Display) -> Self {
        Self::Rejected {
            operation,
            message: message.to_string(),
        }
    }

    /// Whether retrying the same call may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::DeadlineExceeded { .. }
        )
    }
}
