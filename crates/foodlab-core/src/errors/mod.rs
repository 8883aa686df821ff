// ABOUTME: Unified error handling for foodlab with stable error codes
// ABOUTME: Wraps store, aggregation, and collaborator failures with operation context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodlab Contributors

//! # Unified Error Handling
//!
//! Layer-specific errors (`StoreError`, `NutritionError`) keep their structure
//! for callers that match on them. Everything that crosses a component
//! boundary is converted into `AppError`, which carries a stable
//! [`ErrorCode`], a message with operation context, and the source chain.

/// Nutrition aggregation errors
pub mod nutrition;
/// Graph store errors
pub mod store;

pub use nutrition::NutritionError;
pub use store::StoreError;

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Standard error codes used throughout foodlab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "DUPLICATE_KEY_RACE")]
    DuplicateKeyRace = 4001,

    // External Services (5000-5999)
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    #[serde(rename = "STORE_UNAVAILABLE")]
    StoreUnavailable = 5001,
    #[serde(rename = "STORE_REJECTED")]
    StoreRejected = 5002,
    #[serde(rename = "SCHEMA_ERROR")]
    SchemaError = 5003,
    #[serde(rename = "OPERATION_CANCELLED")]
    OperationCancelled = 5004,
    #[serde(rename = "DEADLINE_EXCEEDED")]
    DeadlineExceeded = 5005,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Data quality (7000-7999)
    #[serde(rename = "UNIT_NOT_FOUND")]
    UnitNotFound = 7000,
    #[serde(rename = "UNIT_MISMATCH")]
    UnitMismatch = 7001,
    #[serde(rename = "INVALID_MEASUREMENT")]
    InvalidMeasurement = 7002,
    #[serde(rename = "INCOMPLETE_GRAPH")]
    IncompleteGraph = 7003,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DECODE_ERROR")]
    DecodeError = 9001,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::DuplicateKeyRace => "Concurrent upserts created duplicate nodes",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::StoreUnavailable => "The graph store is unavailable",
            Self::StoreRejected => "The graph store rejected the request",
            Self::SchemaError => "The graph store rejected the schema",
            Self::OperationCancelled => "The operation was cancelled",
            Self::DeadlineExceeded => "The operation exceeded its deadline",
            Self::ConfigError => "Configuration error encountered",
            Self::UnitNotFound => "No food measurement matches the ingredient unit",
            Self::UnitMismatch => "Nutrient contributions use different units",
            Self::InvalidMeasurement => "A food measurement has an unusable reference quantity",
            Self::IncompleteGraph => "The recipe graph is missing a referenced node",
            Self::InternalError => "An internal error occurred",
            Self::DecodeError => "A response could not be decoded",
        }
    }

    /// Whether an operation failing with this code may succeed if retried
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable | Self::DeadlineExceeded)
    }
}

/// Unified error type for foodlab
#[derive(Debug)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Prefix the message with the operation that failed
    #[must_use]
    pub fn context(mut self, operation: impl fmt::Display) -> Self {
        self.message = format!("{operation}: {}", self.message);
        self
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Response decoding error
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DecodeError, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        let code = match &error {
            StoreError::Unavailable { .. } => ErrorCode::StoreUnavailable,
            StoreError::Schema { .. } => ErrorCode::SchemaError,
            StoreError::Decode { .. } => ErrorCode::DecodeError,
            StoreError::Rejected { .. } => ErrorCode::StoreRejected,
            StoreError::DuplicateKeyRace { .. } => ErrorCode::DuplicateKeyRace,
            StoreError::Cancelled { .. } => ErrorCode::OperationCancelled,
            StoreError::DeadlineExceeded { .. } => ErrorCode::DeadlineExceeded,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<NutritionError> for AppError {
    fn from(error: NutritionError) -> Self {
        let code = match &error {
            NutritionError::UnitNotFound { .. } => ErrorCode::UnitNotFound,
            NutritionError::UnitMismatch { .. } => ErrorCode::UnitMismatch,
            NutritionError::InvalidMeasurement { .. } => ErrorCode::InvalidMeasurement,
            NutritionError::MissingFood { .. } | NutritionError::MissingNutrient { .. } => {
                ErrorCode::IncompleteGraph
            }
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_code() {
        let error: AppError = StoreError::unavailable("query", "connection refused").into();
        assert_eq!(error.code, ErrorCode::StoreUnavailable);
        assert!(error.code.is_retryable());
        assert!(error.message.contains("query"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_nutrition_error_maps_to_code() {
        let error: AppError = NutritionError::UnitNotFound {
            food: "Potato".into(),
            unit: "tbsp".into(),
        }
        .into();
        assert_eq!(error.code, ErrorCode::UnitNotFound);
        assert!(!error.code.is_retryable());
        assert!(error.to_string().contains("Potato"));
    }

    #[test]
    fn test_context_prefixes_message() {
        let error = AppError::invalid_input("empty name").context("adding recipe");
        assert_eq!(error.message, "adding recipe: empty name");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::DuplicateKeyRace).unwrap();
        assert_eq!(json, "\"DUPLICATE_KEY_RACE\"");
    }
}
