// Copyright 2025 Cowboy AI, LLC.

//! Error types for mixin composition and object operations

use thiserror::Error;

/// Errors that can occur while composing types or operating on objects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixinError {
    /// A composition was requested with no constituent types
    #[error("Empty composition: at least one constituent type is required")]
    EmptyComposition,

    /// A type's construction procedure failed
    #[error("Construction failed: {type_name} - {reason}")]
    ConstructionFailed {
        /// Name of the type whose construction failed
        type_name: String,
        /// Why construction failed
        reason: String,
    },

    /// No operation with this name is reachable from the object
    #[error("Operation not found: {operation} on {type_name}")]
    OperationNotFound {
        /// Name of the receiver's type
        type_name: String,
        /// Operation that was looked up
        operation: String,
    },

    /// An operation was called with an argument it cannot accept
    #[error("Invalid argument for {operation}: {reason}")]
    InvalidArgument {
        /// Operation that rejected the argument
        operation: String,
        /// Why the argument was rejected
        reason: String,
    },

    /// A value did not have the expected shape
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected value kind
        expected: String,
        /// Actual value kind
        found: String,
    },

    /// Composition options failed validation or parsing
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Generic error
    #[error("Mixin error: {0}")]
    Generic(String),
}

/// Result type for mixin operations
pub type MixinResult<T> = Result<T, MixinError>;

impl From<serde_json::Error> for MixinError {
    fn from(err: serde_json::Error) -> Self {
        MixinError::InvalidOptions(err.to_string())
    }
}

impl MixinError {
    /// Create a generic mixin error
    pub fn generic(msg: impl Into<String>) -> Self {
        MixinError::Generic(msg.into())
    }

    /// Create a construction failure for the named type
    pub fn construction_failed(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        MixinError::ConstructionFailed {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error for the named operation
    pub fn invalid_argument(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        MixinError::InvalidArgument {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, MixinError::OperationNotFound { .. })
    }

    /// Check if this error came out of a construction procedure
    pub fn is_construction_error(&self) -> bool {
        matches!(self, MixinError::ConstructionFailed { .. })
    }
}
