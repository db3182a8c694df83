//! Domain error model.

use thiserror::Error;
use uuid::Uuid;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// These are logic/data failures: the ledger never retries them and never
/// commits anything once one has been raised. The request boundary decides how
/// to present them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An ancestor walk visited the same node twice.
    #[error("there seems to be a circle inside the ancestors at {0}")]
    CircleDetected(Uuid),

    /// A required linked record is missing.
    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    /// An operation was invoked with arguments it cannot act on.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Storage items of different parts were combined.
    #[error("parts mismatch: {0}")]
    PartsMismatch(String),

    /// A single input field was rejected; callers display it next to `field`.
    #[error("{field}: {message}")]
    FieldValidation { field: &'static str, message: String },

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The persistence collaborator failed.
    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn reference_not_found(kind: &str, id: impl core::fmt::Display) -> Self {
        Self::ReferenceNotFound(format!("{kind} {id}"))
    }

    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub fn parts_mismatch(msg: impl Into<String>) -> Self {
        Self::PartsMismatch(msg.into())
    }

    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::FieldValidation {
            field,
            message: message.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// The field a validation failure is scoped to, if any.
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            Self::FieldValidation { field, .. } => Some(field),
            _ => None,
        }
    }
}
