//! Error taxonomy shared by every layer.

use serde::Serialize;
use thiserror::Error;

/// Coarse error category. The HTTP boundary maps each kind to exactly one status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range input. Always caller-caused, never retried.
    ValidationFailed,
    /// A referenced entity is absent.
    NotFound,
    /// A uniqueness rule was violated.
    Conflict,
    /// The caller could not be identified.
    Unauthorized,
    /// The caller is known but lacks the required role.
    Forbidden,
    /// Persistence or serialization failure not attributable to the caller.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Internal => "internal",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed field check, preserved so callers can point at the bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failure reported by a repository.
///
/// Uniqueness and referential integrity are detected by the store itself
/// (unique indexes / conditional writes), so they surface here rather than
/// through a separate existence query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key rejected the write (referenced row missing).
    #[error("foreign key violated: {0}")]
    ForeignKeyViolation(String),

    /// The store could not serve the request (connection, pool, decode, poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
