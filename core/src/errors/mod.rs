//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, StorageError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DomainError {
    /// Whether this error originated in the persistence layer.
    ///
    /// The blacklist hot path uses this to apply its fail-closed/fail-open
    /// policy to storage failures only.
    pub fn is_storage(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
