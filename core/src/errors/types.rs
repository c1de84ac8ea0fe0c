//! Domain-specific error types for session and token lifecycle operations.
//!
//! Authentication failures are deliberately coarse: callers see a single
//! generic `AuthenticationFailed` so that a response cannot be used as an
//! oracle to distinguish a wrong password from an unknown user or a rotated
//! refresh token. The finer-grained `TokenError` variants exist for internal
//! logging and are mapped to the generic class at the service boundary.

use thiserror::Error;

/// Authentication-related errors surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication failed")]
    AuthenticationFailed,
}

/// Token-related errors
///
/// These describe why a signer rejected a token. They are never returned
/// from `AuthenticationService` directly; see the module docs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token claims")]
    InvalidClaims,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Input validation errors raised at value-object construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Out of range: {field} (min: {min}, max: {max})")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    #[error("Invalid length: {field} (max: {max}, actual: {actual})")]
    InvalidLength {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Reserved claim name: {claim}")]
    ReservedClaim { claim: String },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },
}

/// Persistence-layer errors
///
/// Kept distinct from [`AuthError`] so a store outage is never mistaken for
/// a rejected credential. Timeouts propagate as errors, never as a silent
/// "not found".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Store operation timed out: {operation}")]
    Timeout { operation: String },

    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_message_is_generic() {
        let error = AuthError::AuthenticationFailed;
        assert_eq!(error.to_string(), "Authentication failed");
    }

    #[test]
    fn validation_error_includes_field() {
        let error = ValidationError::RequiredField {
            field: "user_agent".to_string(),
        };
        assert!(error.to_string().contains("user_agent"));
    }

    #[test]
    fn storage_error_duplicate_key() {
        let error = StorageError::DuplicateKey {
            key: "jti-123".to_string(),
        };
        assert!(error.to_string().contains("jti-123"));
    }
}
