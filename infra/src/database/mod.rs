//! Database access: connection pooling and MySQL store implementations.

pub mod connection;
pub mod mysql;

/// Maps a SQLx failure into the domain storage-error taxonomy
///
/// Pool exhaustion surfaces as a timeout so the services can distinguish
/// "slow" from "down"; everything else is reported unavailable with the
/// failing operation named.
pub(crate) fn map_sqlx_error(operation: &str, error: sqlx::Error) -> sentra_core::errors::DomainError {
    use sentra_core::errors::StorageError;

    match error {
        sqlx::Error::PoolTimedOut => StorageError::Timeout {
            operation: operation.to_string(),
        }
        .into(),
        other => StorageError::Unavailable {
            message: format!("{}: {}", operation, other),
        }
        .into(),
    }
}
