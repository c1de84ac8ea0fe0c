//! Refresh-token store trait defining the interface for session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::refresh_token::RefreshTokenRecord;
use crate::errors::DomainResult;

/// Store contract for RefreshTokenRecord persistence
///
/// One row per active session per device, uniquely keyed by jti. The store
/// enforces jti uniqueness itself (unique constraint or equivalent); the
/// services never take application-level locks around it.
///
/// # Concurrency
/// `delete_by_jti` is the rotation race arbiter: when two refreshes present
/// the same token concurrently, exactly one delete reports `true` and only
/// that caller may create the replacement record.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new session record
    ///
    /// # Returns
    /// * `Ok(())` - Record stored
    /// * `Err(StorageError::DuplicateKey)` - A record with this jti already
    ///   exists. jtis are v4 UUIDs, so this is an integrity violation, not
    ///   a benign race.
    async fn create(&self, record: RefreshTokenRecord) -> DomainResult<()>;

    /// All session records for a user, one per device
    async fn find_by_user_id(&self, user_id: i64) -> DomainResult<Vec<RefreshTokenRecord>>;

    /// Whether a record with this jti exists
    async fn exists_by_jti(&self, jti: &str) -> DomainResult<bool>;

    /// Delete the record with this jti, reporting whether a row was removed
    ///
    /// # Returns
    /// * `Ok(true)` - The row existed and was deleted by this call
    /// * `Ok(false)` - No row with this jti (already rotated or revoked)
    async fn delete_by_jti(&self, jti: &str) -> DomainResult<bool>;

    /// Delete every record whose expiry is at or before `before`
    ///
    /// Invoked by periodic cleanup; safe to run concurrently with normal
    /// traffic since fresh inserts are always future-dated.
    async fn delete_expired(&self, before: DateTime<Utc>) -> DomainResult<usize>;
}
