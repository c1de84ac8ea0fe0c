//! Blacklist store trait defining the interface for revocation persistence.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::blacklist_entry::{
    BlacklistReason, TokenBlacklistEntry, TokenKind,
};
use crate::errors::DomainResult;

/// Per-user blacklist aggregates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBlacklistStats {
    /// Every entry ever recorded for the user (still present in the store)
    pub total_blacklisted: usize,
    /// Entries whose underlying token has not yet expired naturally
    pub active: usize,
    /// Entries with a security-related reason
    pub security_related: usize,
    /// Entries with a user-initiated reason
    pub user_initiated: usize,
    /// Entries for access tokens
    pub access_tokens: usize,
    /// Entries for refresh tokens
    pub refresh_tokens: usize,
}

/// Store-wide blacklist aggregates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistStoreStats {
    /// Total entries in the store
    pub total: usize,
    /// Entries already past their underlying token expiry
    pub expired: usize,
    /// Earliest `blacklisted_at` among stored entries
    pub oldest_entry: Option<DateTime<Utc>>,
    /// Latest `blacklisted_at` among stored entries
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Store contract for TokenBlacklistEntry persistence
///
/// jti uniqueness is enforced by the store. A duplicate insert is a benign
/// no-op (revocation is idempotent), reported through the `bool` return
/// rather than an error. Storage failures, including timeouts, surface as
/// `StorageError`, never as a silent "not blacklisted".
#[async_trait]
pub trait BlacklistStore: Send + Sync {
    /// Record a revocation
    ///
    /// # Returns
    /// * `Ok(true)` - Entry stored
    /// * `Ok(false)` - An entry with this jti already exists; nothing changed
    async fn add(&self, entry: TokenBlacklistEntry) -> DomainResult<bool>;

    /// Look up a single entry by jti
    async fn find_by_jti(&self, jti: &str) -> DomainResult<Option<TokenBlacklistEntry>>;

    /// Whether a jti has been revoked
    ///
    /// Called on every authenticated request; implementations should keep
    /// this a single indexed lookup.
    async fn is_blacklisted(&self, jti: &str) -> DomainResult<bool> {
        Ok(self.find_by_jti(jti).await?.is_some())
    }

    /// Every entry recorded for a user
    async fn find_by_user_id(&self, user_id: i64) -> DomainResult<Vec<TokenBlacklistEntry>>;

    /// Every entry for one half of the token pair
    async fn find_by_token_kind(&self, kind: TokenKind) -> DomainResult<Vec<TokenBlacklistEntry>>;

    /// Every entry recorded with a given reason
    async fn find_by_reason(&self, reason: BlacklistReason)
        -> DomainResult<Vec<TokenBlacklistEntry>>;

    /// Record several revocations, skipping duplicates
    ///
    /// # Returns
    /// * `Ok(count)` - Number of entries actually inserted
    async fn batch_add(&self, entries: Vec<TokenBlacklistEntry>) -> DomainResult<usize>;

    /// Check several jtis at once
    ///
    /// # Returns
    /// A map with one entry per requested jti.
    async fn batch_is_blacklisted(
        &self,
        jtis: &[String],
    ) -> DomainResult<HashMap<String, bool>>;

    /// Remove several entries by jti
    ///
    /// # Returns
    /// * `Ok(count)` - Number of rows actually removed
    async fn batch_remove(&self, jtis: &[String]) -> DomainResult<usize>;

    /// Remove every entry whose underlying token expired at or before `before`
    async fn remove_expired(&self, before: DateTime<Utc>) -> DomainResult<usize>;

    /// Oldest entries first, capped at `limit`
    ///
    /// Feed for budget-bounded cleanup: the service orders the returned
    /// window by cleanup priority before deleting.
    async fn find_cleanup_candidates(
        &self,
        limit: usize,
    ) -> DomainResult<Vec<TokenBlacklistEntry>>;

    /// Aggregates for one user
    async fn user_stats(&self, user_id: i64) -> DomainResult<UserBlacklistStats>;

    /// Aggregates for the whole store
    async fn global_stats(&self) -> DomainResult<BlacklistStoreStats>;
}
