//! Business logic layer over the blacklist store

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::value_objects::blacklist_entry::{
    BlacklistReason, TokenBlacklistEntry, TokenKind,
};
use crate::errors::DomainResult;
use crate::repositories::blacklist::BlacklistStore;

use super::config::{BlacklistCheckPolicy, BlacklistServiceConfig};

/// Parameters for one revocation
#[derive(Debug, Clone)]
pub struct BlacklistRequest {
    pub jti: String,
    pub token_kind: TokenKind,
    /// Original expiry of the token being revoked
    pub expires_at: DateTime<Utc>,
    pub reason: BlacklistReason,
    pub user_id: Option<i64>,
    pub device_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl BlacklistRequest {
    pub fn new(
        jti: String,
        token_kind: TokenKind,
        expires_at: DateTime<Utc>,
        reason: BlacklistReason,
    ) -> Self {
        Self {
            jti,
            token_kind,
            expires_at,
            reason,
            user_id: None,
            device_id: None,
            metadata: None,
        }
    }

    fn into_entry(self) -> DomainResult<TokenBlacklistEntry> {
        TokenBlacklistEntry::from_parts(
            self.jti,
            self.token_kind,
            self.expires_at,
            Utc::now(),
            self.reason,
            self.user_id,
            self.device_id,
            self.metadata,
        )
    }
}

/// Result of an unordered expiry purge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOutcome {
    /// Entries removed because their underlying token had expired
    pub expired_cleaned: usize,
}

/// Point-in-time blacklist counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistStatistics {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Health snapshot: the counters plus whether the store answered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistHealth {
    pub total_blacklisted: usize,
    pub expired_count: usize,
    pub active_count: usize,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Business layer over [`BlacklistStore`]: revoke, check, purge, report
pub struct BlacklistService<B: BlacklistStore> {
    store: Arc<B>,
    config: BlacklistServiceConfig,
}

impl<B: BlacklistStore> BlacklistService<B> {
    /// Creates a service over a store with explicit configuration
    pub fn new(store: Arc<B>, config: BlacklistServiceConfig) -> Self {
        Self { store, config }
    }

    /// Creates a service with the default (fail-closed) configuration
    pub fn with_defaults(store: Arc<B>) -> Self {
        Self::new(store, BlacklistServiceConfig::default())
    }

    /// Records a revocation
    ///
    /// # Returns
    /// * `Ok(true)` - The token is now blacklisted
    /// * `Ok(false)` - It already was; revocation is idempotent
    /// * `Err(ValidationError)` - The request does not form a valid entry
    /// * `Err(StorageError)` - The store could not be reached
    pub async fn blacklist_token(&self, request: BlacklistRequest) -> DomainResult<bool> {
        let jti = request.jti.clone();
        let reason = request.reason;
        let entry = request.into_entry()?;

        let inserted = self.store.add(entry).await?;
        if inserted {
            info!(jti = %jti, reason = %reason, "token blacklisted");
        } else {
            debug!(jti = %jti, "token already blacklisted");
        }

        Ok(inserted)
    }

    /// Records several revocations, skipping duplicates
    pub async fn blacklist_tokens(&self, requests: Vec<BlacklistRequest>) -> DomainResult<usize> {
        if requests.is_empty() {
            return Ok(0);
        }

        let entries = requests
            .into_iter()
            .map(BlacklistRequest::into_entry)
            .collect::<DomainResult<Vec<_>>>()?;

        let inserted = self.store.batch_add(entries).await?;
        info!(inserted, "batch blacklist completed");
        Ok(inserted)
    }

    /// Hot-path check, storage errors propagated to the caller
    pub async fn is_token_blacklisted(&self, jti: &str) -> DomainResult<bool> {
        self.store.is_blacklisted(jti).await
    }

    /// Hot-path check with the configured failure policy applied
    pub async fn check_blacklisted(&self, jti: &str) -> DomainResult<bool> {
        self.check_blacklisted_with_policy(jti, self.config.check_policy)
            .await
    }

    /// Hot-path check with an explicit failure policy
    ///
    /// Storage failures resolve per policy; every other error propagates.
    pub async fn check_blacklisted_with_policy(
        &self,
        jti: &str,
        policy: BlacklistCheckPolicy,
    ) -> DomainResult<bool> {
        match self.store.is_blacklisted(jti).await {
            Ok(blacklisted) => Ok(blacklisted),
            Err(error) if error.is_storage() => match policy {
                BlacklistCheckPolicy::FailClosed => {
                    warn!(jti = %jti, %error, "blacklist store failed, failing closed");
                    Ok(true)
                }
                BlacklistCheckPolicy::FailOpen => {
                    warn!(jti = %jti, %error, "blacklist store failed, failing open");
                    Ok(false)
                }
            },
            Err(error) => Err(error),
        }
    }

    /// Checks several jtis at once; empty input never touches the store
    pub async fn batch_check_blacklist(
        &self,
        jtis: &[String],
    ) -> DomainResult<HashMap<String, bool>> {
        if jtis.is_empty() {
            return Ok(HashMap::new());
        }
        self.store.batch_is_blacklisted(jtis).await
    }

    /// Purges every entry whose underlying token has already expired
    ///
    /// Unordered: when everything eligible goes, priority is irrelevant.
    pub async fn auto_cleanup(&self) -> DomainResult<CleanupOutcome> {
        let expired_cleaned = self.store.remove_expired(Utc::now()).await?;
        if expired_cleaned > 0 {
            info!(expired_cleaned, "blacklist auto-cleanup removed expired entries");
        }
        Ok(CleanupOutcome { expired_cleaned })
    }

    /// Purges at most `budget` entries, highest cleanup priority first
    ///
    /// Fetches an oldest-first candidate window, orders it by
    /// `(priority, blacklisted_at)` and removes the front of the queue.
    ///
    /// # Returns
    /// * `Ok(count)` - Entries actually removed
    pub async fn cleanup_with_budget(&self, budget: usize) -> DomainResult<usize> {
        if budget == 0 {
            return Ok(0);
        }

        let window = budget.saturating_mul(self.config.cleanup_fetch_factor.max(1));
        let candidates = self.store.find_cleanup_candidates(window).await?;
        let plan = plan_cleanup(candidates, budget);
        if plan.is_empty() {
            return Ok(0);
        }

        let removed = self.store.batch_remove(&plan).await?;
        info!(removed, budget, "budgeted blacklist cleanup completed");
        Ok(removed)
    }

    /// Current counters derived from store aggregates
    pub async fn statistics(&self) -> DomainResult<BlacklistStatistics> {
        let stats = self.store.global_stats().await?;
        Ok(BlacklistStatistics {
            total: stats.total,
            active: stats.total - stats.expired,
            expired: stats.expired,
            oldest_entry: stats.oldest_entry,
            newest_entry: stats.newest_entry,
        })
    }

    /// Health snapshot for monitoring endpoints
    pub async fn health_status(&self) -> DomainResult<BlacklistHealth> {
        let stats = self.store.global_stats().await?;
        Ok(BlacklistHealth {
            total_blacklisted: stats.total,
            expired_count: stats.expired,
            active_count: stats.total - stats.expired,
            oldest_entry: stats.oldest_entry,
            newest_entry: stats.newest_entry,
        })
    }

    /// Per-user aggregates
    pub async fn user_statistics(
        &self,
        user_id: i64,
    ) -> DomainResult<crate::repositories::blacklist::UserBlacklistStats> {
        self.store.user_stats(user_id).await
    }
}

/// Orders candidates for a budget-bounded purge
///
/// Priority tiers first (expired entries before security-related before
/// user-initiated before the rest), oldest `blacklisted_at` first inside a
/// tier, truncated to the budget.
pub fn plan_cleanup(mut candidates: Vec<TokenBlacklistEntry>, budget: usize) -> Vec<String> {
    candidates.sort_by(|a, b| {
        a.cleanup_priority()
            .cmp(&b.cleanup_priority())
            .then(a.blacklisted_at.cmp(&b.blacklisted_at))
    });
    candidates
        .into_iter()
        .take(budget)
        .map(|entry| entry.jti)
        .collect()
}
