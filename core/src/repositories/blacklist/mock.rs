//! Mock implementation of BlacklistStore for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::value_objects::blacklist_entry::{
    BlacklistReason, TokenBlacklistEntry, TokenKind,
};
use crate::errors::{DomainResult, StorageError};

use super::r#trait::{BlacklistStore, BlacklistStoreStats, UserBlacklistStats};

/// In-memory blacklist store for testing
///
/// `fail_next` makes every operation after the switch return a storage
/// error, for exercising the fail-open/fail-closed policies.
pub struct MockBlacklistStore {
    entries: Arc<RwLock<HashMap<String, TokenBlacklistEntry>>>,
    fail: Arc<RwLock<bool>>,
}

impl MockBlacklistStore {
    /// Create a new mock store
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Make every subsequent operation fail with a storage error
    pub async fn set_failing(&self, failing: bool) {
        *self.fail.write().await = failing;
    }

    /// Number of entries currently held
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn check_available(&self) -> DomainResult<()> {
        if *self.fail.read().await {
            return Err(StorageError::Unavailable {
                message: "mock store set to fail".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for MockBlacklistStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlacklistStore for MockBlacklistStore {
    async fn add(&self, entry: TokenBlacklistEntry) -> DomainResult<bool> {
        self.check_available().await?;
        let mut entries = self.entries.write().await;

        if entries.contains_key(&entry.jti) {
            return Ok(false);
        }

        entries.insert(entry.jti.clone(), entry);
        Ok(true)
    }

    async fn find_by_jti(&self, jti: &str) -> DomainResult<Option<TokenBlacklistEntry>> {
        self.check_available().await?;
        let entries = self.entries.read().await;
        Ok(entries.get(jti).cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> DomainResult<Vec<TokenBlacklistEntry>> {
        self.check_available().await?;
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|e| e.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn find_by_token_kind(&self, kind: TokenKind) -> DomainResult<Vec<TokenBlacklistEntry>> {
        self.check_available().await?;
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|e| e.token_kind == kind)
            .cloned()
            .collect())
    }

    async fn find_by_reason(
        &self,
        reason: BlacklistReason,
    ) -> DomainResult<Vec<TokenBlacklistEntry>> {
        self.check_available().await?;
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|e| e.reason == reason)
            .cloned()
            .collect())
    }

    async fn batch_add(&self, new_entries: Vec<TokenBlacklistEntry>) -> DomainResult<usize> {
        self.check_available().await?;
        let mut entries = self.entries.write().await;
        let mut inserted = 0;

        for entry in new_entries {
            if !entries.contains_key(&entry.jti) {
                entries.insert(entry.jti.clone(), entry);
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    async fn batch_is_blacklisted(
        &self,
        jtis: &[String],
    ) -> DomainResult<HashMap<String, bool>> {
        self.check_available().await?;
        let entries = self.entries.read().await;
        Ok(jtis
            .iter()
            .map(|jti| (jti.clone(), entries.contains_key(jti)))
            .collect())
    }

    async fn batch_remove(&self, jtis: &[String]) -> DomainResult<usize> {
        self.check_available().await?;
        let mut entries = self.entries.write().await;
        let mut removed = 0;

        for jti in jtis {
            if entries.remove(jti).is_some() {
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn remove_expired(&self, before: DateTime<Utc>) -> DomainResult<usize> {
        self.check_available().await?;
        let mut entries = self.entries.write().await;
        let initial_count = entries.len();

        entries.retain(|_, entry| entry.expires_at > before);

        Ok(initial_count - entries.len())
    }

    async fn find_cleanup_candidates(
        &self,
        limit: usize,
    ) -> DomainResult<Vec<TokenBlacklistEntry>> {
        self.check_available().await?;
        let entries = self.entries.read().await;
        let mut candidates: Vec<TokenBlacklistEntry> = entries.values().cloned().collect();
        candidates.sort_by_key(|e| e.blacklisted_at);
        candidates.truncate(limit);
        Ok(candidates)
    }

    async fn user_stats(&self, user_id: i64) -> DomainResult<UserBlacklistStats> {
        self.check_available().await?;
        let entries = self.entries.read().await;
        let mut stats = UserBlacklistStats::default();

        for entry in entries.values().filter(|e| e.user_id == Some(user_id)) {
            stats.total_blacklisted += 1;
            if entry.is_active() {
                stats.active += 1;
            }
            if entry.is_security_related() {
                stats.security_related += 1;
            }
            if entry.is_user_initiated() {
                stats.user_initiated += 1;
            }
            match entry.token_kind {
                TokenKind::Access => stats.access_tokens += 1,
                TokenKind::Refresh => stats.refresh_tokens += 1,
            }
        }

        Ok(stats)
    }

    async fn global_stats(&self) -> DomainResult<BlacklistStoreStats> {
        self.check_available().await?;
        let entries = self.entries.read().await;
        let now = Utc::now();

        Ok(BlacklistStoreStats {
            total: entries.len(),
            expired: entries.values().filter(|e| e.expires_at <= now).count(),
            oldest_entry: entries.values().map(|e| e.blacklisted_at).min(),
            newest_entry: entries.values().map(|e| e.blacklisted_at).max(),
        })
    }
}
