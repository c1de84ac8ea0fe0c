//! Mock implementation of RefreshTokenStore for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::refresh_token::RefreshTokenRecord;
use crate::errors::{DomainResult, StorageError};

use super::r#trait::RefreshTokenStore;

/// In-memory refresh-token store for testing
pub struct MockRefreshTokenStore {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
}

impl MockRefreshTokenStore {
    /// Create a new mock store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MockRefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenStore for MockRefreshTokenStore {
    async fn create(&self, record: RefreshTokenRecord) -> DomainResult<()> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.jti) {
            return Err(StorageError::DuplicateKey {
                key: record.jti.clone(),
            }
            .into());
        }

        records.insert(record.jti.clone(), record);
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: i64) -> DomainResult<Vec<RefreshTokenRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn exists_by_jti(&self, jti: &str) -> DomainResult<bool> {
        let records = self.records.read().await;
        Ok(records.contains_key(jti))
    }

    async fn delete_by_jti(&self, jti: &str) -> DomainResult<bool> {
        let mut records = self.records.write().await;
        Ok(records.remove(jti).is_some())
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> DomainResult<usize> {
        let mut records = self.records.write().await;
        let initial_count = records.len();

        records.retain(|_, record| record.expires_at > before);

        Ok(initial_count - records.len())
    }
}
