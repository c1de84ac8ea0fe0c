//! Unit tests for the mock refresh-token store

use chrono::{Duration, Utc};

use crate::domain::entities::refresh_token::RefreshTokenRecord;
use crate::errors::{DomainError, StorageError};
use crate::repositories::refresh_token::mock::MockRefreshTokenStore;
use crate::repositories::refresh_token::RefreshTokenStore;

fn record(jti: &str, user_id: i64, device_id: &str) -> RefreshTokenRecord {
    RefreshTokenRecord::new(
        jti.to_string(),
        user_id,
        device_id.to_string(),
        "Test Device".to_string(),
        Utc::now() + Duration::days(7),
    )
}

#[tokio::test]
async fn create_and_exists() {
    let store = MockRefreshTokenStore::new();

    store.create(record("jti-1", 1, "dev_a")).await.unwrap();

    assert!(store.exists_by_jti("jti-1").await.unwrap());
    assert!(!store.exists_by_jti("jti-2").await.unwrap());
}

#[tokio::test]
async fn duplicate_jti_is_a_deterministic_storage_error() {
    let store = MockRefreshTokenStore::new();

    store.create(record("jti-1", 1, "dev_a")).await.unwrap();
    let result = store.create(record("jti-1", 2, "dev_b")).await;

    assert!(matches!(
        result,
        Err(DomainError::Storage(StorageError::DuplicateKey { .. }))
    ));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn find_by_user_id_returns_all_devices() {
    let store = MockRefreshTokenStore::new();

    store.create(record("jti-1", 1, "dev_a")).await.unwrap();
    store.create(record("jti-2", 1, "dev_b")).await.unwrap();
    store.create(record("jti-3", 2, "dev_c")).await.unwrap();

    let sessions = store.find_by_user_id(1).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|r| r.user_id == 1));
}

#[tokio::test]
async fn delete_by_jti_reports_whether_a_row_was_removed() {
    let store = MockRefreshTokenStore::new();
    store.create(record("jti-1", 1, "dev_a")).await.unwrap();

    assert!(store.delete_by_jti("jti-1").await.unwrap());
    assert!(!store.delete_by_jti("jti-1").await.unwrap());
    assert!(!store.exists_by_jti("jti-1").await.unwrap());
}

#[tokio::test]
async fn delete_expired_keeps_future_rows() {
    let store = MockRefreshTokenStore::new();

    let mut expired = record("jti-old", 1, "dev_a");
    expired.expires_at = Utc::now() - Duration::days(1);
    store.create(expired).await.unwrap();
    store.create(record("jti-new", 1, "dev_b")).await.unwrap();

    let deleted = store.delete_expired(Utc::now()).await.unwrap();

    assert_eq!(deleted, 1);
    assert!(store.exists_by_jti("jti-new").await.unwrap());
    assert!(!store.exists_by_jti("jti-old").await.unwrap());
}
