//! Unit tests for the mock blacklist store

use chrono::{Duration, Utc};

use crate::domain::value_objects::blacklist_entry::{
    BlacklistReason, TokenBlacklistEntry, TokenKind,
};
use crate::repositories::blacklist::mock::MockBlacklistStore;
use crate::repositories::blacklist::BlacklistStore;

fn entry(jti: &str, reason: BlacklistReason) -> TokenBlacklistEntry {
    TokenBlacklistEntry::new(
        jti.to_string(),
        TokenKind::Access,
        Utc::now() + Duration::minutes(15),
        reason,
    )
    .unwrap()
}

#[tokio::test]
async fn add_is_idempotent_per_jti() {
    let store = MockBlacklistStore::new();

    assert!(store.add(entry("jti-1", BlacklistReason::Logout)).await.unwrap());
    assert!(!store.add(entry("jti-1", BlacklistReason::Revoked)).await.unwrap());

    assert_eq!(store.len().await, 1);
    // The first write wins; the duplicate changed nothing.
    let stored = store.find_by_jti("jti-1").await.unwrap().unwrap();
    assert_eq!(stored.reason, BlacklistReason::Logout);
}

#[tokio::test]
async fn is_blacklisted_reflects_contents() {
    let store = MockBlacklistStore::new();
    store.add(entry("jti-1", BlacklistReason::Logout)).await.unwrap();

    assert!(store.is_blacklisted("jti-1").await.unwrap());
    assert!(!store.is_blacklisted("jti-2").await.unwrap());
}

#[tokio::test]
async fn batch_add_skips_duplicates() {
    let store = MockBlacklistStore::new();
    store.add(entry("jti-1", BlacklistReason::Logout)).await.unwrap();

    let inserted = store
        .batch_add(vec![
            entry("jti-1", BlacklistReason::Logout),
            entry("jti-2", BlacklistReason::Revoked),
            entry("jti-3", BlacklistReason::SecurityBreach),
        ])
        .await
        .unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn batch_is_blacklisted_answers_every_jti() {
    let store = MockBlacklistStore::new();
    store.add(entry("jti-1", BlacklistReason::Logout)).await.unwrap();

    let jtis = vec!["jti-1".to_string(), "jti-2".to_string()];
    let result = store.batch_is_blacklisted(&jtis).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result["jti-1"], true);
    assert_eq!(result["jti-2"], false);
}

#[tokio::test]
async fn batch_remove_counts_actual_removals() {
    let store = MockBlacklistStore::new();
    store.add(entry("jti-1", BlacklistReason::Logout)).await.unwrap();
    store.add(entry("jti-2", BlacklistReason::Logout)).await.unwrap();

    let removed = store
        .batch_remove(&["jti-1".to_string(), "jti-missing".to_string()])
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn remove_expired_only_touches_past_entries() {
    let store = MockBlacklistStore::new();

    let expired = TokenBlacklistEntry::from_parts(
        "jti-old".to_string(),
        TokenKind::Refresh,
        Utc::now() - Duration::minutes(1),
        Utc::now(),
        BlacklistReason::Logout,
        None,
        None,
        None,
    )
    .unwrap();
    store.add(expired).await.unwrap();
    store.add(entry("jti-new", BlacklistReason::Logout)).await.unwrap();

    let removed = store.remove_expired(Utc::now()).await.unwrap();

    assert_eq!(removed, 1);
    assert!(store.is_blacklisted("jti-new").await.unwrap());
    assert!(!store.is_blacklisted("jti-old").await.unwrap());
}

#[tokio::test]
async fn candidates_come_back_oldest_first() {
    let store = MockBlacklistStore::new();

    for (jti, age_minutes) in [("jti-a", 5), ("jti-b", 30), ("jti-c", 15)] {
        let entry = TokenBlacklistEntry::from_parts(
            jti.to_string(),
            TokenKind::Access,
            Utc::now() + Duration::minutes(15),
            Utc::now() - Duration::minutes(age_minutes),
            BlacklistReason::Logout,
            None,
            None,
            None,
        )
        .unwrap();
        store.add(entry).await.unwrap();
    }

    let candidates = store.find_cleanup_candidates(2).await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].jti, "jti-b");
    assert_eq!(candidates[1].jti, "jti-c");
}

#[tokio::test]
async fn user_stats_aggregate_by_classification() {
    let store = MockBlacklistStore::new();

    store
        .add(entry("jti-1", BlacklistReason::Logout).with_user_id(7))
        .await
        .unwrap();
    store
        .add(entry("jti-2", BlacklistReason::SecurityBreach).with_user_id(7))
        .await
        .unwrap();
    let refresh = TokenBlacklistEntry::new(
        "jti-3".to_string(),
        TokenKind::Refresh,
        Utc::now() + Duration::days(7),
        BlacklistReason::ManualRevocation,
    )
    .unwrap()
    .with_user_id(7);
    store.add(refresh).await.unwrap();
    store
        .add(entry("jti-other", BlacklistReason::Logout).with_user_id(8))
        .await
        .unwrap();

    let stats = store.user_stats(7).await.unwrap();

    assert_eq!(stats.total_blacklisted, 3);
    assert_eq!(stats.active, 3);
    assert_eq!(stats.security_related, 1);
    assert_eq!(stats.user_initiated, 2);
    assert_eq!(stats.access_tokens, 2);
    assert_eq!(stats.refresh_tokens, 1);
}

#[tokio::test]
async fn global_stats_track_extremes() {
    let store = MockBlacklistStore::new();
    let stats = store.global_stats().await.unwrap();
    assert_eq!(stats.total, 0);
    assert!(stats.oldest_entry.is_none());

    store.add(entry("jti-1", BlacklistReason::Logout)).await.unwrap();
    store.add(entry("jti-2", BlacklistReason::Logout)).await.unwrap();

    let stats = store.global_stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.expired, 0);
    assert!(stats.oldest_entry.is_some());
    assert!(stats.newest_entry >= stats.oldest_entry);
}

#[tokio::test]
async fn failing_store_surfaces_storage_errors() {
    let store = MockBlacklistStore::new();
    store.set_failing(true).await;

    let result = store.is_blacklisted("jti-1").await;
    assert!(matches!(result, Err(e) if e.is_storage()));
}
