//! MySQL implementation of the BlacklistStore trait.
//!
//! Revocations live in the `token_blacklist` table, keyed by jti.
//! `INSERT IGNORE` gives the idempotent-add semantics: the row count tells
//! a fresh insert apart from a duplicate without a prior read.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, QueryBuilder, Row};

use sentra_core::domain::value_objects::blacklist_entry::{
    BlacklistReason, TokenBlacklistEntry, TokenKind,
};
use sentra_core::errors::{DomainError, DomainResult};
use sentra_core::repositories::blacklist::{
    BlacklistStore, BlacklistStoreStats, UserBlacklistStats,
};

use crate::database::map_sqlx_error;

const ENTRY_COLUMNS: &str =
    "jti, token_kind, user_id, expires_at, blacklisted_at, reason, device_id, metadata";

/// MySQL implementation of BlacklistStore
pub struct MySqlBlacklistStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlBlacklistStore {
    /// Create a new MySQL blacklist store
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a TokenBlacklistEntry
    fn row_to_entry(row: &sqlx::mysql::MySqlRow) -> DomainResult<TokenBlacklistEntry> {
        let kind_raw: String = row
            .try_get("token_kind")
            .map_err(|e| map_sqlx_error("read token_kind", e))?;
        let reason_raw: String = row
            .try_get("reason")
            .map_err(|e| map_sqlx_error("read reason", e))?;
        let metadata: Option<sqlx::types::Json<serde_json::Value>> = row
            .try_get("metadata")
            .map_err(|e| map_sqlx_error("read metadata", e))?;

        TokenBlacklistEntry::from_parts(
            row.try_get("jti")
                .map_err(|e| map_sqlx_error("read jti", e))?,
            TokenKind::from_str(&kind_raw).map_err(|_| DomainError::Internal {
                message: format!("unknown token_kind column value: {}", kind_raw),
            })?,
            row.try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| map_sqlx_error("read expires_at", e))?,
            row.try_get::<DateTime<Utc>, _>("blacklisted_at")
                .map_err(|e| map_sqlx_error("read blacklisted_at", e))?,
            BlacklistReason::from_str(&reason_raw).map_err(|_| DomainError::Internal {
                message: format!("unknown reason column value: {}", reason_raw),
            })?,
            row.try_get("user_id")
                .map_err(|e| map_sqlx_error("read user_id", e))?,
            row.try_get("device_id")
                .map_err(|e| map_sqlx_error("read device_id", e))?,
            metadata.map(|json| json.0),
        )
    }

}

#[async_trait]
impl BlacklistStore for MySqlBlacklistStore {
    async fn add(&self, entry: TokenBlacklistEntry) -> DomainResult<bool> {
        let query = format!(
            "INSERT IGNORE INTO token_blacklist ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            ENTRY_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(&entry.jti)
            .bind(entry.token_kind.as_str())
            .bind(entry.user_id)
            .bind(entry.expires_at)
            .bind(entry.blacklisted_at)
            .bind(entry.reason.as_str())
            .bind(&entry.device_id)
            .bind(entry.metadata.clone().map(sqlx::types::Json))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("add blacklist entry", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_jti(&self, jti: &str) -> DomainResult<Option<TokenBlacklistEntry>> {
        let query = format!(
            "SELECT {} FROM token_blacklist WHERE jti = ? LIMIT 1",
            ENTRY_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(jti)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find blacklist entry", e))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_entry(&row)?)),
            None => Ok(None),
        }
    }

    async fn is_blacklisted(&self, jti: &str) -> DomainResult<bool> {
        let query = "SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE jti = ?) AS present";

        let row = sqlx::query(query)
            .bind(jti)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("check blacklist", e))?;

        let present: i8 = row
            .try_get("present")
            .map_err(|e| map_sqlx_error("read blacklist check result", e))?;
        Ok(present == 1)
    }

    async fn find_by_user_id(&self, user_id: i64) -> DomainResult<Vec<TokenBlacklistEntry>> {
        let query = format!(
            "SELECT {} FROM token_blacklist WHERE user_id = ? ORDER BY blacklisted_at DESC",
            ENTRY_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find blacklist entries by user", e))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn find_by_token_kind(&self, kind: TokenKind) -> DomainResult<Vec<TokenBlacklistEntry>> {
        let query = format!(
            "SELECT {} FROM token_blacklist WHERE token_kind = ? ORDER BY blacklisted_at DESC",
            ENTRY_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find blacklist entries by kind", e))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn find_by_reason(
        &self,
        reason: BlacklistReason,
    ) -> DomainResult<Vec<TokenBlacklistEntry>> {
        let query = format!(
            "SELECT {} FROM token_blacklist WHERE reason = ? ORDER BY blacklisted_at DESC",
            ENTRY_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(reason.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find blacklist entries by reason", e))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn batch_add(&self, entries: Vec<TokenBlacklistEntry>) -> DomainResult<usize> {
        let mut inserted = 0;
        for entry in entries {
            if self.add(entry).await? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn batch_is_blacklisted(
        &self,
        jtis: &[String],
    ) -> DomainResult<HashMap<String, bool>> {
        if jtis.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<sqlx::MySql> =
            QueryBuilder::new("SELECT jti FROM token_blacklist WHERE jti IN (");
        let mut separated = builder.separated(", ");
        for jti in jtis {
            separated.push_bind(jti);
        }
        builder.push(")");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("batch blacklist check", e))?;

        let mut found: HashMap<String, bool> =
            jtis.iter().map(|jti| (jti.clone(), false)).collect();
        for row in rows {
            let jti: String = row
                .try_get("jti")
                .map_err(|e| map_sqlx_error("read batch check row", e))?;
            found.insert(jti, true);
        }

        Ok(found)
    }

    async fn batch_remove(&self, jtis: &[String]) -> DomainResult<usize> {
        if jtis.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<sqlx::MySql> =
            QueryBuilder::new("DELETE FROM token_blacklist WHERE jti IN (");
        let mut separated = builder.separated(", ");
        for jti in jtis {
            separated.push_bind(jti);
        }
        builder.push(")");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("batch blacklist remove", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn remove_expired(&self, before: DateTime<Utc>) -> DomainResult<usize> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at <= ?")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove expired blacklist entries", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn find_cleanup_candidates(
        &self,
        limit: usize,
    ) -> DomainResult<Vec<TokenBlacklistEntry>> {
        let query = format!(
            "SELECT {} FROM token_blacklist ORDER BY blacklisted_at ASC LIMIT ?",
            ENTRY_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(limit as u64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find cleanup candidates", e))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn user_stats(&self, user_id: i64) -> DomainResult<UserBlacklistStats> {
        let query = r#"
            SELECT
                COUNT(*) AS total,
                COUNT(CASE WHEN expires_at > ? THEN 1 END) AS active,
                COUNT(CASE WHEN reason IN
                    ('security_breach', 'suspicious_activity', 'device_lost', 'invalid_signature')
                    THEN 1 END) AS security_related,
                COUNT(CASE WHEN reason IN
                    ('logout', 'manual_revocation', 'device_lost')
                    THEN 1 END) AS user_initiated,
                COUNT(CASE WHEN token_kind = 'access' THEN 1 END) AS access_tokens,
                COUNT(CASE WHEN token_kind = 'refresh' THEN 1 END) AS refresh_tokens
            FROM token_blacklist
            WHERE user_id = ?
        "#;

        let row = sqlx::query(query)
            .bind(Utc::now())
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("user blacklist stats", e))?;

        let count = |column: &str| -> DomainResult<usize> {
            row.try_get::<i64, _>(column)
                .map(|v| v as usize)
                .map_err(|e| map_sqlx_error("read stats column", e))
        };

        Ok(UserBlacklistStats {
            total_blacklisted: count("total")?,
            active: count("active")?,
            security_related: count("security_related")?,
            user_initiated: count("user_initiated")?,
            access_tokens: count("access_tokens")?,
            refresh_tokens: count("refresh_tokens")?,
        })
    }

    async fn global_stats(&self) -> DomainResult<BlacklistStoreStats> {
        let query = r#"
            SELECT
                COUNT(*) AS total,
                COUNT(CASE WHEN expires_at <= ? THEN 1 END) AS expired,
                MIN(blacklisted_at) AS oldest_entry,
                MAX(blacklisted_at) AS newest_entry
            FROM token_blacklist
        "#;

        let row = sqlx::query(query)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("global blacklist stats", e))?;

        Ok(BlacklistStoreStats {
            total: row
                .try_get::<i64, _>("total")
                .map(|v| v as usize)
                .map_err(|e| map_sqlx_error("read stats column", e))?,
            expired: row
                .try_get::<i64, _>("expired")
                .map(|v| v as usize)
                .map_err(|e| map_sqlx_error("read stats column", e))?,
            oldest_entry: row
                .try_get("oldest_entry")
                .map_err(|e| map_sqlx_error("read stats column", e))?,
            newest_entry: row
                .try_get("newest_entry")
                .map_err(|e| map_sqlx_error("read stats column", e))?,
        })
    }
}
