//! MySQL implementation of the RefreshTokenStore trait.
//!
//! Session records live in the `refresh_tokens` table, keyed by jti. The
//! unique primary key is the only uniqueness mechanism; the application
//! never locks around it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use sentra_core::domain::entities::refresh_token::RefreshTokenRecord;
use sentra_core::errors::{DomainResult, StorageError};
use sentra_core::repositories::refresh_token::RefreshTokenStore;

use crate::database::map_sqlx_error;

/// MySQL implementation of RefreshTokenStore
pub struct MySqlRefreshTokenStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenStore {
    /// Create a new MySQL refresh-token store
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshTokenRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> DomainResult<RefreshTokenRecord> {
        Ok(RefreshTokenRecord {
            jti: row
                .try_get("jti")
                .map_err(|e| map_sqlx_error("read jti", e))?,
            user_id: row
                .try_get("user_id")
                .map_err(|e| map_sqlx_error("read user_id", e))?,
            device_id: row
                .try_get("device_id")
                .map_err(|e| map_sqlx_error("read device_id", e))?,
            device_name: row
                .try_get("device_name")
                .map_err(|e| map_sqlx_error("read device_name", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| map_sqlx_error("read expires_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| map_sqlx_error("read created_at", e))?,
        })
    }
}

#[async_trait]
impl RefreshTokenStore for MySqlRefreshTokenStore {
    async fn create(&self, record: RefreshTokenRecord) -> DomainResult<()> {
        let query = r#"
            INSERT INTO refresh_tokens (
                jti, user_id, device_id, device_name, expires_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&record.jti)
            .bind(record.user_id)
            .bind(&record.device_id)
            .bind(&record.device_name)
            .bind(record.expires_at)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StorageError::DuplicateKey {
                        key: record.jti.clone(),
                    }
                    .into()
                }
                _ => map_sqlx_error("create refresh token", e),
            })?;

        Ok(())
    }

    async fn find_by_user_id(&self, user_id: i64) -> DomainResult<Vec<RefreshTokenRecord>> {
        let query = r#"
            SELECT jti, user_id, device_id, device_name, expires_at, created_at
            FROM refresh_tokens
            WHERE user_id = ?
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find refresh tokens by user", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn exists_by_jti(&self, jti: &str) -> DomainResult<bool> {
        let query = "SELECT EXISTS(SELECT 1 FROM refresh_tokens WHERE jti = ?) AS present";

        let row = sqlx::query(query)
            .bind(jti)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("check refresh token existence", e))?;

        let present: i8 = row
            .try_get("present")
            .map_err(|e| map_sqlx_error("read existence result", e))?;
        Ok(present == 1)
    }

    async fn delete_by_jti(&self, jti: &str) -> DomainResult<bool> {
        // Single-statement delete: the row count is the rotation arbiter,
        // so concurrent callers cannot both observe a deletion.
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE jti = ?")
            .bind(jti)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> DomainResult<usize> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete expired refresh tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
