//! # Infrastructure Layer
//!
//! MySQL-backed implementations of the `sentra_core` store traits using
//! SQLx, plus connection-pool management. The domain and business services
//! stay database-agnostic; everything SQL lives here.
//!
//! ## Schema
//!
//! Two tables back the session subsystem:
//!
//! ```sql
//! CREATE TABLE refresh_tokens (
//!     jti         VARCHAR(64)  NOT NULL PRIMARY KEY,
//!     user_id     BIGINT       NOT NULL,
//!     device_id   VARCHAR(64)  NOT NULL,
//!     device_name VARCHAR(255) NOT NULL,
//!     expires_at  TIMESTAMP(6) NOT NULL,
//!     created_at  TIMESTAMP(6) NOT NULL,
//!     INDEX idx_refresh_tokens_user_id (user_id),
//!     INDEX idx_refresh_tokens_expires_at (expires_at)
//! );
//!
//! CREATE TABLE token_blacklist (
//!     jti            VARCHAR(64)  NOT NULL PRIMARY KEY,
//!     token_kind     VARCHAR(16)  NOT NULL,
//!     user_id        BIGINT       NULL,
//!     expires_at     TIMESTAMP(6) NOT NULL,
//!     blacklisted_at TIMESTAMP(6) NOT NULL,
//!     reason         VARCHAR(32)  NOT NULL,
//!     device_id      VARCHAR(64)  NULL,
//!     metadata       JSON         NULL,
//!     INDEX idx_token_blacklist_user_id (user_id),
//!     INDEX idx_token_blacklist_expires_at (expires_at),
//!     INDEX idx_token_blacklist_blacklisted_at (blacklisted_at)
//! );
//! ```

pub mod database;

pub use database::connection::{DatabaseConfig, DatabasePool};
pub use database::mysql::{MySqlBlacklistStore, MySqlRefreshTokenStore};
