//! Periodic maintenance of session records and blacklist entries
//!
//! The core never schedules itself; an embedder either calls
//! [`SessionCleanupService::run_cleanup`] from its own trigger or spawns
//! the provided background loop. Every step is safe to run concurrently
//! with normal traffic: only rows whose expiry is already in the past are
//! touched, and fresh inserts are always future-dated.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::DomainResult;
use crate::repositories::blacklist::BlacklistStore;
use crate::repositories::refresh_token::RefreshTokenStore;
use crate::services::blacklist::BlacklistService;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often the background loop runs (in seconds)
    pub interval_seconds: u64,
    /// Optional per-run cap on blacklist removals; when set, entries are
    /// purged in priority order instead of all at once
    pub blacklist_budget: Option<usize>,
    /// Whether cleanup runs at all
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            blacklist_budget: None,
            enabled: true,
        }
    }
}

/// Result of a cleanup cycle
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Expired session records deleted
    pub expired_sessions_deleted: usize,
    /// Blacklist entries removed
    pub blacklist_entries_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupReport {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of rows removed
    pub fn total_cleaned(&self) -> usize {
        self.expired_sessions_deleted + self.blacklist_entries_deleted
    }
}

/// Service for cleaning up expired sessions and blacklist entries
pub struct SessionCleanupService<R, B>
where
    R: RefreshTokenStore + 'static,
    B: BlacklistStore + 'static,
{
    refresh_tokens: Arc<R>,
    blacklist: Arc<BlacklistService<B>>,
    config: CleanupConfig,
}

impl<R, B> SessionCleanupService<R, B>
where
    R: RefreshTokenStore,
    B: BlacklistStore,
{
    /// Create a new cleanup service
    pub fn new(
        refresh_tokens: Arc<R>,
        blacklist: Arc<BlacklistService<B>>,
        config: CleanupConfig,
    ) -> Self {
        Self {
            refresh_tokens,
            blacklist,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// Deletes expired session records, then purges blacklist entries whose
    /// underlying token has expired (bounded by the configured budget, if
    /// any). Per-step failures are collected rather than aborting the run.
    pub async fn run_cleanup(&self) -> DomainResult<CleanupReport> {
        if !self.config.enabled {
            return Ok(CleanupReport::default());
        }

        info!("starting session cleanup cycle");
        let mut report = CleanupReport::default();

        match self.refresh_tokens.delete_expired(Utc::now()).await {
            Ok(count) => {
                report.expired_sessions_deleted = count;
                if count > 0 {
                    info!(count, "deleted expired session records");
                }
            }
            Err(e) => {
                error!("failed to delete expired session records: {}", e);
                report.errors.push(format!("session cleanup error: {}", e));
            }
        }

        let blacklist_result = match self.config.blacklist_budget {
            Some(budget) => self.blacklist.cleanup_with_budget(budget).await,
            None => self
                .blacklist
                .auto_cleanup()
                .await
                .map(|outcome| outcome.expired_cleaned),
        };
        match blacklist_result {
            Ok(count) => {
                report.blacklist_entries_deleted = count;
                if count > 0 {
                    info!(count, "deleted blacklist entries");
                }
            }
            Err(e) => {
                error!("failed to clean up blacklist: {}", e);
                report.errors.push(format!("blacklist cleanup error: {}", e));
            }
        }

        info!(
            sessions = report.expired_sessions_deleted,
            blacklist = report.blacklist_entries_deleted,
            "session cleanup completed"
        );

        Ok(report)
    }

    /// Start the cleanup service as a background task
    ///
    /// Spawns a tokio task that runs cleanup at the configured interval.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("session cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "session cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(report) => {
                        if !report.is_success() {
                            warn!("cleanup completed with errors: {:?}", report.errors);
                        }
                    }
                    Err(e) => {
                        error!("session cleanup cycle failed: {}", e);
                    }
                }
            }
        });
    }
}
