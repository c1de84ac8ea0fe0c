//! Blacklist service module for token revocation
//!
//! This module handles revocation business logic over the blacklist store:
//! - Idempotent single and batch revocation
//! - Hot-path checks with an explicit fail-closed/fail-open policy
//! - Expiry-driven and budget-bounded cleanup
//! - Statistics and health reporting

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::{BlacklistCheckPolicy, BlacklistServiceConfig};
pub use service::{
    plan_cleanup, BlacklistHealth, BlacklistRequest, BlacklistService, BlacklistStatistics,
    CleanupOutcome,
};
