//! Configuration for the blacklist service

/// What a blacklist check reports when the store itself fails
///
/// Fail-closed treats a storage failure as "blacklisted" (safer, costs
/// availability); fail-open treats it as "not blacklisted" (available, but
/// a revoked token may briefly pass). The choice is deliberate per call
/// site, never implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistCheckPolicy {
    FailClosed,
    FailOpen,
}

/// Configuration for [`super::BlacklistService`]
#[derive(Debug, Clone)]
pub struct BlacklistServiceConfig {
    /// Policy applied by `check_blacklisted` on storage failures
    pub check_policy: BlacklistCheckPolicy,
    /// Candidate-window multiplier for budget-bounded cleanup: the service
    /// fetches `budget * cleanup_fetch_factor` oldest entries and orders
    /// them by priority before deleting
    pub cleanup_fetch_factor: usize,
}

impl Default for BlacklistServiceConfig {
    fn default() -> Self {
        Self {
            // Revocation exists to stop compromised tokens; reject when in doubt.
            check_policy: BlacklistCheckPolicy::FailClosed,
            cleanup_fetch_factor: 4,
        }
    }
}
