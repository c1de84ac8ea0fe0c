//! Revoked-token blacklist entry and its reason taxonomy.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainResult, ValidationError};

/// Maximum serialized metadata size in bytes (64 KiB)
pub const MAX_METADATA_BYTES: usize = 64 * 1024;

/// Maximum drift allowed between `blacklisted_at` and the current time
pub const MAX_BLACKLISTED_AT_DRIFT_DAYS: i64 = 365;

/// Which half of a token pair an entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl FromStr for TokenKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenKind::Access),
            "refresh" => Ok(TokenKind::Refresh),
            _ => Err(ValidationError::InvalidFormat {
                field: "token_kind".to_string(),
            }),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a token was revoked
///
/// Closed enumeration so that adding a reason forces every match site to be
/// revisited. The string forms are the persisted column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistReason {
    Logout,
    Revoked,
    SecurityBreach,
    PasswordChanged,
    AccountSuspended,
    ManualRevocation,
    Expired,
    InvalidSignature,
    DeviceLost,
    SuspiciousActivity,
}

impl BlacklistReason {
    pub const ALL: [BlacklistReason; 10] = [
        BlacklistReason::Logout,
        BlacklistReason::Revoked,
        BlacklistReason::SecurityBreach,
        BlacklistReason::PasswordChanged,
        BlacklistReason::AccountSuspended,
        BlacklistReason::ManualRevocation,
        BlacklistReason::Expired,
        BlacklistReason::InvalidSignature,
        BlacklistReason::DeviceLost,
        BlacklistReason::SuspiciousActivity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlacklistReason::Logout => "logout",
            BlacklistReason::Revoked => "revoked",
            BlacklistReason::SecurityBreach => "security_breach",
            BlacklistReason::PasswordChanged => "password_changed",
            BlacklistReason::AccountSuspended => "account_suspended",
            BlacklistReason::ManualRevocation => "manual_revocation",
            BlacklistReason::Expired => "expired",
            BlacklistReason::InvalidSignature => "invalid_signature",
            BlacklistReason::DeviceLost => "device_lost",
            BlacklistReason::SuspiciousActivity => "suspicious_activity",
        }
    }

    /// Revocations caused by a suspected or confirmed compromise
    pub fn is_security_related(&self) -> bool {
        matches!(
            self,
            BlacklistReason::SecurityBreach
                | BlacklistReason::SuspiciousActivity
                | BlacklistReason::DeviceLost
                | BlacklistReason::InvalidSignature
        )
    }

    /// Revocations the account owner asked for
    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            BlacklistReason::Logout
                | BlacklistReason::ManualRevocation
                | BlacklistReason::DeviceLost
        )
    }

    /// Revocations triggered by the system rather than the owner
    pub fn is_system_initiated(&self) -> bool {
        matches!(
            self,
            BlacklistReason::Expired
                | BlacklistReason::AccountSuspended
                | BlacklistReason::SecurityBreach
                | BlacklistReason::PasswordChanged
        )
    }
}

impl FromStr for BlacklistReason {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlacklistReason::ALL
            .iter()
            .find(|reason| reason.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "reason".to_string(),
            })
    }
}

impl fmt::Display for BlacklistReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purge ordering when a cleanup run has a bounded budget
///
/// Lower ranks purge first. Variant order matches rank order, so the
/// derived `Ord` sorts correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CleanupPriority {
    /// The underlying token is already past its natural expiry
    ExpiredEntry,
    SecurityRelated,
    UserInitiated,
    Standard,
}

impl CleanupPriority {
    /// Numeric rank, 1 purges first
    pub fn rank(&self) -> u8 {
        match self {
            CleanupPriority::ExpiredEntry => 1,
            CleanupPriority::SecurityRelated => 2,
            CleanupPriority::UserInitiated => 3,
            CleanupPriority::Standard => 4,
        }
    }
}

/// Immutable record of a revoked token
///
/// Created when a token is revoked, consulted on checks and statistics, and
/// deleted by cleanup once the underlying token would have expired anyway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBlacklistEntry {
    /// JWT ID of the revoked token
    pub jti: String,

    /// Which half of the pair was revoked
    pub token_kind: TokenKind,

    /// Original expiry of the revoked token
    pub expires_at: DateTime<Utc>,

    /// When the revocation happened
    pub blacklisted_at: DateTime<Utc>,

    /// Why the token was revoked
    pub reason: BlacklistReason,

    /// Owner of the token, when known
    pub user_id: Option<i64>,

    /// Device the token was bound to, when known
    pub device_id: Option<String>,

    /// Free-form JSON context, at most 64 KiB serialized
    pub metadata: Option<serde_json::Value>,
}

impl TokenBlacklistEntry {
    /// Creates an entry revoked right now
    pub fn new(
        jti: String,
        token_kind: TokenKind,
        expires_at: DateTime<Utc>,
        reason: BlacklistReason,
    ) -> DomainResult<Self> {
        Self::from_parts(
            jti,
            token_kind,
            expires_at,
            Utc::now(),
            reason,
            None,
            None,
            None,
        )
    }

    /// Creates an entry from fully specified parts
    ///
    /// Used by the stores when mapping persisted rows back into the domain.
    ///
    /// # Returns
    ///
    /// * `Err(ValidationError)` - Empty jti, `blacklisted_at` more than a
    ///   year away from now, or oversized metadata
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        jti: String,
        token_kind: TokenKind,
        expires_at: DateTime<Utc>,
        blacklisted_at: DateTime<Utc>,
        reason: BlacklistReason,
        user_id: Option<i64>,
        device_id: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> DomainResult<Self> {
        if jti.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "jti".to_string(),
            }
            .into());
        }
        let drift = Utc::now() - blacklisted_at;
        if drift.num_days().abs() > MAX_BLACKLISTED_AT_DRIFT_DAYS {
            return Err(ValidationError::OutOfRange {
                field: "blacklisted_at".to_string(),
                min: "now - 1 year".to_string(),
                max: "now + 1 year".to_string(),
            }
            .into());
        }
        if let Some(ref value) = metadata {
            let size = serde_json::to_vec(value)
                .map_err(|e| crate::errors::DomainError::Internal {
                    message: format!("metadata serialization failed: {}", e),
                })?
                .len();
            if size > MAX_METADATA_BYTES {
                return Err(ValidationError::InvalidLength {
                    field: "metadata".to_string(),
                    max: MAX_METADATA_BYTES,
                    actual: size,
                }
                .into());
            }
        }

        Ok(Self {
            jti,
            token_kind,
            expires_at,
            blacklisted_at,
            reason,
            user_id,
            device_id,
            metadata,
        })
    }

    /// Creates an entry for a compromise-class revocation
    ///
    /// Rejects reasons outside the security-related set instead of quietly
    /// substituting a default; a caller passing `Logout` here has a bug that
    /// must surface.
    pub fn for_security_breach(
        jti: String,
        token_kind: TokenKind,
        expires_at: DateTime<Utc>,
        reason: BlacklistReason,
    ) -> DomainResult<Self> {
        if !reason.is_security_related() {
            return Err(ValidationError::BusinessRuleViolation {
                rule: format!("{} is not a security-related revocation reason", reason),
            }
            .into());
        }
        Self::new(jti, token_kind, expires_at, reason)
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_device_id(mut self, device_id: String) -> Self {
        self.device_id = Some(device_id);
        self
    }

    /// Attaches metadata, re-checking the size cap
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> DomainResult<Self> {
        let size = serde_json::to_vec(&metadata)
            .map_err(|e| crate::errors::DomainError::Internal {
                message: format!("metadata serialization failed: {}", e),
            })?
            .len();
        if size > MAX_METADATA_BYTES {
            return Err(ValidationError::InvalidLength {
                field: "metadata".to_string(),
                max: MAX_METADATA_BYTES,
                actual: size,
            }
            .into());
        }
        self.metadata = Some(metadata);
        Ok(self)
    }

    pub fn is_security_related(&self) -> bool {
        self.reason.is_security_related()
    }

    pub fn is_user_initiated(&self) -> bool {
        self.reason.is_user_initiated()
    }

    pub fn is_system_initiated(&self) -> bool {
        self.reason.is_system_initiated()
    }

    /// Whether the underlying token has passed its natural expiry, making
    /// the entry safe to purge
    pub fn can_be_cleaned_up(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Whether the entry still adds protection beyond natural expiry
    pub fn is_active(&self) -> bool {
        self.expires_at > Utc::now()
    }

    /// Purge ordering for budget-bounded cleanup runs
    pub fn cleanup_priority(&self) -> CleanupPriority {
        if self.can_be_cleaned_up() {
            CleanupPriority::ExpiredEntry
        } else if self.is_security_related() {
            CleanupPriority::SecurityRelated
        } else if self.is_user_initiated() {
            CleanupPriority::UserInitiated
        } else {
            CleanupPriority::Standard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(reason: BlacklistReason) -> TokenBlacklistEntry {
        TokenBlacklistEntry::new(
            "jti-1".to_string(),
            TokenKind::Access,
            Utc::now() + Duration::minutes(15),
            reason,
        )
        .unwrap()
    }

    #[test]
    fn reason_strings_round_trip() {
        for reason in BlacklistReason::ALL {
            let parsed: BlacklistReason = reason.as_str().parse().unwrap();
            assert_eq!(parsed, reason);
        }
        assert!("not_a_reason".parse::<BlacklistReason>().is_err());
    }

    #[test]
    fn security_classification() {
        for reason in [
            BlacklistReason::SecurityBreach,
            BlacklistReason::SuspiciousActivity,
            BlacklistReason::DeviceLost,
            BlacklistReason::InvalidSignature,
        ] {
            assert!(reason.is_security_related(), "{} should be security", reason);
        }
        assert!(!BlacklistReason::Logout.is_security_related());
        assert!(!BlacklistReason::PasswordChanged.is_security_related());
    }

    #[test]
    fn user_initiated_classification() {
        for reason in [
            BlacklistReason::Logout,
            BlacklistReason::ManualRevocation,
            BlacklistReason::DeviceLost,
        ] {
            assert!(reason.is_user_initiated(), "{} should be user-initiated", reason);
        }
        assert!(!BlacklistReason::SecurityBreach.is_user_initiated());
    }

    #[test]
    fn system_initiated_classification() {
        for reason in [
            BlacklistReason::Expired,
            BlacklistReason::AccountSuspended,
            BlacklistReason::SecurityBreach,
            BlacklistReason::PasswordChanged,
        ] {
            assert!(reason.is_system_initiated(), "{} should be system-initiated", reason);
        }
        assert!(!BlacklistReason::Logout.is_system_initiated());
    }

    #[test]
    fn active_entry_has_reason_class_priority() {
        assert_eq!(
            entry(BlacklistReason::SecurityBreach).cleanup_priority(),
            CleanupPriority::SecurityRelated
        );
        assert_eq!(
            entry(BlacklistReason::Logout).cleanup_priority(),
            CleanupPriority::UserInitiated
        );
        assert_eq!(
            entry(BlacklistReason::Revoked).cleanup_priority(),
            CleanupPriority::Standard
        );
        assert_eq!(
            entry(BlacklistReason::AccountSuspended).cleanup_priority(),
            CleanupPriority::Standard
        );
    }

    #[test]
    fn expired_entry_outranks_every_reason_class() {
        let expired = TokenBlacklistEntry::from_parts(
            "jti-2".to_string(),
            TokenKind::Refresh,
            Utc::now() - Duration::minutes(1),
            Utc::now(),
            BlacklistReason::SecurityBreach,
            None,
            None,
            None,
        )
        .unwrap();

        assert!(expired.can_be_cleaned_up());
        assert!(!expired.is_active());
        assert_eq!(expired.cleanup_priority(), CleanupPriority::ExpiredEntry);
        assert!(expired.cleanup_priority() < entry(BlacklistReason::SecurityBreach).cleanup_priority());
    }

    #[test]
    fn priority_ranks_are_ordered() {
        assert_eq!(CleanupPriority::ExpiredEntry.rank(), 1);
        assert_eq!(CleanupPriority::SecurityRelated.rank(), 2);
        assert_eq!(CleanupPriority::UserInitiated.rank(), 3);
        assert_eq!(CleanupPriority::Standard.rank(), 4);
    }

    #[test]
    fn serde_round_trip_reconstructs_equal_entry() {
        let original = entry(BlacklistReason::ManualRevocation)
            .with_user_id(42)
            .with_device_id("dev_abc".to_string())
            .with_metadata(serde_json::json!({"source": "admin-panel", "ticket": 991}))
            .unwrap();

        let json = serde_json::to_string(&original).unwrap();
        let decoded: TokenBlacklistEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn empty_jti_is_rejected() {
        let result = TokenBlacklistEntry::new(
            String::new(),
            TokenKind::Access,
            Utc::now() + Duration::minutes(15),
            BlacklistReason::Logout,
        );
        assert!(result.is_err());
    }

    #[test]
    fn blacklisted_at_drift_beyond_a_year_is_rejected() {
        let result = TokenBlacklistEntry::from_parts(
            "jti-3".to_string(),
            TokenKind::Access,
            Utc::now() + Duration::minutes(15),
            Utc::now() - Duration::days(400),
            BlacklistReason::Logout,
            None,
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn oversized_metadata_is_rejected() {
        let oversized = serde_json::json!({"blob": "x".repeat(MAX_METADATA_BYTES)});
        let result = entry(BlacklistReason::Logout).with_metadata(oversized);
        assert!(result.is_err());
    }

    #[test]
    fn for_security_breach_rejects_non_security_reason() {
        let result = TokenBlacklistEntry::for_security_breach(
            "jti-4".to_string(),
            TokenKind::Refresh,
            Utc::now() + Duration::days(7),
            BlacklistReason::Logout,
        );
        assert!(result.is_err());

        let entry = TokenBlacklistEntry::for_security_breach(
            "jti-4".to_string(),
            TokenKind::Refresh,
            Utc::now() + Duration::days(7),
            BlacklistReason::DeviceLost,
        )
        .unwrap();
        assert!(entry.is_security_related());
    }
}
