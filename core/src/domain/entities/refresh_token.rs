//! Refresh-token session record persisted per device.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One active session on one device, keyed by the refresh token's jti
///
/// A user holds as many records as devices with live sessions. The record
/// is replaced (old jti deleted, new jti created) on every rotation and
/// deleted on logout. No token material is stored; the jti claim is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// JWT ID of the refresh token this record mirrors
    pub jti: String,

    /// User the session belongs to
    pub user_id: i64,

    /// Stable device identifier captured at login
    pub device_id: String,

    /// Human-readable device name captured at login
    pub device_name: String,

    /// When the refresh token stops being accepted
    pub expires_at: DateTime<Utc>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Creates a record for a freshly issued refresh token
    pub fn new(
        jti: String,
        user_id: i64,
        device_id: String,
        device_name: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            jti,
            user_id,
            device_id,
            device_name,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Time remaining until expiration, zero if already expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_not_expired() {
        let record = RefreshTokenRecord::new(
            "jti-1".to_string(),
            42,
            "dev_abc".to_string(),
            "iOS Mobile (Safari)".to_string(),
            Utc::now() + Duration::days(7),
        );

        assert!(!record.is_expired());
        assert!(record.time_until_expiration() > Duration::days(6));
        assert!(record.created_at <= Utc::now());
    }

    #[test]
    fn past_expiry_is_expired() {
        let mut record = RefreshTokenRecord::new(
            "jti-1".to_string(),
            42,
            "dev_abc".to_string(),
            "name".to_string(),
            Utc::now() + Duration::days(7),
        );
        record.expires_at = Utc::now() - Duration::days(1);

        assert!(record.is_expired());
        assert_eq!(record.time_until_expiration(), Duration::zero());
    }

    #[test]
    fn record_serializes_round_trip() {
        let record = RefreshTokenRecord::new(
            "jti-1".to_string(),
            42,
            "dev_abc".to_string(),
            "name".to_string(),
            Utc::now() + Duration::days(7),
        );

        let json = serde_json::to_string(&record).unwrap();
        let decoded: RefreshTokenRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, decoded);
    }
}
