//! Validated JWT claims for issued and decoded tokens.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainResult, ValidationError};

/// Registered claim names that custom claims may not shadow
pub const RESERVED_CLAIMS: [&str; 7] = ["jti", "sub", "iss", "aud", "iat", "exp", "nbf"];

/// Validated JWT claims (standard + custom)
///
/// Constructed when a token is issued or decoded; immutable afterwards.
/// Custom claims are flattened into the wire form alongside the registered
/// claims, which is why their names must stay disjoint from
/// [`RESERVED_CLAIMS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtPayload {
    /// JWT ID, the revocation/rotation key
    pub jti: String,

    /// Subject: stringified positive user id
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Audience list
    pub aud: Vec<String>,

    /// Issued-at timestamp (Unix seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,

    /// Not-before timestamp (Unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Application-specific extension claims
    #[serde(flatten)]
    pub custom_claims: HashMap<String, serde_json::Value>,
}

impl JwtPayload {
    /// Creates a validated payload from raw claim values
    ///
    /// # Returns
    ///
    /// * `Ok(JwtPayload)` - All invariants hold
    /// * `Err(ValidationError)` - Empty jti/iss, non-positive subject,
    ///   empty audience, `exp <= iat`, `nbf > exp`, or a custom claim
    ///   shadowing a registered name
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jti: String,
        sub: String,
        iss: String,
        aud: Vec<String>,
        iat: i64,
        exp: i64,
        nbf: Option<i64>,
        custom_claims: HashMap<String, serde_json::Value>,
    ) -> DomainResult<Self> {
        let payload = Self {
            jti,
            sub,
            iss,
            aud,
            iat,
            exp,
            nbf,
            custom_claims,
        };
        payload.validate()?;
        Ok(payload)
    }

    /// Creates claims for a freshly issued token
    ///
    /// # Arguments
    ///
    /// * `user_id` - Positive user id, becomes the subject
    /// * `iss` / `aud` - Issuer and audience to pin
    /// * `ttl` - Validity window from now
    ///
    /// A v4 UUID is generated as the jti; `nbf` is set to the issue time.
    pub fn issue(
        user_id: i64,
        iss: &str,
        aud: &[String],
        ttl: Duration,
    ) -> DomainResult<Self> {
        let now = Utc::now();
        Self::new(
            Uuid::new_v4().to_string(),
            user_id.to_string(),
            iss.to_string(),
            aud.to_vec(),
            now.timestamp(),
            (now + ttl).timestamp(),
            Some(now.timestamp()),
            HashMap::new(),
        )
    }

    /// Checks every construction invariant
    ///
    /// Also called after decoding an untrusted token, since deserialization
    /// bypasses [`JwtPayload::new`].
    pub fn validate(&self) -> DomainResult<()> {
        if self.jti.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "jti".to_string(),
            }
            .into());
        }
        if self.iss.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "iss".to_string(),
            }
            .into());
        }
        match self.sub.parse::<i64>() {
            Ok(id) if id > 0 => {}
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "sub".to_string(),
                }
                .into());
            }
        }
        if self.aud.is_empty() || self.aud.iter().any(|a| a.is_empty()) {
            return Err(ValidationError::RequiredField {
                field: "aud".to_string(),
            }
            .into());
        }
        if self.exp <= self.iat {
            return Err(ValidationError::OutOfRange {
                field: "exp".to_string(),
                min: format!("{}", self.iat + 1),
                max: "-".to_string(),
            }
            .into());
        }
        if let Some(nbf) = self.nbf {
            if nbf > self.exp {
                return Err(ValidationError::OutOfRange {
                    field: "nbf".to_string(),
                    min: "-".to_string(),
                    max: format!("{}", self.exp),
                }
                .into());
            }
        }
        for claim in self.custom_claims.keys() {
            if RESERVED_CLAIMS.contains(&claim.as_str()) {
                return Err(ValidationError::ReservedClaim {
                    claim: claim.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Adds custom claims, re-checking the reserved-name invariant
    pub fn with_custom_claims(
        mut self,
        claims: HashMap<String, serde_json::Value>,
    ) -> DomainResult<Self> {
        self.custom_claims.extend(claims);
        self.validate()?;
        Ok(self)
    }

    /// Parses the subject back into a user id
    pub fn user_id(&self) -> DomainResult<i64> {
        self.sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                ValidationError::InvalidFormat {
                    field: "sub".to_string(),
                }
                .into()
            })
    }

    /// Expiration as a UTC timestamp
    pub fn expires_at(&self) -> DomainResult<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .ok_or_else(|| crate::errors::DomainError::Internal {
                message: format!("invalid exp timestamp {}", self.exp),
            })
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Checks whether the token is inside its validity window
    pub fn is_valid_now(&self) -> bool {
        let now = Utc::now().timestamp();
        now < self.exp && self.nbf.map_or(true, |nbf| now >= nbf)
    }
}
