//! Configuration for the authentication service

/// Default access token lifetime (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Default refresh token lifetime (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Configuration for [`super::AuthenticationService`]
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Issuer claim stamped into every token
    pub issuer: String,
    /// Audience claims stamped into every token
    pub audience: Vec<String>,
    /// Access token lifetime in minutes
    pub access_token_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_token_ttl_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "sentra".to_string(),
            audience: vec!["sentra-api".to_string()],
            access_token_ttl_minutes: ACCESS_TOKEN_EXPIRY_MINUTES,
            refresh_token_ttl_days: REFRESH_TOKEN_EXPIRY_DAYS,
        }
    }
}
