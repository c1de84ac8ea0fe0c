//! Authentication response value object returned by login.

use serde::{Deserialize, Serialize};

use super::token_pair::{TokenPair, TokenType};

/// Successful login result: the issued pair plus user identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Signed JWT access token
    pub access_token: String,

    /// Refresh token for obtaining the next pair
    pub refresh_token: String,

    /// Authentication scheme for the Authorization header
    pub token_type: TokenType,

    /// Access token lifetime remaining, in seconds
    pub expires_in: i64,

    /// Authenticated user id
    pub user_id: i64,

    /// Authenticated user email
    pub email: String,
}

impl AuthResponse {
    /// Builds a response from an issued pair and the authenticated user
    pub fn from_token_pair(pair: TokenPair, user_id: i64, email: String) -> Self {
        Self {
            expires_in: pair.access_expires_in(),
            token_type: pair.token_type,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user_id,
            email,
        }
    }
}
