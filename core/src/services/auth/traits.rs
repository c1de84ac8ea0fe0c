//! Collaborator seams consumed by the authentication service.

use async_trait::async_trait;

use crate::domain::value_objects::jwt_payload::JwtPayload;
use crate::errors::DomainResult;

/// Signs and verifies JWTs
///
/// The cryptography behind this seam (key material, algorithms, rotation)
/// is not part of this subsystem; [`crate::services::signer::JwtTokenSigner`]
/// is the default implementation.
pub trait TokenSigner: Send + Sync {
    /// Serialize and sign a payload into a compact JWT
    fn sign(&self, claims: &JwtPayload) -> DomainResult<String>;

    /// Verify signature, expiry and pinned issuer/audience, returning the
    /// validated claims
    ///
    /// # Returns
    /// * `Err(TokenError::TokenExpired | TokenNotYetValid | InvalidSignature |
    ///   InvalidClaims | MalformedToken)` on rejection
    fn verify(&self, token: &str) -> DomainResult<JwtPayload>;

    /// Decode claims without enforcing signature or expiry
    ///
    /// Used by logout, which must still be able to read the jti/expiry of a
    /// token that has already expired. Never trust a decoded payload for
    /// authorization.
    fn decode(&self, token: &str) -> DomainResult<JwtPayload>;
}

/// User identity confirmed by a credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
}

/// Validates login credentials against whatever user store backs the product
///
/// Password hashing and credential storage live behind this seam.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// # Returns
    /// * `Ok(Some(user))` - Credentials accepted
    /// * `Ok(None)` - Credentials rejected; the caller reports a generic
    ///   authentication failure without revealing which check failed
    async fn validate(&self, email: &str, password: &str)
        -> DomainResult<Option<AuthenticatedUser>>;
}
