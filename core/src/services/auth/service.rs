//! Main authentication service implementation

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use crate::domain::entities::refresh_token::RefreshTokenRecord;
use crate::domain::value_objects::auth_response::AuthResponse;
use crate::domain::value_objects::blacklist_entry::{BlacklistReason, TokenKind};
use crate::domain::value_objects::device_info::DeviceInfo;
use crate::domain::value_objects::jwt_payload::JwtPayload;
use crate::domain::value_objects::token_pair::TokenPair;
use crate::errors::{AuthError, DomainResult, StorageError};
use crate::repositories::blacklist::BlacklistStore;
use crate::repositories::refresh_token::RefreshTokenStore;
use crate::services::blacklist::{BlacklistRequest, BlacklistService};

use super::config::AuthConfig;
use super::traits::{CredentialValidator, TokenSigner};

/// Authentication service orchestrating the session lifecycle
///
/// A session moves Issued -> Rotated (on refresh) -> Revoked (on logout or
/// cleanup) and never re-enters an earlier state. Every failure a caller
/// can observe is the generic [`AuthError::AuthenticationFailed`]; the
/// specific cause is logged, not returned.
pub struct AuthenticationService<S, V, R, B>
where
    S: TokenSigner,
    V: CredentialValidator,
    R: RefreshTokenStore,
    B: BlacklistStore,
{
    /// Signer for issuing and checking JWTs
    signer: Arc<S>,
    /// Credential check backing login
    credentials: Arc<V>,
    /// Session records, one per device
    refresh_tokens: Arc<R>,
    /// Revocation service consulted on every verification
    blacklist: Arc<BlacklistService<B>>,
    /// Service configuration
    config: AuthConfig,
}

impl<S, V, R, B> AuthenticationService<S, V, R, B>
where
    S: TokenSigner,
    V: CredentialValidator,
    R: RefreshTokenStore,
    B: BlacklistStore,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `signer` - Token signer/verifier
    /// * `credentials` - Credential validator backing login
    /// * `refresh_tokens` - Session record store
    /// * `blacklist` - Revocation service
    /// * `config` - Service configuration
    pub fn new(
        signer: Arc<S>,
        credentials: Arc<V>,
        refresh_tokens: Arc<R>,
        blacklist: Arc<BlacklistService<B>>,
        config: AuthConfig,
    ) -> Self {
        Self {
            signer,
            credentials,
            refresh_tokens,
            blacklist,
            config,
        }
    }

    /// Authenticate a user and open a session on the presenting device
    ///
    /// On success a fresh token pair is issued and a session record keyed by
    /// the refresh token's jti is created for the device. On a credential
    /// failure nothing is written.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Tokens plus the authenticated identity
    /// * `Err(AuthError::AuthenticationFailed)` - Credentials rejected
    /// * `Err(StorageError)` - Session store unreachable
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        device: &DeviceInfo,
    ) -> DomainResult<AuthResponse> {
        let user = self
            .credentials
            .validate(email, password)
            .await?
            .ok_or_else(|| {
                debug!(device_id = %device.device_id, "credential check rejected login");
                AuthError::AuthenticationFailed
            })?;

        let (pair, refresh_jti) = self.issue_session(user.id)?;

        let record = RefreshTokenRecord::new(
            refresh_jti,
            user.id,
            device.device_id.clone(),
            device.device_name.clone(),
            pair.refresh_token_expires_at,
        );
        self.create_record(record).await?;

        info!(
            user_id = user.id,
            device_id = %device.device_id,
            ip = %device.masked_ip_address(),
            "session opened"
        );

        Ok(AuthResponse::from_token_pair(pair, user.id, user.email))
    }

    /// Rotate a refresh token into a new token pair
    ///
    /// The presented token is verified, its session record consumed, and a
    /// brand-new pair (new access jti and new refresh jti) issued in its
    /// place. A refresh token is usable exactly once: presenting one whose
    /// record is gone - already rotated, revoked, or lost to a concurrent
    /// rotation - fails.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The replacement pair
    /// * `Err(AuthError::AuthenticationFailed)` - Signature/expiry rejected,
    ///   unknown or already-rotated token, or the concurrent-rotation race
    ///   was lost
    pub async fn refresh(&self, refresh_token: &str, device: &DeviceInfo) -> DomainResult<TokenPair> {
        let payload = self.signer.verify(refresh_token).map_err(|error| {
            debug!(%error, "refresh token rejected by signer");
            AuthError::AuthenticationFailed
        })?;
        let user_id = payload.user_id().map_err(|_| AuthError::AuthenticationFailed)?;

        if !self.refresh_tokens.exists_by_jti(&payload.jti).await? {
            warn!(jti = %payload.jti, "refresh with unknown or already-rotated token");
            return Err(AuthError::AuthenticationFailed.into());
        }

        let (pair, new_jti) = self.issue_session(user_id)?;

        // Single atomic arbiter for the rotation race: of two concurrent
        // refreshes presenting the same token, exactly one observes a
        // deleted row and may create the replacement record.
        if !self.refresh_tokens.delete_by_jti(&payload.jti).await? {
            warn!(jti = %payload.jti, "lost concurrent rotation, treating as replay");
            return Err(AuthError::AuthenticationFailed.into());
        }

        let record = RefreshTokenRecord::new(
            new_jti,
            user_id,
            device.device_id.clone(),
            device.device_name.clone(),
            pair.refresh_token_expires_at,
        );
        self.create_record(record).await?;

        info!(user_id, old_jti = %payload.jti, "session rotated");

        Ok(pair)
    }

    /// Close the session the token pair belongs to
    ///
    /// Both tokens are decoded (not signature-verified, so an expired pair
    /// can still be logged out) and blacklisted with reason Logout; the
    /// access token must be blacklisted too because it stays self-verifying
    /// until natural expiry. The session record is then deleted.
    ///
    /// Blacklisting is best-effort here: a storage failure is logged and
    /// logout proceeds, bounding the exposure to the access token's
    /// remaining minutes.
    pub async fn logout(&self, access_token: &str, refresh_token: &str) -> DomainResult<()> {
        let access = self.signer.decode(access_token).map_err(|error| {
            debug!(%error, "undecodable access token at logout");
            AuthError::AuthenticationFailed
        })?;
        let refresh = self.signer.decode(refresh_token).map_err(|error| {
            debug!(%error, "undecodable refresh token at logout");
            AuthError::AuthenticationFailed
        })?;

        for (payload, kind) in [(&access, TokenKind::Access), (&refresh, TokenKind::Refresh)] {
            let mut request = BlacklistRequest::new(
                payload.jti.clone(),
                kind,
                payload.expires_at()?,
                BlacklistReason::Logout,
            );
            request.user_id = payload.user_id().ok();

            match self.blacklist.blacklist_token(request).await {
                Ok(_) => {}
                Err(error) if error.is_storage() => {
                    warn!(jti = %payload.jti, %error, "best-effort logout blacklisting failed");
                }
                Err(error) => return Err(error),
            }
        }

        let removed = self.refresh_tokens.delete_by_jti(&refresh.jti).await?;
        if !removed {
            debug!(jti = %refresh.jti, "session record already absent at logout");
        }

        info!(jti = %refresh.jti, "session closed");
        Ok(())
    }

    /// Revoke every session a user holds, across all devices
    ///
    /// Used by the security-breach, device-lost, password-changed and
    /// account-suspended flows. Unlike logout this is fail-closed: a
    /// storage failure aborts the sweep and propagates.
    ///
    /// # Returns
    ///
    /// * `Ok(count)` - Session records removed
    pub async fn revoke_user_sessions(
        &self,
        user_id: i64,
        reason: BlacklistReason,
    ) -> DomainResult<usize> {
        let records = self.refresh_tokens.find_by_user_id(user_id).await?;
        if records.is_empty() {
            return Ok(0);
        }

        let requests = records
            .iter()
            .map(|record| {
                let mut request = BlacklistRequest::new(
                    record.jti.clone(),
                    TokenKind::Refresh,
                    record.expires_at,
                    reason,
                );
                request.user_id = Some(user_id);
                request.device_id = Some(record.device_id.clone());
                request
            })
            .collect();
        self.blacklist.blacklist_tokens(requests).await?;

        let mut removed = 0;
        for record in &records {
            if self.refresh_tokens.delete_by_jti(&record.jti).await? {
                removed += 1;
            }
        }

        info!(user_id, removed, %reason, "revoked all sessions for user");
        Ok(removed)
    }

    /// Verify an access token for one request
    ///
    /// Signature/expiry first, then the blacklist under the configured
    /// failure policy. This is the gate an HTTP layer calls before trusting
    /// the payload.
    pub async fn verify_access(&self, access_token: &str) -> DomainResult<JwtPayload> {
        let payload = self.signer.verify(access_token).map_err(|error| {
            debug!(%error, "access token rejected by signer");
            AuthError::AuthenticationFailed
        })?;

        if self.blacklist.check_blacklisted(&payload.jti).await? {
            debug!(jti = %payload.jti, "access token is blacklisted");
            return Err(AuthError::AuthenticationFailed.into());
        }

        Ok(payload)
    }

    /// Issue a fresh token pair, returning it with the refresh jti
    fn issue_session(&self, user_id: i64) -> DomainResult<(TokenPair, String)> {
        let access_claims = JwtPayload::issue(
            user_id,
            &self.config.issuer,
            &self.config.audience,
            Duration::minutes(self.config.access_token_ttl_minutes),
        )?;
        let refresh_claims = JwtPayload::issue(
            user_id,
            &self.config.issuer,
            &self.config.audience,
            Duration::days(self.config.refresh_token_ttl_days),
        )?;

        let access_token = self.signer.sign(&access_claims)?;
        let refresh_token = self.signer.sign(&refresh_claims)?;

        let pair = TokenPair::new(
            access_token,
            refresh_token,
            access_claims.expires_at()?,
            refresh_claims.expires_at()?,
        )?;

        Ok((pair, refresh_claims.jti))
    }

    /// Persist a session record, flagging jti collisions loudly
    async fn create_record(&self, record: RefreshTokenRecord) -> DomainResult<()> {
        let jti = record.jti.clone();
        self.refresh_tokens.create(record).await.map_err(|error| {
            if let crate::errors::DomainError::Storage(StorageError::DuplicateKey { .. }) = &error {
                // jtis are v4 UUIDs; a collision means something is broken.
                error!(jti = %jti, "refresh token jti collision on create");
            }
            error
        })
    }
}
