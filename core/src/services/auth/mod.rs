//! Authentication service module for the session lifecycle
//!
//! This module orchestrates login, refresh rotation, logout, full-user
//! revocation and per-request access verification over the refresh-token
//! store, the blacklist service and the two collaborator seams
//! (`TokenSigner`, `CredentialValidator`).

mod config;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::{AuthConfig, ACCESS_TOKEN_EXPIRY_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS};
pub use service::AuthenticationService;
pub use traits::{AuthenticatedUser, CredentialValidator, TokenSigner};
