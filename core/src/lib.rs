//! # Sentra Core
//!
//! Core business logic and domain layer for the Sentra session backend.
//! This crate contains the token-lifecycle domain objects, business
//! services, store interfaces, and error types: access/refresh pair
//! issuance, refresh rotation, multi-device session tracking, and token
//! revocation via a blacklist with expiry-driven cleanup.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
