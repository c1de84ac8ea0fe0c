//! Immutable value objects shared across the session services.

pub mod auth_response;
pub mod blacklist_entry;
pub mod device_info;
pub mod jwt_payload;
pub mod token_pair;

// Re-export commonly used types
pub use auth_response::AuthResponse;
pub use blacklist_entry::{
    BlacklistReason, CleanupPriority, TokenBlacklistEntry, TokenKind, MAX_METADATA_BYTES,
};
pub use device_info::{mask_ip_address, DeviceInfo, MAX_USER_AGENT_LENGTH};
pub use jwt_payload::{JwtPayload, RESERVED_CLAIMS};
pub use token_pair::{TokenPair, TokenType, MAX_REFRESH_TOKEN_LENGTH, MIN_REFRESH_TOKEN_LENGTH};
