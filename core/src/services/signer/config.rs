//! Configuration for the default JWT signer

/// Configuration for [`super::JwtTokenSigner`]
///
/// The default signer is symmetric (HS256); asymmetric key management is
/// outside this subsystem.
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// JWT signing secret
    pub secret: String,
    /// Issuer pinned into every token and required on verification
    pub issuer: String,
    /// Audiences pinned into every token and required on verification
    pub audience: Vec<String>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-please-change-in-production".to_string(),
            issuer: "sentra".to_string(),
            audience: vec!["sentra-api".to_string()],
        }
    }
}
