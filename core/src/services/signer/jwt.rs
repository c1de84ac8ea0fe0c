//! Default HS256 implementation of the TokenSigner seam

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::value_objects::jwt_payload::JwtPayload;
use crate::errors::{DomainResult, TokenError};
use crate::services::auth::TokenSigner;

use super::config::SignerConfig;

/// JWT signer/verifier backed by `jsonwebtoken` with a symmetric key
pub struct JwtTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    decode_validation: Validation,
}

impl JwtTokenSigner {
    /// Creates a signer from configuration
    pub fn new(config: SignerConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&config.audience);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        // Claims-only decoding for logout: signature and expiry are not
        // enforced, the payload is still shape-checked.
        let mut decode_validation = Validation::new(Algorithm::HS256);
        decode_validation.insecure_disable_signature_validation();
        decode_validation.required_spec_claims.clear();
        decode_validation.validate_exp = false;
        decode_validation.validate_nbf = false;
        decode_validation.validate_aud = false;

        Self {
            encoding_key,
            decoding_key,
            validation,
            decode_validation,
        }
    }

    fn map_decode_error(error: jsonwebtoken::errors::Error) -> TokenError {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => TokenError::InvalidClaims,
            _ => TokenError::MalformedToken,
        }
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, claims: &JwtPayload) -> DomainResult<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed.into())
    }

    fn verify(&self, token: &str) -> DomainResult<JwtPayload> {
        let data = decode::<JwtPayload>(token, &self.decoding_key, &self.validation)
            .map_err(Self::map_decode_error)?;

        data.claims
            .validate()
            .map_err(|_| TokenError::InvalidClaims)?;

        Ok(data.claims)
    }

    fn decode(&self, token: &str) -> DomainResult<JwtPayload> {
        let data = decode::<JwtPayload>(token, &self.decoding_key, &self.decode_validation)
            .map_err(|_| TokenError::MalformedToken)?;

        data.claims
            .validate()
            .map_err(|_| TokenError::InvalidClaims)?;

        Ok(data.claims)
    }
}
