// Session Credential
// Short-lived HS256 claim set minted after a successful callback

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// Issuer sentinel marking credentials minted by the OIDC flow. The
/// downstream authentication filter relies on it to skip the lookup of
/// the subject in the statically configured credential list.
pub const OIDC_ISSUER: &str = "oidc";

/// Signed claim set asserting the authenticated user's identity.
/// Immutable after signing; the signature is the only integrity
/// mechanism, there is no server-side session state or revocation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject, the authenticated user's email
    pub sub: String,

    /// Issuer, always [`OIDC_ISSUER`] for credentials from this flow
    pub iss: String,

    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for a credential issued now, expiring `expire_time` seconds later.
    pub fn new(subject: &str, expire_time: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject.to_string(),
            iss: OIDC_ISSUER.to_string(),
            iat: now,
            exp: now + expire_time as i64,
        }
    }

    /// Sign the claims with the configured symmetric secret (HS256).
    pub fn sign(&self, secret: &str) -> Result<String, AuthError> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::SigningFailed(e.to_string()))
    }

    /// Verify the signature and decode the claims. Rejects expired
    /// credentials and any issuer other than [`OIDC_ISSUER`].
    pub fn decode(token: &str, secret: &str) -> Result<Self, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[OIDC_ISSUER]);

        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(data.claims)
    }
}
