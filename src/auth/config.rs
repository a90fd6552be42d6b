// OIDC Configuration
// Provider endpoints, the shared anti-forgery state, and signing settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::AuthError;

/// Identity-provider endpoints and client credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// OAuth2 client ID registered with the provider
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Provider authorization endpoint the login redirect points at
    pub auth_url: String,

    /// Provider token endpoint for the code exchange
    pub token_url: String,

    /// Provider user-info endpoint
    pub userinfo_url: String,

    /// Callback URL registered with the provider
    pub redirect_uri: String,

    /// OAuth2 scopes
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Shared anti-forgery value echoed through the redirect round-trip.
    /// Constant for the process lifetime.
    pub state: String,
}

impl OidcConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.client_id.is_empty() {
            return Err(AuthError::InvalidConfig {
                key: "client_id".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.client_secret.is_empty() {
            return Err(AuthError::InvalidConfig {
                key: "client_secret".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.state.is_empty() {
            return Err(AuthError::InvalidConfig {
                key: "state".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        for (key, value) in [
            ("auth_url", &self.auth_url),
            ("token_url", &self.token_url),
            ("userinfo_url", &self.userinfo_url),
            ("redirect_uri", &self.redirect_uri),
        ] {
            url::Url::parse(value).map_err(|e| AuthError::InvalidConfig {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// Session-credential signing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Symmetric signing secret
    pub secret: String,

    /// Credential lifetime in seconds (default: 1 hour)
    #[serde(default = "default_expire_time")]
    pub expire_time: u64,
}

impl TokenConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidConfig {
                key: "secret".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.expire_time < 60 {
            return Err(AuthError::InvalidConfig {
                key: "expire_time".to_string(),
                reason: "must be at least 60 seconds".to_string(),
            });
        }

        Ok(())
    }

    /// Get the credential lifetime as Duration
    pub fn expire_duration(&self) -> Duration {
        Duration::from_secs(self.expire_time)
    }
}

// Default value functions
fn default_scopes() -> Vec<String> {
    vec![
        "openid".to_string(),
        "email".to_string(),
        "profile".to_string(),
    ]
}

fn default_expire_time() -> u64 {
    3600
}
