use crate::auth::{AuthError, OidcConfig, TokenConfig};

/// Process-wide configuration, loaded once at startup and treated as
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub oidc: OidcConfig,
    pub token: TokenConfig,
}

impl Config {
    /// Create config from environment variables. The shared anti-forgery
    /// state is generated per process when not supplied.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("OIDC_FILTER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("OIDC_FILTER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(9000),
            oidc: OidcConfig {
                client_id: std::env::var("OIDC_CLIENT_ID").unwrap_or_default(),
                client_secret: std::env::var("OIDC_CLIENT_SECRET").unwrap_or_default(),
                auth_url: std::env::var("OIDC_AUTH_URL").unwrap_or_default(),
                token_url: std::env::var("OIDC_TOKEN_URL").unwrap_or_default(),
                userinfo_url: std::env::var("OIDC_USERINFO_URL").unwrap_or_default(),
                redirect_uri: std::env::var("OIDC_REDIRECT_URI").unwrap_or_default(),
                scopes: std::env::var("OIDC_SCOPES")
                    .map(|s| s.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_else(|_| default_scopes()),
                state: std::env::var("OIDC_STATE")
                    .unwrap_or_else(|_| uuid::Uuid::new_v4().simple().to_string()),
            },
            token: TokenConfig {
                secret: std::env::var("OIDC_JWT_SECRET").unwrap_or_default(),
                expire_time: std::env::var("OIDC_EXPIRE_TIME")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(3600),
            },
        }
    }

    /// Validate all sections; called once before serving.
    pub fn validate(&self) -> Result<(), AuthError> {
        self.oidc.validate()?;
        self.token.validate()?;
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_scopes() -> Vec<String> {
    vec![
        "openid".to_string(),
        "email".to_string(),
        "profile".to_string(),
    ]
}
