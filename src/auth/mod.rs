// OIDC Authentication
// Login/callback/logout interception for the admin API

pub mod config;
pub mod error;
pub mod filter;
pub mod provider;
pub mod token;

pub use config::{OidcConfig, TokenConfig};
pub use error::AuthError;
pub use filter::{HANDOFF_COOKIE, OidcRoute, OidcState, SESSION_COOKIE, oidc_filter};
pub use provider::{AccessToken, ProviderClient, UserInfo};
pub use token::{OIDC_ISSUER, SessionClaims};
