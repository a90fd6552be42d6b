// Authentication Error Types
// Failures in the OIDC flow and their HTTP status mapping

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    // Callback failures, all terminal for the current request
    #[error("the state does not match")]
    StateMismatch,

    #[error("exchange code for token failed: {0}")]
    CodeExchangeFailed(String),

    #[error("exchange access token for user info failed: {0}")]
    UserInfoFailed(String),

    // Logout without anything to log out
    #[error("no session cookie present")]
    NoSession,

    // Credential handling
    #[error("failed to sign session token: {0}")]
    SigningFailed(String),

    #[error("invalid session token: {0}")]
    InvalidToken(String),

    // Configuration errors, surfaced at startup
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    // Transport-level errors outside the exchange/user-info calls
    #[error("HTTP request failed: {0}")]
    HttpError(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::HttpError(err.to_string())
    }
}

impl AuthError {
    /// HTTP status the filter responds with when this error aborts a request.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::StateMismatch
            | AuthError::CodeExchangeFailed(_)
            | AuthError::UserInfoFailed(_)
            | AuthError::NoSession => 403,

            AuthError::InvalidToken(_) => 401,

            AuthError::SigningFailed(_) | AuthError::InvalidConfig { .. } => 500,

            AuthError::HttpError(_) => 502,
        }
    }
}
