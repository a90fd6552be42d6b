/// Identity-Provider Client
///
/// Thin HTTP client for the provider interactions the filter needs:
/// building the authorization URL, exchanging the authorization code for
/// an access token, and fetching the user profile. Protocol concerns
/// beyond these three calls (discovery, ID-token validation, JWKS) are
/// the provider's business, not ours.
use serde::{Deserialize, Serialize};

use super::config::OidcConfig;
use super::error::AuthError;

/// Bearer token returned by the provider's token endpoint. Lives for the
/// duration of one callback request.
#[derive(Debug, Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

/// User profile returned by the provider's user-info endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// Unique user identifier at the provider
    pub sub: String,

    /// User's email address, the subject of the minted credential
    pub email: String,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub picture: Option<String>,
}

/// Token endpoint request body
#[derive(Debug, Serialize)]
struct TokenRequest {
    code: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    grant_type: String,
}

/// Token endpoint response; only the access token is carried forward
#[derive(Debug, Deserialize)]
struct TokenResponseRaw {
    access_token: String,
}

/// HTTP client bound to one configured identity provider.
pub struct ProviderClient {
    config: OidcConfig,
    http_client: reqwest::Client,
}

impl ProviderClient {
    pub fn new(config: OidcConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AuthError::HttpError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &OidcConfig {
        &self.config
    }

    /// Build the provider authorization URL carrying the shared state value.
    pub fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let mut url =
            url::Url::parse(&self.config.auth_url).map_err(|e| AuthError::InvalidConfig {
                key: "auth_url".to_string(),
                reason: e.to_string(),
            })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", &self.config.redirect_uri);
            query.append_pair("response_type", "code");
            query.append_pair("scope", &self.config.scopes.join(" "));
            query.append_pair("state", state);
        }

        Ok(url.to_string())
    }

    /// Exchange the authorization code for an access token. A failed
    /// exchange is terminal for the request; the user restarts the flow.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        let token_request = TokenRequest {
            code: code.to_string(),
            client_id: self.config.client_id.clone(),
            client_secret: self.config.client_secret.clone(),
            redirect_uri: self.config.redirect_uri.clone(),
            grant_type: "authorization_code".to_string(),
        };

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&token_request)
            .send()
            .await
            .map_err(|e| AuthError::CodeExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::CodeExchangeFailed(format!(
                "token endpoint returned {}: {}",
                status, error_text
            )));
        }

        let token_response: TokenResponseRaw = response.json().await.map_err(|e| {
            AuthError::CodeExchangeFailed(format!("failed to parse token response: {}", e))
        })?;

        Ok(AccessToken::new(token_response.access_token))
    }

    /// Fetch the user profile with the access token as bearer credential.
    pub async fn fetch_user_info(&self, token: &AccessToken) -> Result<UserInfo, AuthError> {
        let response = self
            .http_client
            .get(&self.config.userinfo_url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| AuthError::UserInfoFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::UserInfoFailed(format!(
                "user-info endpoint returned {}: {}",
                status, error_text
            )));
        }

        let user_info: UserInfo = response.json().await.map_err(|e| {
            AuthError::UserInfoFailed(format!("failed to parse user-info response: {}", e))
        })?;

        Ok(user_info)
    }
}
