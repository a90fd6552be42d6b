/// OIDC Request Filter
///
/// Request-interception middleware over three fixed admin-API paths:
/// login redirects the browser to the identity provider, callback turns
/// the provider's authorization code into a short-lived signed session
/// credential handed off via a transient cookie, logout expires the
/// session cookie. Every other request passes through to the next
/// handler untouched.
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

use super::config::{OidcConfig, TokenConfig};
use super::error::AuthError;
use super::provider::ProviderClient;
use super::token::SessionClaims;

/// Transient cookie carrying the freshly minted credential to the browser.
pub const HANDOFF_COOKIE: &str = "oidc_user_token";

/// Named session cookie whose presence gates logout.
pub const SESSION_COOKIE: &str = "oidc";

// Short-lived on purpose. The next page load is expected to read the
// credential, move it into persistent client storage and drop the cookie.
const HANDOFF_COOKIE_MAX_AGE: i64 = 30;

const LOGIN_PATH: &str = "/apisix/admin/oidc/login";
const CALLBACK_PATH: &str = "/apisix/admin/oidc/callback";
const LOGOUT_PATH: &str = "/apisix/admin/oidc/logout";

/// The filter handles exactly one of these per request, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidcRoute {
    Login,
    Callback,
    Logout,
}

impl OidcRoute {
    /// Exact-match dispatch; `None` is the pass-through branch.
    pub fn match_path(path: &str) -> Option<Self> {
        match path {
            LOGIN_PATH => Some(OidcRoute::Login),
            CALLBACK_PATH => Some(OidcRoute::Callback),
            LOGOUT_PATH => Some(OidcRoute::Logout),
            _ => None,
        }
    }
}

/// Immutable per-process state shared by all requests. Constructed once
/// at startup; requests only ever read it, so no locking is involved.
pub struct OidcState {
    provider: ProviderClient,
    token: TokenConfig,
    state: String,
}

impl OidcState {
    pub fn new(oidc: OidcConfig, token: TokenConfig) -> Result<Self, AuthError> {
        let state = oidc.state.clone();
        let provider = ProviderClient::new(oidc)?;

        Ok(Self {
            provider,
            token,
            state,
        })
    }

    pub fn provider(&self) -> &ProviderClient {
        &self.provider
    }
}

/// Callback query parameters from the provider's redirect
#[derive(Debug, Default, Deserialize)]
struct CallbackParams {
    state: Option<String>,
    code: Option<String>,
}

/// The middleware entry point. Dispatches on the exact request path;
/// anything that is not one of the three OIDC paths is forwarded to the
/// next handler with no side effects.
pub async fn oidc_filter(
    State(oidc): State<Arc<OidcState>>,
    req: Request,
    next: Next,
) -> Response {
    match OidcRoute::match_path(req.uri().path()) {
        Some(OidcRoute::Login) => handle_login(&oidc),
        Some(OidcRoute::Callback) => handle_callback(&oidc, req).await,
        Some(OidcRoute::Logout) => handle_logout(req.headers()),
        None => next.run(req).await,
    }
}

/// Redirect the browser to the provider authorization URL carrying the
/// shared state value.
fn handle_login(oidc: &OidcState) -> Response {
    match oidc.provider.authorization_url(&oidc.state) {
        Ok(url) => redirect(StatusCode::FOUND, &url),
        Err(e) => {
            error!("failed to build authorization URL: {}", e);
            status_response(&e)
        }
    }
}

async fn handle_callback(oidc: &OidcState, req: Request) -> Response {
    match run_callback(oidc, req).await {
        Ok(response) => response,
        Err(e) => {
            match &e {
                AuthError::SigningFailed(_) => error!("{}", e),
                _ => warn!("{}", e),
            }
            status_response(&e)
        }
    }
}

/// The callback sequence, short-circuiting on first failure. The handoff
/// cookie is only written after state match, code exchange and user-info
/// retrieval have all succeeded.
async fn run_callback(oidc: &OidcState, req: Request) -> Result<Response, AuthError> {
    let params: CallbackParams =
        serde_urlencoded::from_str(req.uri().query().unwrap_or_default()).unwrap_or_default();

    // A missing state parameter counts as a mismatch.
    if params.state.as_deref() != Some(oidc.state.as_str()) {
        return Err(AuthError::StateMismatch);
    }

    let code = params.code.unwrap_or_default();
    let access_token = oidc.provider.exchange_code(&code).await?;
    let user_info = oidc.provider.fetch_user_info(&access_token).await?;

    let claims = SessionClaims::new(&user_info.email, oidc.token.expire_time);
    let signed = claims.sign(&oidc.token.secret)?;

    let mut response = redirect(StatusCode::TEMPORARY_REDIRECT, "/");
    set_cookie(&mut response, &handoff_cookie(&signed));

    Ok(response)
}

/// Expire the session cookie if one is present; 403 when there is
/// nothing to log out.
fn handle_logout(headers: &HeaderMap) -> Response {
    match find_cookie(headers, SESSION_COOKIE) {
        Some(_) => {
            let mut response = StatusCode::OK.into_response();
            set_cookie(&mut response, &expired_cookie(SESSION_COOKIE));
            response
        }
        None => {
            warn!("logout requested without a session cookie");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// Locate a cookie by name. Absence stays observable as `None` rather
/// than a sentinel value.
fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                let (cookie_name, value) = cookie.trim().split_once('=')?;
                if cookie_name == name {
                    Some(value.to_string())
                } else {
                    None
                }
            })
        })
}

fn handoff_cookie(value: &str) -> String {
    // Not HttpOnly: the frontend must read the credential out of it.
    format!(
        "{}={}; Path=/; Max-Age={}",
        HANDOFF_COOKIE, value, HANDOFF_COOKIE_MAX_AGE
    )
}

fn expired_cookie(name: &str) -> String {
    format!("{}=; Path=/; Max-Age=-1", name)
}

fn set_cookie(response: &mut Response, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
}

fn redirect(status: StatusCode, location: &str) -> Response {
    let mut response = status.into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

fn status_response(error: &AuthError) -> Response {
    StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        .into_response()
}
