/// Mock identity provider for testing the OIDC flow end-to-end.
/// Serves the token and user-info endpoints the callback handler calls,
/// with switchable failure modes per endpoint.
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;

#[derive(Clone)]
pub struct ProviderBehavior {
    /// Respond 400 from the token endpoint
    pub fail_token: bool,

    /// Respond 401 from the user-info endpoint
    pub fail_userinfo: bool,

    /// Email returned by the user-info endpoint
    pub email: String,
}

impl Default for ProviderBehavior {
    fn default() -> Self {
        Self {
            fail_token: false,
            fail_userinfo: false,
            email: "admin@example.com".to_string(),
        }
    }
}

pub struct MockProvider {
    pub port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockProvider {
    /// Start a mock provider on a random available port
    pub async fn start(behavior: ProviderBehavior) -> anyhow::Result<Self> {
        let app = Router::new()
            .route("/token", post(handle_token))
            .route("/userinfo", get(handle_userinfo))
            .with_state(Arc::new(behavior));

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock provider failed to start");
        });

        // Give the provider a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Ok(Self {
            port,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Base URL of an endpoint on this provider
    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle_token(State(behavior): State<Arc<ProviderBehavior>>) -> Response {
    if behavior.fail_token {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": "mock-access-token",
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .into_response()
}

async fn handle_userinfo(State(behavior): State<Arc<ProviderBehavior>>) -> Response {
    if behavior.fail_userinfo {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_token"})),
        )
            .into_response();
    }

    Json(json!({
        "sub": "mock-user-1",
        "email": behavior.email,
        "email_verified": true,
        "name": "Mock User"
    }))
    .into_response()
}
