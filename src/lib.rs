use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::any};
use axum_server::{Handle, Server};
use tracing::{debug, error, info};

pub mod auth;
pub mod config;

use auth::{OidcState, oidc_filter};
use config::Config;

/// Admin routes sitting behind the filter. The callback redirects to
/// `/`, where the dashboard frontend reads the credential out of the
/// handoff cookie and moves it into persistent client storage.
fn admin_router() -> Router {
    Router::new().route("/", any(index))
}

async fn index() -> &'static str {
    "admin interface"
}

/// The full application: admin routes wrapped by the OIDC filter. The
/// filter layer runs for every request, including paths no inner route
/// matches, so the three OIDC paths need no route registrations.
pub fn build_app(oidc: Arc<OidcState>) -> Router {
    admin_router().layer(middleware::from_fn_with_state(oidc, oidc_filter))
}

pub async fn start_server(shutdown_rx: tokio::sync::oneshot::Receiver<()>) -> anyhow::Result<u16> {
    start_server_with_config(Config::from_env(), shutdown_rx).await
}

/// Starts the server and returns the bound port once it is listening.
/// The server keeps running until the shutdown receiver fires.
pub async fn start_server_with_config(
    config: Config,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> anyhow::Result<u16> {
    config.validate()?;

    let oidc = Arc::new(OidcState::new(config.oidc.clone(), config.token.clone())?);
    let app = build_app(oidc);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    let handle = Handle::new();
    let server = Server::bind(addr)
        .handle(handle.clone())
        .serve(app.into_make_service());

    let server_handle = handle.clone();
    tokio::spawn(async move {
        tokio::select! {
            res = server => {
                if let Err(e) = res {
                    error!("server error: {}", e);
                }
            }
            _ = shutdown_rx => {
                server_handle.shutdown();
            }
        }
    });

    let bound = handle
        .listening()
        .await
        .ok_or_else(|| anyhow::anyhow!("server failed to bind {}", addr))?;

    info!("listening on {}", bound);
    debug!(
        "Server configuration - host: {}, port: {}",
        config.host,
        bound.port()
    );

    Ok(bound.port())
}
