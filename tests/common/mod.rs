use oidc_filter::auth::{OidcConfig, TokenConfig};
use oidc_filter::config::Config;
use oidc_filter::start_server_with_config;
use std::time::Duration;
use tokio::sync::oneshot;

pub const TEST_STATE: &str = "test-state-value";
pub const TEST_SECRET: &str = "integration-test-signing-secret!";

/// Test server with automatic port selection and shutdown on drop
pub struct TestServer {
    port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let port = start_server_with_config(config, shutdown_rx).await?;

        Ok(Self {
            port,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Configuration pointing at a mock identity provider on `provider_port`
pub fn test_config(provider_port: u16) -> Config {
    let provider = format!("http://127.0.0.1:{}", provider_port);

    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        oidc: OidcConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            auth_url: format!("{}/authorize", provider),
            token_url: format!("{}/token", provider),
            userinfo_url: format!("{}/userinfo", provider),
            redirect_uri: "http://127.0.0.1/apisix/admin/oidc/callback".to_string(),
            scopes: vec!["openid".to_string(), "email".to_string()],
            state: TEST_STATE.to_string(),
        },
        token: TokenConfig {
            secret: TEST_SECRET.to_string(),
            expire_time: 600,
        },
    }
}

/// Wait until the server accepts connections
pub async fn wait_for_server(port: u16, attempts: u32) -> anyhow::Result<()> {
    for _ in 0..attempts {
        if tokio::net::TcpStream::connect(("127.0.0.1", port))
            .await
            .is_ok()
        {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    anyhow::bail!("server did not become ready on port {}", port)
}
