use oidc_filter::{config::Config, start_server_with_config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let port = start_server_with_config(Config::from_env(), shutdown_rx).await?;
    println!("listening on port {}", port);

    // Wait for Ctrl-C, then give in-flight requests a short grace period
    tokio::signal::ctrl_c().await?;
    println!("shutdown requested, stopping server...");
    let _ = shutdown_tx.send(());
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    println!("server stopped");
    Ok(())
}
