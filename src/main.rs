use dotenvy::dotenv;
use schoolhub::router::init_router;
use schoolhub::state::init_app_state;
use schoolhub::sync::spawn_sync_worker;
use schoolhub_config::AppConfig;
use schoolhub_observability::{init_metrics, init_tracing};
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "Server stopped with an error");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let address = config.server.bind_address();
    let metrics = init_metrics();

    let state = init_app_state(config, metrics).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sync = spawn_sync_worker(state.clone(), shutdown_rx);
    let app = init_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "🚀 Server running");
    info!("📚 Swagger UI available at http://{}/swagger-ui", address);
    info!("📖 Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = sync {
        let _ = handle.await;
    }
    state.persist_sessions().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
