use explorer_service::{api, blockchain, config::Config, state::AppState};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting explorer-service");

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    // Upstream clients
    let main_client = blockchain::MainClient::new(&config)?;
    let scan_client = blockchain::ScanClient::new(&config)?;

    // Start epoch metrics polling
    let shutdown = CancellationToken::new();
    let (epoch_indicator, poller) = blockchain::start_epoch_polling(
        scan_client.clone(),
        config.epoch_poll_interval,
        shutdown.clone(),
    );

    // Create shared state
    let addr = config.listen_addr();
    let app_state = Arc::new(AppState::new(config, main_client, scan_client, epoch_indicator));

    // Start HTTP server
    let app = api::create_router(app_state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Starting server on {}", addr);

    let server_shutdown = shutdown.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
                _ = server_shutdown.cancelled() => {}
            }
        })
        .await;

    shutdown.cancel();
    if let Err(e) = poller.await {
        error!("Epoch poller terminated abnormally: {}", e);
    }

    served?;
    info!("Server stopped");
    Ok(())
}
