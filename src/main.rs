use drive_relay::{create_router, services, AppState, Settings, StagingArea};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().expect("ERROR: Invalid configuration");

    tracing::info!(
        "Starting drive-relay, sharing created resources with {}",
        settings.share_email
    );

    let drive = services::create_drive_service(&settings.credentials_file)
        .expect("ERROR: Failed to create Google Drive client. Check GOOGLE_CREDENTIALS_FILE.");

    let staging = StagingArea::create(&settings.upload_dir)
        .await
        .expect("ERROR: Failed to create upload staging directory. Check UPLOAD_DIR.");

    let port = settings.port;
    let router = create_router(AppState::new(settings, drive, staging));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}
