//! Passport OCR Server
//!
//! Accepts passport scans (PNG/JPEG) or PDFs, runs OCR over every page and
//! returns the recognized text together with the extracted passport fields.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passport_ocr_server::config::Config;
use passport_ocr_server::routes;
use passport_ocr_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "passport_ocr_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;

    tracing::info!("Starting Passport OCR Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("OCR languages: {}", config.ocr.tesseract_languages());
    tracing::info!("Scratch directory: {}", config.ingest.scratch_dir.display());
    tracing::info!("PDF render resolution: {} dpi", config.ingest.render_dpi);

    std::fs::create_dir_all(&config.ingest.scratch_dir)
        .with_context(|| format!("Cannot create {}", config.ingest.scratch_dir.display()))?;

    // Recognizer and rasterizer are built once and shared by all requests
    let app_state = AppState::from_config(config.clone()).context("Invalid configuration")?;

    if !app_state.ocr().is_available().await {
        tracing::warn!(
            "OCR engine '{}' is not available; uploads will fail until it is installed",
            app_state.ocr().recognizer_name()
        );
    }
    if !app_state.ingestor().rasterizer_available().await {
        tracing::warn!(
            "PDF rasterizer '{}' is not available; PDF uploads will fail",
            app_state.ingestor().rasterizer_name()
        );
    }

    let app = routes::router(app_state);

    // Start server with graceful shutdown
    let ip = config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid SERVER_HOST '{}'", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);
    tracing::info!("Passport OCR Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
