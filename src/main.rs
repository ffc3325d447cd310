//! Studydeck Server
//!
//! HTTP service that extracts text from uploaded PDFs and generates study
//! Q&A decks and mind maps through the Gemini API.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studydeck_server::ai::client::{GeminiClient, TextGenerator};
use studydeck_server::config::Config;
use studydeck_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studydeck_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing API credential is fatal at startup
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("Configuration error: {}", e);
        std::process::exit(1);
    });

    tracing::info!("Starting Studydeck Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using Gemini model: {}", config.ai.model);
    tracing::info!("PDF extraction backend: mupdf");

    let generator: Arc<dyn TextGenerator> = Arc::new(
        GeminiClient::new(&config.ai).unwrap_or_else(|e| {
            tracing::error!("Failed to build AI client: {}", e);
            std::process::exit(1);
        }),
    );

    // Connectivity check; a failing provider is logged but not fatal
    match generator.generate("Say 'OK' in one word.").await {
        Ok(_) => tracing::info!("Gemini connected: {}", generator.model()),
        Err(e) => tracing::warn!("Gemini connection check failed: {}", e),
    }

    let addr = SocketAddr::new(
        config.server.host.parse().unwrap_or_else(|e| {
            tracing::error!("Invalid SERVER_HOST '{}': {}", config.server.host, e);
            std::process::exit(1);
        }),
        config.server.port,
    );

    let app = studydeck_server::app(AppState::new(config, generator));

    tracing::info!("Studydeck Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
