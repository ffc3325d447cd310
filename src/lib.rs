//! Studydeck Server Library
//!
//! This crate exposes the core pipeline (PDF extraction, prompt building,
//! AI response normalization) and the router so tests can exercise the
//! HTTP surface without a running binary. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `extract`: PDF text extraction with reading-order reconstruction
//! - `ai`: provider client, prompt builders, and response normalizer
//! - `routes`: HTTP endpoints (upload, generation, health)

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod ai;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod text;

use state::AppState;

/// Build the application router with all routes and middleware layers.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body = state.config().server.max_upload_bytes;

    Router::new()
        .nest("/health", routes::health::router())
        .nest("/upload", routes::upload::router())
        .nest("/ai", routes::generate::router())
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
