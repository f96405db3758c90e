//! Course Host Server Library
//!
//! Hosts uploaded e-learning packages (SCORM, xAPI, cmi5): extracts them,
//! resolves their launch file and serves the extracted content with byte
//! range support. The binary is in main.rs; this crate also backs the
//! integration tests.
//!
//! # Modules
//!
//! - `package`: extraction, type detection and launch resolution
//! - `library`: catalog listing by directory scan
//! - `content`: path-safe file serving with range requests
//! - `storage`: on-disk layout and per-course extraction locks

pub mod config;
pub mod content;
pub mod error;
pub mod html;
pub mod library;
pub mod package;
pub mod routes;
pub mod state;
pub mod storage;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config().storage.max_upload_bytes;
    let public_dir = state.config().server.public_dir.clone();

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", routes::api_router(max_upload_bytes))
        .nest("/launch", routes::launch::router())
        .nest("/courses", routes::content::router())
        .nest("/xapi", routes::xapi::router());

    if public_dir.is_dir() {
        tracing::info!("Serving static UI from {}", public_dir.display());
        app = app.fallback_service(ServeDir::new(public_dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
