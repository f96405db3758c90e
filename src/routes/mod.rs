//! Route modules for Course Host Server

pub mod content;
pub mod courses;
pub mod health;
pub mod launch;
pub mod upload;
pub mod xapi;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Routes under `/api`
pub fn api_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(courses::router())
        .merge(upload::router(max_upload_bytes))
}
