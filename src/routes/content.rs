//! Course content routes
//!
//! Serves extracted course files with range support for media.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};

use crate::content::serve_course_file;
use crate::error::Result;
use crate::state::AppState;

/// Create the content router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:course_id", get(serve_course_root))
        .route("/:course_id/*path", get(serve_course_path))
}

/// GET /courses/:course_id
async fn serve_course_root(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    serve_course_file(state.store(), &course_id, "", &headers).await
}

/// GET /courses/:course_id/*path
async fn serve_course_path(
    State(state): State<AppState>,
    Path((course_id, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response> {
    serve_course_file(state.store(), &course_id, &path, &headers).await
}
