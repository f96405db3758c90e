//! Course catalog routes

use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::library::{list_courses, Course};
use crate::state::AppState;

/// Create the catalog router
pub fn router() -> Router<AppState> {
    Router::new().route("/courses", get(get_courses))
}

/// GET /api/courses
///
/// Every extracted course, rebuilt from the content root.
async fn get_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>> {
    let courses = list_courses(state.store().courses_dir()).await?;
    tracing::debug!(count = courses.len(), "Listed courses");
    Ok(Json(courses))
}
