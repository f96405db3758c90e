//! Launch routes
//!
//! `/launch/:course_id` is the stable entry point handed out by uploads and
//! the catalog. The launch file is re-resolved on every request, so a
//! re-uploaded package with a different entry file keeps working under the
//! same URL.

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::content::{course_file_url, SafePath};
use crate::error::{AppError, Result};
use crate::html::{render_launch_page, XapiLaunchParams};
use crate::package::{resolve, LaunchSource};
use crate::state::AppState;

/// Create the launch router
pub fn router() -> Router<AppState> {
    Router::new().route("/:course_id", get(launch_course))
}

/// GET /launch/:course_id
///
/// xAPI packages whose manifest names the launch file get an interstitial
/// page carrying the xAPI launch parameters; everything else is redirected
/// straight to the launch file.
async fn launch_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Response> {
    let course_dir = state
        .store()
        .course_dir(&course_id)
        .map_err(|_| AppError::NotFound("Course not found".to_string()))?;

    match tokio::fs::metadata(&course_dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(AppError::NotFound("Course not found".to_string())),
    }

    let launch = tokio::task::spawn_blocking(move || resolve(&course_dir))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| match e {
            AppError::NoLaunchFound(_) => {
                AppError::NotFound("No launch file found for this course".to_string())
            }
            other => other,
        })?;

    let launch_path = SafePath::parse(&launch.launch_file)?;
    let file_url = course_file_url(&course_id, &launch_path.encoded());

    if launch.source == LaunchSource::Manifest {
        let params = XapiLaunchParams::new(&state.config().server.public_base_url, &course_id);
        let target = format!("{}?{}", file_url, params.to_query());

        tracing::info!(
            course_id = %course_id,
            launch_file = %launch.launch_file,
            registration = %params.registration,
            "Launching xAPI course"
        );

        return Ok((
            [(header::CACHE_CONTROL, "no-store")],
            Html(render_launch_page(&target)),
        )
            .into_response());
    }

    tracing::info!(
        course_id = %course_id,
        course_type = %launch.course_type,
        launch_file = %launch.launch_file,
        "Redirecting to launch file"
    );

    Ok(Redirect::temporary(&file_url).into_response())
}
