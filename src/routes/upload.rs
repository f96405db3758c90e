//! Upload Routes
//!
//! Endpoints:
//! - POST /api/upload - Upload a course package (multipart)
//!
//! Multipart fields:
//! - `courseFile` (or `file`): the ZIP archive
//! - `courseId` (optional): overrides the id derived from the file name

use std::path::PathBuf;

use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::library::launch_url;
use crate::package::{install_package, validate_archive_name, CourseType};
use crate::state::AppState;
use crate::storage::{course_id_from_file_name, CourseStore};

/// Create the upload router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_course))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Response after a successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub course_id: String,
    pub launch_url: String,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    /// Resolved entry file, relative to the course root
    pub launch_file: String,
    /// SHA-256 of the staged archive
    pub archive_sha256: String,
}

/// An uploaded archive written to the staging directory
struct StagedArchive {
    path: PathBuf,
    file_name: String,
    size: u64,
    sha256: String,
}

/// POST /api/upload
///
/// Stage the archive, then extract and resolve it under the course's lock.
async fn upload_course(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut staged: Option<StagedArchive> = None;
    let mut course_id_override: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidFormat(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "courseFile" | "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                validate_archive_name(&file_name)?;
                staged = Some(stage_field(state.store(), &file_name, &mut field).await?);
            }
            "courseId" => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidFormat(format!("Failed to read courseId: {}", e))
                })?;
                let value = value.trim();
                if !value.is_empty() {
                    course_id_override = Some(value.to_string());
                }
            }
            other => {
                tracing::debug!("Ignoring multipart field '{}'", other);
            }
        }
    }

    let staged = staged
        .ok_or_else(|| AppError::InvalidFormat("No files were uploaded.".to_string()))?;

    let course_id =
        course_id_override.unwrap_or_else(|| course_id_from_file_name(&staged.file_name));
    let course_dir = state.store().course_dir(&course_id)?;

    tracing::info!(
        course_id = %course_id,
        file_name = %staged.file_name,
        size = staged.size,
        sha256 = %staged.sha256,
        "Processing upload"
    );

    let guard = state.locks().acquire(&course_id).await;

    // Held until the install returns, even if the request is dropped
    let installed = {
        let course_id = course_id.clone();
        let archive_path = staged.path.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            install_package(&course_id, &archive_path, &course_dir)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??
    };

    Ok(Json(UploadResponse {
        success: true,
        launch_url: launch_url(&installed.course_id),
        course_id: installed.course_id,
        course_type: installed.launch.course_type,
        launch_file: installed.launch.launch_file,
        archive_sha256: staged.sha256,
    }))
}

/// Stream a multipart file field into the staging directory
async fn stage_field(
    store: &CourseStore,
    file_name: &str,
    field: &mut Field<'_>,
) -> Result<StagedArchive> {
    let path = store.staging_path(file_name);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::File::create(&path).await?;
    let mut hasher = Sha256::new();
    let mut size = 0u64;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(AppError::InvalidFormat(format!(
                    "Failed to read file data: {}",
                    e
                )));
            }
        };

        hasher.update(&chunk);
        file.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }

    file.flush().await?;

    tracing::debug!(
        staged = %path.display(),
        size,
        "Archive staged"
    );

    Ok(StagedArchive {
        path,
        file_name: file_name.to_string(),
        size,
        sha256: hex::encode(hasher.finalize()),
    })
}
