//! Filesystem layout for staged uploads and extracted course packages
//!
//! ```text
//! {data_dir}/uploads/   raw archives, kept for diagnostics
//! {data_dir}/courses/   one directory per course id
//! {data_dir}/sandbox/   reserved, unused
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Longest course id accepted; one directory name on common filesystems
const MAX_COURSE_ID_BYTES: usize = 255;

/// Handle on the storage directories
#[derive(Debug, Clone)]
pub struct CourseStore {
    uploads_dir: PathBuf,
    courses_dir: PathBuf,
    sandbox_dir: PathBuf,
}

impl CourseStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            uploads_dir: data_dir.join("uploads"),
            courses_dir: data_dir.join("courses"),
            sandbox_dir: data_dir.join("sandbox"),
        }
    }

    /// Create the three storage directories if they are missing
    pub async fn ensure_layout(&self) -> std::io::Result<()> {
        for dir in [&self.uploads_dir, &self.courses_dir, &self.sandbox_dir] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// The content root: one subdirectory per course
    pub fn courses_dir(&self) -> &Path {
        &self.courses_dir
    }

    pub fn sandbox_dir(&self) -> &Path {
        &self.sandbox_dir
    }

    /// Directory for a course id. The id is validated first, so the result
    /// is always a direct child of the content root.
    pub fn course_dir(&self, course_id: &str) -> Result<PathBuf> {
        let course_id = validate_course_id(course_id)?;
        Ok(self.courses_dir.join(course_id))
    }

    /// Unique staging path for an uploaded archive.
    ///
    /// Only the final component of `file_name` is kept.
    pub fn staging_path(&self, file_name: &str) -> PathBuf {
        let base = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.zip");
        let short_id = Uuid::new_v4().simple().to_string();
        self.uploads_dir.join(format!(
            "{}-{}-{}",
            Utc::now().format("%Y%m%dT%H%M%SZ"),
            &short_id[..8],
            base
        ))
    }
}

/// Check that a course id is usable as a single directory name
pub fn validate_course_id(course_id: &str) -> Result<&str> {
    let invalid = course_id.is_empty()
        || course_id == "."
        || course_id == ".."
        || course_id.len() > MAX_COURSE_ID_BYTES
        || course_id.contains(['/', '\\'])
        || course_id.chars().any(char::is_control);

    if invalid {
        return Err(AppError::InvalidFormat(format!(
            "Invalid course ID: {:?}",
            course_id
        )));
    }
    Ok(course_id)
}

/// Course id derived from an upload's file name: the base name without
/// its extension
pub fn course_id_from_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}
