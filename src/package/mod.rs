//! Course package handling
//!
//! Extraction, type detection and launch file resolution for uploaded
//! SCORM / xAPI / cmi5 packages.

pub mod extractor;
pub mod manifest;
pub mod resolver;
pub mod types;

use std::path::Path;

pub use extractor::{extract_archive, remove_dir_if_exists, validate_archive_name};
pub use resolver::{detect_course_type, resolve, CONVENTIONAL_LAUNCH_FILES};
pub use types::*;

use crate::error::{AppError, Result};

/// Extract a staged archive into `course_dir` and resolve its launch file.
///
/// A package without a launch file is removed again, so a failed install
/// never leaves a course directory behind. Blocking; callers must hold the
/// course's extraction lock.
pub fn install_package(
    course_id: &str,
    archive_path: &Path,
    course_dir: &Path,
) -> Result<InstalledCourse> {
    tracing::info!(
        course_id = %course_id,
        archive = %archive_path.display(),
        "Extracting package"
    );

    let stats = extract_archive(archive_path, course_dir)?;

    let launch = match resolve(course_dir) {
        Ok(launch) => launch,
        Err(e) => {
            tracing::warn!(course_id = %course_id, "Rolling back install: {}", e);
            remove_dir_if_exists(course_dir).map_err(|cleanup| {
                AppError::Internal(format!(
                    "Failed to roll back course {}: {}",
                    course_id, cleanup
                ))
            })?;
            return Err(e);
        }
    };

    tracing::info!(
        course_id = %course_id,
        course_type = %launch.course_type,
        launch_file = %launch.launch_file,
        files = stats.files,
        bytes = stats.bytes,
        "Package installed"
    );

    Ok(InstalledCourse {
        course_id: course_id.to_string(),
        launch,
        stats,
    })
}
