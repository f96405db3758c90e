//! Catalog listing by directory scan

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::package::{detect_course_type, CourseType};

/// A course in the catalog
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,

    #[serde(rename = "type")]
    pub course_type: CourseType,

    /// Stable launch indirection, never a path into the content tree
    pub launch_url: String,

    /// Last modification of the course directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Launch URL for a course id
pub fn launch_url(course_id: &str) -> String {
    format!("/launch/{}", urlencoding::encode(course_id))
}

/// List every course directory under `courses_dir`.
///
/// A missing content root is an empty catalog. Entries that are not
/// directories, or whose names are not UTF-8, are skipped.
pub async fn list_courses(courses_dir: &Path) -> Result<Vec<Course>> {
    let mut read_dir = match tokio::fs::read_dir(courses_dir).await {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Content root does not exist yet, catalog is empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut courses = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }

        let Some(id) = entry.file_name().to_str().map(str::to_string) else {
            tracing::debug!("Skipping course directory with non UTF-8 name");
            continue;
        };

        let course_root = entry.path();
        let course_type = tokio::task::spawn_blocking(move || detect_course_type(&course_root))
            .await
            .unwrap_or(CourseType::Unknown);

        let updated_at = entry
            .metadata()
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        courses.push(Course {
            launch_url: launch_url(&id),
            id,
            course_type,
            updated_at,
        });
    }

    courses.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(courses)
}
