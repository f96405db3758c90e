//! Package type detection and launch file resolution
//!
//! The launch file is picked by running candidate steps in order. Each step
//! may propose a path relative to the course root; the first proposal that
//! exists as a regular file wins:
//!
//! 1. the `<launch>` element of `tincan.xml`
//! 2. a conventional entry file at the root (`index_lms.html`, `index.html`, ...)
//! 3. the first `.html` file in a depth-first walk with entries sorted by name
//!
//! Type detection is separate: it only looks at which manifest marker
//! exists. A tincan.xml whose `<launch>` target is missing therefore still
//! reports xAPI while the launch file comes from a later step.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};

use super::manifest;
use super::types::{CourseType, LaunchSource, ResolvedLaunch, TINCAN_MANIFEST};

/// Entry files tried at the course root, in order
pub const CONVENTIONAL_LAUNCH_FILES: &[&str] = &[
    "index_lms.html",
    "index.html",
    "story.html",
    "presentation.html",
    "default.html",
];

/// A candidate-producing step
type LaunchStep = fn(&Path) -> Vec<String>;

const LAUNCH_STEPS: &[(LaunchSource, LaunchStep)] = &[
    (LaunchSource::Manifest, manifest_candidates),
    (LaunchSource::Conventional, conventional_candidates),
    (LaunchSource::HtmlSearch, html_search_candidates),
];

/// Classify a course directory by its manifest markers
pub fn detect_course_type(course_root: &Path) -> CourseType {
    CourseType::MARKERS
        .iter()
        .find(|(marker, _)| course_root.join(marker).exists())
        .map(|(_, course_type)| *course_type)
        .unwrap_or(CourseType::Unknown)
}

/// Resolve type and launch file for an extracted course.
///
/// Blocking; call from `spawn_blocking` in async contexts.
pub fn resolve(course_root: &Path) -> Result<ResolvedLaunch> {
    let course_type = detect_course_type(course_root);

    for (source, step) in LAUNCH_STEPS {
        for candidate in step(course_root) {
            if is_launchable(course_root, &candidate) {
                tracing::debug!(
                    course_type = %course_type,
                    launch_file = %candidate,
                    source = ?source,
                    "Launch file resolved"
                );
                return Ok(ResolvedLaunch {
                    course_type,
                    launch_file: candidate,
                    source: *source,
                });
            }

            if *source == LaunchSource::Manifest {
                tracing::warn!(
                    launch_file = %candidate,
                    "Launch file named in {} does not exist, trying fallbacks",
                    TINCAN_MANIFEST
                );
            }
        }
    }

    Err(AppError::NoLaunchFound(
        "Invalid course package. Could not find a launch file.".to_string(),
    ))
}

/// `<launch>` reference from tincan.xml, if the manifest exists and parses
fn manifest_candidates(course_root: &Path) -> Vec<String> {
    let manifest_path = course_root.join(TINCAN_MANIFEST);
    let xml = match fs::read(&manifest_path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => return Vec::new(),
    };

    match manifest::launch_reference(&xml) {
        Ok(Some(launch)) => vec![launch],
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Error parsing {}: {}", TINCAN_MANIFEST, e);
            Vec::new()
        }
    }
}

fn conventional_candidates(_course_root: &Path) -> Vec<String> {
    CONVENTIONAL_LAUNCH_FILES
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn html_search_candidates(course_root: &Path) -> Vec<String> {
    find_first_html(course_root, course_root)
        .into_iter()
        .collect()
}

/// Depth-first search for the first `.html` file, entries sorted by name
/// at every level
fn find_first_html(course_root: &Path, dir: &Path) -> Option<String> {
    let mut entries: Vec<_> = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir.filter_map(|e| e.ok()).collect(),
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "Skipping unreadable directory: {}", e);
            return None;
        }
    };
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();

        if file_type.is_dir() {
            if let Some(found) = find_first_html(course_root, &path) {
                return Some(found);
            }
        } else if file_type.is_file() && has_html_extension(&path) {
            return relative_url_path(course_root, &path);
        }
    }

    None
}

fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html"))
}

/// `/`-joined path of `path` relative to `root`
fn relative_url_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    Some(parts?.join("/"))
}

/// A candidate is launchable when it stays inside the course root and names
/// an existing regular file
fn is_launchable(course_root: &Path, candidate: &str) -> bool {
    match contained_path(course_root, candidate) {
        Some(path) => path.is_file(),
        None => {
            tracing::warn!(launch_file = %candidate, "Ignoring launch reference outside course");
            false
        }
    }
}

/// Join a relative reference onto `root`, refusing anything that is
/// absolute or climbs out with `..`
fn contained_path(root: &Path, reference: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(reference).components() {
        match component {
            Component::Normal(part) => {
                path.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                path.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(path)
}
