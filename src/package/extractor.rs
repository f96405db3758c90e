//! Package extraction
//!
//! Extracts an uploaded ZIP into a course directory. The directory is
//! emptied first so nothing from a previous upload of the same course id
//! survives, and it is removed again if extraction fails part way.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{AppError, Result};

use super::types::ExtractionStats;

/// Accepted archive suffixes
const ARCHIVE_EXTENSIONS: &[&str] = &["zip"];

/// Reject file names without a recognized archive suffix
pub fn validate_archive_name(file_name: &str) -> Result<()> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    if ARCHIVE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    {
        Ok(())
    } else {
        Err(AppError::InvalidFormat("Please upload a zip file.".to_string()))
    }
}

/// Extract `archive_path` into `dest`, replacing whatever `dest` held.
///
/// Entries that would land outside `dest` (absolute names, `..`) reject the
/// whole archive. On any error `dest` is removed before returning.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<ExtractionStats> {
    empty_dir(dest).map_err(|e| {
        AppError::ExtractionFailed(format!("Failed to prepare course directory: {}", e))
    })?;

    match extract_zip_inner(archive_path, dest) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            if let Err(cleanup) = remove_dir_if_exists(dest) {
                tracing::warn!(
                    dest = %dest.display(),
                    "Failed to remove partially extracted course: {}",
                    cleanup
                );
            }
            Err(e)
        }
    }
}

fn extract_zip_inner(archive_path: &Path, dest: &Path) -> Result<ExtractionStats> {
    let file = fs::File::open(archive_path)
        .map_err(|e| AppError::ExtractionFailed(format!("Failed to open archive: {}", e)))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::ExtractionFailed(format!("Invalid or corrupt ZIP: {}", e)))?;

    let mut stats = ExtractionStats::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            AppError::ExtractionFailed(format!("Failed to read entry {}: {}", i, e))
        })?;

        let entry_path = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => {
                return Err(AppError::ExtractionFailed(format!(
                    "Archive entry {:?} points outside the course directory",
                    entry.name()
                )));
            }
        };

        let output_path = dest.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(|e| {
                AppError::ExtractionFailed(format!("Failed to create directory: {}", e))
            })?;
            stats.directories += 1;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::ExtractionFailed(format!("Failed to create directory: {}", e))
                })?;
            }
            let mut outfile = fs::File::create(&output_path).map_err(|e| {
                AppError::ExtractionFailed(format!("Failed to create file: {}", e))
            })?;
            let written = io::copy(&mut entry, &mut outfile).map_err(|e| {
                AppError::ExtractionFailed(format!(
                    "Failed to write {}: {}",
                    entry_path.display(),
                    e
                ))
            })?;
            stats.files += 1;
            stats.bytes += written;
        }
    }

    tracing::debug!(
        files = stats.files,
        directories = stats.directories,
        bytes = stats.bytes,
        "Archive extracted"
    );

    Ok(stats)
}

/// Make `dir` exist and be empty
fn empty_dir(dir: &Path) -> io::Result<()> {
    remove_dir_if_exists(dir)?;
    fs::create_dir_all(dir)
}

/// Remove a directory tree, treating "already gone" as success
pub fn remove_dir_if_exists(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
