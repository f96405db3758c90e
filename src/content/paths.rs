//! Request path normalization and containment checks

use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};

/// A request path normalized to stay below the course root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePath {
    /// Normalized segments, `.` and `..` resolved
    segments: Vec<String>,
}

impl SafePath {
    /// Normalize `requested`, rejecting any path that climbs above the root
    /// or is absolute
    pub fn parse(requested: &str) -> Result<Self> {
        let mut segments: Vec<String> = Vec::new();
        let requested = requested.replace('\\', "/");

        for component in Path::new(&requested).components() {
            match component {
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;
                    segments.push(part.to_string());
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if segments.pop().is_none() {
                        return Err(AppError::Forbidden(format!(
                            "Attempted directory traversal: {:?}",
                            requested
                        )));
                    }
                }
                // A leading slash is only the route separator
                Component::RootDir => {}
                Component::Prefix(_) => {
                    return Err(AppError::Forbidden(format!(
                        "Absolute path requested: {:?}",
                        requested
                    )));
                }
            }
        }

        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// `/`-joined relative form, for URLs and logging
    pub fn as_url_path(&self) -> String {
        self.segments.join("/")
    }

    /// URL-encoded relative form, for redirect targets
    pub fn encoded(&self) -> String {
        self.segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn join_to(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(&self.segments);
        path
    }

    pub fn child(&self, name: &str) -> SafePath {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        SafePath { segments }
    }
}

/// Confirm an existing path still resolves inside `root` once symlinks are
/// followed
pub async fn ensure_contained(root: &Path, path: &Path) -> Result<()> {
    let canonical_root = tokio::fs::canonicalize(root).await?;
    let canonical = tokio::fs::canonicalize(path).await?;

    if canonical.starts_with(&canonical_root) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Path resolves outside course root: {}",
            path.display()
        )))
    }
}
