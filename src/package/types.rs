//! Package types

use serde::{Deserialize, Serialize};

/// xAPI (Tin Can) manifest
pub const TINCAN_MANIFEST: &str = "tincan.xml";
/// SCORM manifest
pub const SCORM_MANIFEST: &str = "imsmanifest.xml";
/// cmi5 course structure
pub const CMI5_MANIFEST: &str = "cmi5.xml";

/// Package type, decided by which manifest marker is present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseType {
    #[serde(rename = "xAPI")]
    Xapi,
    #[serde(rename = "SCORM")]
    Scorm,
    #[serde(rename = "cmi5")]
    Cmi5,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl CourseType {
    /// Marker files in priority order
    pub const MARKERS: [(&'static str, CourseType); 3] = [
        (TINCAN_MANIFEST, CourseType::Xapi),
        (SCORM_MANIFEST, CourseType::Scorm),
        (CMI5_MANIFEST, CourseType::Cmi5),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::Xapi => "xAPI",
            CourseType::Scorm => "SCORM",
            CourseType::Cmi5 => "cmi5",
            CourseType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolution step produced the launch file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchSource {
    /// `<launch>` element of tincan.xml
    Manifest,
    /// One of the well-known entry file names at the course root
    Conventional,
    /// First HTML file found anywhere in the tree
    HtmlSearch,
}

/// Outcome of launch resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLaunch {
    pub course_type: CourseType,
    /// Relative to the course root, `/`-separated
    pub launch_file: String,
    pub source: LaunchSource,
}

/// Counters reported by the extractor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// A freshly installed course
#[derive(Debug, Clone)]
pub struct InstalledCourse {
    pub course_id: String,
    pub launch: ResolvedLaunch,
    pub stats: ExtractionStats,
}
