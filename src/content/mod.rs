//! Extracted course content serving
//!
//! Path containment, MIME classification, caching headers and byte-range
//! streaming for files inside a course directory.

pub mod mime;
pub mod paths;
pub mod range;
mod serve;

pub use paths::SafePath;
pub use range::{parse_range, ByteRange};
pub use serve::{course_file_url, serve_course_file, DIRECTORY_INDEX_FILES};
