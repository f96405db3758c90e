//! Course library
//!
//! The course list is rebuilt from the content root on every request.

mod catalog;

pub use catalog::{launch_url, list_courses, Course};
