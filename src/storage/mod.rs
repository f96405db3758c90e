//! On-disk storage for uploaded archives and extracted courses

mod course_store;
mod locks;

pub use course_store::{course_id_from_file_name, validate_course_id, CourseStore};
pub use locks::{CourseLockGuard, CourseLocks};
