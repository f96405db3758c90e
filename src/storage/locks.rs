//! Per-course extraction locks
//!
//! Re-uploading a course empties its directory before extracting the new
//! archive. Holding the course's lock for the whole install sequence keeps
//! two uploads of the same id from interleaving. Different ids never
//! contend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;

/// Registry of one async mutex per course id
#[derive(Clone, Default)]
pub struct CourseLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl CourseLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a course id
    pub async fn acquire(&self, course_id: &str) -> CourseLockGuard {
        let lock = {
            let mut map = self.inner.lock();
            map.entry(course_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        let guard = lock.lock_owned().await;
        CourseLockGuard {
            registry: self.clone(),
            course_id: course_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of ids with a live lock entry
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Held while a course is being installed; releases and prunes on drop
pub struct CourseLockGuard {
    registry: CourseLocks,
    course_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for CourseLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut map = self.registry.inner.lock();
        // Only the registry itself still references the mutex: nobody is
        // holding or waiting on it.
        if let Some(lock) = map.get(&self.course_id) {
            if Arc::strong_count(lock) == 1 {
                map.remove(&self.course_id);
            }
        }
    }
}
