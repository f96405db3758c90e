//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::storage::{CourseLocks, CourseStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub config: Config,
    pub store: CourseStore,
    pub locks: CourseLocks,
}

impl AppState {
    /// Create a new application state
    ///
    /// The storage layout is not touched here; call
    /// [`CourseStore::ensure_layout`] before serving.
    pub fn new(config: Config) -> Self {
        let store = CourseStore::new(&config.storage.data_dir);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                locks: CourseLocks::new(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the course store
    pub fn store(&self) -> &CourseStore {
        &self.inner.store
    }

    /// Get the per-course extraction locks
    pub fn locks(&self) -> &CourseLocks {
        &self.inner.locks
    }
}
