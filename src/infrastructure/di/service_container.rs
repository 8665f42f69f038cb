//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::config::Settings;
use crate::domain::PathMatcher;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::tree_store::TreeStore;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Tree document reader/writer
    pub trees: TreeStore,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let trees = TreeStore::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            trees,
        }
    }

    /// Path matcher configured from settings.
    pub fn matcher(&self) -> PathMatcher {
        PathMatcher::new(self.settings.matching)
    }
}
