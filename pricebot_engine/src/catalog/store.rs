use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
    RwLock,
};

use log::*;

use crate::catalog::{CatalogEntry, CatalogSnapshot, Category};

/// Holds the current [`CatalogSnapshot`] and publishes replacements atomically.
///
/// Cloning the store is cheap and every clone sees the same current snapshot.
#[derive(Clone, Debug)]
pub struct CatalogStore {
    current: Arc<RwLock<Arc<CatalogSnapshot>>>,
    versions: Arc<AtomicU64>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create a store holding an empty snapshot (version 0).
    pub fn new() -> Self {
        Self { current: Arc::new(RwLock::new(Arc::new(CatalogSnapshot::new(0)))), versions: Arc::new(AtomicU64::new(0)) }
    }

    /// The snapshot that is current right now. Later publications do not affect the returned value.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version()
    }

    /// Build a new snapshot from the given category lists and make it current. Returns the new version number.
    ///
    /// When publications race, the one with the highest version wins.
    pub fn publish<I>(&self, categories: I) -> u64
    where I: IntoIterator<Item = (Category, Vec<CatalogEntry>)> {
        let version = self.versions.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = categories
            .into_iter()
            .fold(CatalogSnapshot::new(version), |snapshot, (category, entries)| snapshot.with_entries(category, entries));
        let count = snapshot.len();
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Concurrent publishers may reach the lock out of order; the current version never goes backwards.
        if guard.version() > version {
            debug!("📚️ Catalog v{version} is older than the current v{}, not installing it", guard.version());
            return version;
        }
        *guard = Arc::new(snapshot);
        info!("📚️ Catalog v{version} published with {count} entries");
        version
    }
}
