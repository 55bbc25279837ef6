//! Loads the catalog from a directory of JSON files, one per category (`items.json`, `regions.json`,
//! `systems.json`). Each file holds an array of `{"id": 34, "name": "Tritanium"}` objects. Entries may carry
//! `"published": false`, in which case they stay in the catalog but the source's [`PublicationFilter`] rejects them.
//!
//! The publication flags read by a load are staged and only take effect on [`JsonCatalogSource::commit`], so a
//! refresh that fails part way leaves the filter matching the catalog that is still current.
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use log::*;
use pricebot_engine::{
    catalog::{CatalogEntry, Category},
    traits::{CatalogError, CatalogSource, PublicationError, PublicationFilter},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: i64,
    name: String,
    #[serde(default = "published_by_default")]
    published: bool,
}

fn published_by_default() -> bool {
    true
}

/// Clones share the staged and the committed sets of unpublished entries.
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    dir: PathBuf,
    staged: Arc<RwLock<HashMap<Category, HashSet<i64>>>>,
    unpublished: Arc<RwLock<HashSet<(Category, i64)>>>,
}

impl JsonCatalogSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            staged: Arc::new(RwLock::new(HashMap::new())),
            unpublished: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Apply the publication flags staged by the loads since the last commit. Call this once the loaded catalog has
    /// been published. Categories that were not loaded since the last commit keep their current flags.
    pub fn commit(&self) {
        let staged = std::mem::take(&mut *self.staged.write().unwrap_or_else(|poisoned| poisoned.into_inner()));
        if staged.is_empty() {
            return;
        }
        let mut unpublished = self.unpublished.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        for (category, ids) in staged {
            unpublished.retain(|(c, _)| *c != category);
            unpublished.extend(ids.into_iter().map(|id| (category, id)));
        }
        debug!("📚️ {} catalog entries are now unpublished", unpublished.len());
    }

    pub fn path_for(&self, category: Category) -> PathBuf {
        self.dir.join(format!("{}.json", category.plural()))
    }
}

#[async_trait]
impl CatalogSource for JsonCatalogSource {
    async fn load_catalog(&self, category: Category) -> Result<Vec<CatalogEntry>, CatalogError> {
        let path = self.path_for(category);
        trace!("📚️ Reading {category} catalog from {}", path.display());
        let data = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CatalogError::Unavailable { category, reason: format!("{}: {e}", path.display()) })?;
        let raw: Vec<RawEntry> = serde_json::from_str(&data)
            .map_err(|e| CatalogError::Malformed { category, reason: format!("{}: {e}", path.display()) })?;
        let hidden = raw.iter().filter(|r| !r.published).map(|r| r.id).collect::<HashSet<_>>();
        let entries = raw.into_iter().map(|r| CatalogEntry::new(r.id, r.name, category)).collect::<Vec<_>>();
        debug!("📚️ Read {} {} from {} ({} unpublished)", entries.len(), category.plural(), path.display(), hidden.len());
        self.staged.write().unwrap_or_else(|poisoned| poisoned.into_inner()).insert(category, hidden);
        Ok(entries)
    }
}

#[async_trait]
impl PublicationFilter for JsonCatalogSource {
    async fn is_published(&self, entry: &CatalogEntry) -> Result<bool, PublicationError> {
        let unpublished = self.unpublished.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(!unpublished.contains(&(entry.category, entry.id)))
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[tokio::test]
    async fn load_each_category() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("items.json"), r#"[{"id": 34, "name": "Tritanium"}, {"id": 35, "name": "Pyerite"}]"#)
            .unwrap();
        fs::write(dir.path().join("regions.json"), r#"[{"id": 10000002, "name": "The Forge"}]"#).unwrap();
        let source = JsonCatalogSource::new(dir.path());
        let items = source.load_catalog(Category::Item).await.unwrap();
        assert_eq!(items, vec![CatalogEntry::item(34, "Tritanium"), CatalogEntry::item(35, "Pyerite")]);
        let regions = source.load_catalog(Category::Region).await.unwrap();
        assert_eq!(regions, vec![CatalogEntry::region(10000002, "The Forge")]);
        let err = source.load_catalog(Category::System).await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable { category: Category::System, .. }));
    }

    #[tokio::test]
    async fn unpublished_entries_are_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let items = r#"[{"id": 34, "name": "Tritanium"}, {"id": 99, "name": "Tritanium Prototype", "published": false}]"#;
        fs::write(dir.path().join("items.json"), items).unwrap();
        let source = JsonCatalogSource::new(dir.path());
        let entries = source.load_catalog(Category::Item).await.unwrap();
        assert_eq!(entries.len(), 2);
        // Nothing changes until the load is committed
        assert!(source.is_published(&entries[1]).await.unwrap());
        source.commit();
        assert!(source.is_published(&entries[0]).await.unwrap());
        assert!(!source.is_published(&entries[1]).await.unwrap());
        // Only the item flag applies to items
        assert!(source.is_published(&CatalogEntry::region(99, "Somewhere")).await.unwrap());

        fs::write(dir.path().join("items.json"), r#"[{"id": 99, "name": "Tritanium Prototype"}]"#).unwrap();
        let entries = source.clone().load_catalog(Category::Item).await.unwrap();
        assert!(!source.is_published(&entries[0]).await.unwrap());
        source.clone().commit();
        assert!(source.is_published(&entries[0]).await.unwrap());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_committed_flags() {
        let dir = tempfile::tempdir().unwrap();
        let items = r#"[{"id": 34, "name": "Tritanium"}, {"id": 99, "name": "Tritanium Prototype", "published": false}]"#;
        fs::write(dir.path().join("items.json"), items).unwrap();
        fs::write(dir.path().join("regions.json"), r#"[{"id": 10000002, "name": "The Forge"}]"#).unwrap();
        fs::write(dir.path().join("systems.json"), r#"[{"id": 30000142, "name": "Jita"}]"#).unwrap();
        let source = JsonCatalogSource::new(dir.path());
        let store = pricebot_engine::CatalogStore::new();
        crate::catalog_worker::refresh_catalog(&source, &store).await.unwrap();
        source.commit();
        let prototype = CatalogEntry::item(99, "Tritanium Prototype");
        assert!(!source.is_published(&prototype).await.unwrap());

        // The items file now publishes everything, but the systems file is broken so the refresh fails
        fs::write(dir.path().join("items.json"), r#"[{"id": 99, "name": "Tritanium Prototype"}]"#).unwrap();
        fs::write(dir.path().join("systems.json"), "not json").unwrap();
        assert!(crate::catalog_worker::refresh_catalog(&source, &store).await.is_err());
        assert_eq!(store.version(), 1);
        assert!(!source.is_published(&prototype).await.unwrap());

        // The next good refresh restages every category
        fs::write(dir.path().join("systems.json"), r#"[{"id": 30000142, "name": "Jita"}]"#).unwrap();
        crate::catalog_worker::refresh_catalog(&source, &store).await.unwrap();
        source.commit();
        assert!(source.is_published(&prototype).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("items.json"), r#"{"id": 34, "name": "Tritanium"}"#).unwrap();
        let source = JsonCatalogSource::new(dir.path());
        let err = source.load_catalog(Category::Item).await.unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { category: Category::Item, .. }));
    }
}
