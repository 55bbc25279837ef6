use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    catalog::{CatalogEntry, Category},
    resolver::NameIndex,
};

#[derive(Debug, Default)]
struct CategoryCatalog {
    entries: Vec<CatalogEntry>,
    index: NameIndex,
}

/// An immutable, versioned view of the whole catalog.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    version: u64,
    loaded_at: DateTime<Utc>,
    categories: HashMap<Category, CategoryCatalog>,
}

impl CatalogSnapshot {
    pub fn new(version: u64) -> Self {
        Self { version, loaded_at: Utc::now(), categories: HashMap::new() }
    }

    /// Set the entries for `category`, replacing any that were there before.
    ///
    /// Entries with a blank name, or that belong to a different category, are dropped with a warning.
    pub fn with_entries(mut self, category: Category, entries: Vec<CatalogEntry>) -> Self {
        let total = entries.len();
        let entries = entries
            .into_iter()
            .filter(|e| {
                let keep = e.has_name() && e.category == category;
                if !keep {
                    warn!("📚️ Discarding invalid {category} catalog entry #{} ({:?})", e.id, e.name);
                }
                keep
            })
            .collect::<Vec<_>>();
        trace!("📚️ {} of {total} {} accepted into snapshot v{}", entries.len(), category.plural(), self.version);
        let index = NameIndex::new(&entries);
        self.categories.insert(category, CategoryCatalog { entries, index });
        self
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn entries(&self, category: Category) -> &[CatalogEntry] {
        self.categories.get(&category).map(|c| c.entries.as_slice()).unwrap_or_default()
    }

    /// The fuzzy-match index for the given category, if that category has been loaded.
    pub fn fuzzy_index(&self, category: Category) -> Option<&NameIndex> {
        self.categories.get(&category).map(|c| &c.index)
    }

    pub fn find_by_id(&self, category: Category, id: i64) -> Option<&CatalogEntry> {
        self.entries(category).iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(|c| c.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
