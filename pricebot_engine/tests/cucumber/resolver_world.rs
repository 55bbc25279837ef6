use std::collections::HashSet;

use async_trait::async_trait;
use cucumber::World;
use pricebot_engine::{
    catalog::{CatalogEntry, Category},
    traits::{PublicationError, PublicationFilter},
    CatalogStore,
    ResolutionResult,
    Resolver,
    ShortcutTable,
};

#[derive(Debug, Default, World)]
pub struct ResolverWorld {
    pub store: CatalogStore,
    pub shortcuts: ShortcutTable,
    /// `None` means everything is published.
    pub published: Option<HashSet<i64>>,
    pub fuzzy_disabled: bool,
    pub input: String,
    pub result: Option<ResolutionResult>,
}

impl ResolverWorld {
    pub fn resolver(&self) -> Resolver<Listed> {
        Resolver::new(self.shortcuts.clone(), Listed(self.published.clone())).with_fuzzy_matching(!self.fuzzy_disabled)
    }

    pub async fn resolve(&mut self, input: String) {
        let snapshot = self.store.snapshot();
        let result = self.resolver().resolve_in(&input, &snapshot, Category::Item).await;
        self.input = input;
        self.result = Some(result);
    }

    pub fn result(&self) -> &ResolutionResult {
        self.result.as_ref().expect("Nothing has been resolved yet")
    }
}

#[derive(Debug, Clone)]
pub struct Listed(Option<HashSet<i64>>);

#[async_trait]
impl PublicationFilter for Listed {
    async fn is_published(&self, entry: &CatalogEntry) -> Result<bool, PublicationError> {
        Ok(self.0.as_ref().map(|ids| ids.contains(&entry.id)).unwrap_or(true))
    }
}
