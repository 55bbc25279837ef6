//! Ready-made [`PublicationFilter`] implementations.
use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use log::*;

use crate::{
    catalog::{CatalogEntry, Category},
    traits::{PublicationError, PublicationFilter},
};

/// Every entry is published. Regions and systems have no publication status, so this is the filter used for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPublished;

#[async_trait]
impl PublicationFilter for AllPublished {
    async fn is_published(&self, _entry: &CatalogEntry) -> Result<bool, PublicationError> {
        Ok(true)
    }
}

/// Remembers the answers of an inner filter. Failed lookups are not remembered, so they are retried on the next call.
#[derive(Debug, Default)]
pub struct CachedPublicationFilter<F> {
    inner: F,
    answers: RwLock<HashMap<(Category, i64), bool>>,
}

impl<F> CachedPublicationFilter<F> {
    pub fn new(inner: F) -> Self {
        Self { inner, answers: RwLock::new(HashMap::new()) }
    }

    pub fn cached(&self, entry: &CatalogEntry) -> Option<bool> {
        let answers = self.answers.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        answers.get(&(entry.category, entry.id)).copied()
    }

    /// Forget every remembered answer, e.g. after the catalog has been refreshed.
    pub fn clear(&self) {
        let mut answers = self.answers.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<F: PublicationFilter> PublicationFilter for CachedPublicationFilter<F> {
    async fn is_published(&self, entry: &CatalogEntry) -> Result<bool, PublicationError> {
        if let Some(published) = self.cached(entry) {
            trace!("🔎️ Publication status of {entry} served from cache");
            return Ok(published);
        }
        let published = self.inner.is_published(entry).await?;
        let mut answers = self.answers.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        answers.insert((entry.category, entry.id), published);
        Ok(published)
    }
}
