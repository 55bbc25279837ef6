use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{CatalogEntry, Category};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Could not read the {category} catalog: {reason}")]
    Unavailable { category: Category, reason: String },
    #[error("The {category} catalog is malformed: {reason}")]
    Malformed { category: Category, reason: String },
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load every entry of the given category. Entries must carry `category` as their category.
    async fn load_catalog(&self, category: Category) -> Result<Vec<CatalogEntry>, CatalogError>;
}
