use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::CatalogEntry;

#[derive(Debug, Clone, Error)]
pub enum PublicationError {
    #[error("Could not look up the publication status of #{id}: {reason}")]
    LookupFailed { id: i64, reason: String },
}

#[async_trait]
pub trait PublicationFilter: Send + Sync {
    /// Whether `entry` may be offered to users. A failed lookup is treated by callers as "not published".
    async fn is_published(&self, entry: &CatalogEntry) -> Result<bool, PublicationError>;
}

#[async_trait]
impl<T: PublicationFilter + ?Sized> PublicationFilter for Arc<T> {
    async fn is_published(&self, entry: &CatalogEntry) -> Result<bool, PublicationError> {
        (**self).is_published(entry).await
    }
}
