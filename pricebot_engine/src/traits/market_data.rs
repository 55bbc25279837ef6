use std::sync::Arc;

use async_trait::async_trait;
use pricebot_common::Isk;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MarketDataError {
    #[error("There is no market data for item #{item_id} in region #{region_id}")]
    NoData { item_id: i64, region_id: i64 },
    #[error("Market data lookup failed: {0}")]
    LookupFailed(String),
}

#[async_trait]
pub trait MarketData: Send + Sync {
    /// The current price of `item_id` in `region_id`.
    async fn fetch_current_price(&self, item_id: i64, region_id: i64) -> Result<Isk, MarketDataError>;
}

#[async_trait]
impl<T: MarketData + ?Sized> MarketData for Arc<T> {
    async fn fetch_current_price(&self, item_id: i64, region_id: i64) -> Result<Isk, MarketDataError> {
        (**self).fetch_current_price(item_id, region_id).await
    }
}
