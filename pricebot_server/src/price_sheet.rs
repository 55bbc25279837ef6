//! A [`MarketData`] source backed by a JSON file:
//!
//! ```json
//! [
//!   { "item_id": 34, "region_id": 10000002, "price": "5.02" },
//!   { "item_id": 44992, "region_id": 10000002, "price": 4500000 }
//! ]
//! ```
//!
//! The file is read on every lookup, so edits are picked up by the next tracking tick.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::*;
use pricebot_common::Isk;
use pricebot_engine::traits::{MarketData, MarketDataError};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PriceQuote {
    pub item_id: i64,
    pub region_id: i64,
    pub price: Isk,
}

#[derive(Debug, Clone)]
pub struct PriceSheet {
    path: PathBuf,
}

impl PriceSheet {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn quotes(&self) -> Result<Vec<PriceQuote>, MarketDataError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| MarketDataError::LookupFailed(format!("Could not read {}. {e}", self.path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| MarketDataError::LookupFailed(format!("{} is not a valid price sheet. {e}", self.path.display())))
    }
}

#[async_trait]
impl MarketData for PriceSheet {
    async fn fetch_current_price(&self, item_id: i64, region_id: i64) -> Result<Isk, MarketDataError> {
        let quotes = self.quotes().await?;
        let price = quotes
            .into_iter()
            .find(|q| q.item_id == item_id && q.region_id == region_id)
            .map(|q| q.price)
            .ok_or(MarketDataError::NoData { item_id, region_id })?;
        trace!("📈️ Item #{item_id} in region #{region_id} is at {price}");
        Ok(price)
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[tokio::test]
    async fn lookups_follow_the_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("prices.json");
        fs::write(&path, r#"[{"item_id": 34, "region_id": 1, "price": "5.02"}, {"item_id": 35, "region_id": 1, "price": 12}]"#)?;
        let sheet = PriceSheet::new(&path);
        assert_eq!(sheet.fetch_current_price(34, 1).await?, "5.02".parse::<Isk>()?);
        assert_eq!(sheet.fetch_current_price(35, 1).await?, Isk::from(12));
        let err = sheet.fetch_current_price(34, 2).await.unwrap_err();
        assert!(matches!(err, MarketDataError::NoData { item_id: 34, region_id: 2 }));

        fs::write(&path, r#"[{"item_id": 34, "region_id": 1, "price": "5.10"}]"#)?;
        assert_eq!(sheet.fetch_current_price(34, 1).await?, "5.10".parse::<Isk>()?);
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_sheets_fail_the_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = PriceSheet::new(dir.path().join("missing.json"));
        assert!(matches!(sheet.fetch_current_price(34, 1).await, Err(MarketDataError::LookupFailed(_))));
        fs::write(sheet.path(), "not json").unwrap();
        assert!(matches!(sheet.fetch_current_price(34, 1).await, Err(MarketDataError::LookupFailed(_))));
    }
}
