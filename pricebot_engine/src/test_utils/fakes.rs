//! In-memory collaborators for exercising the tracking scheduler.
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use pricebot_common::Isk;

use crate::{
    tracker::{SubscriberRef, TrackingNotice},
    traits::{DeliveryError, MarketData, MarketDataError, NotificationSink},
};

/// A price table that can be changed between ticks. Lookups for pairs with no price, or pairs marked as failing,
/// return an error.
#[derive(Debug, Default)]
pub struct FakeMarket {
    prices: Mutex<HashMap<(i64, i64), Isk>>,
    failing: Mutex<HashSet<(i64, i64)>>,
    fetches: Mutex<HashMap<(i64, i64), usize>>,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&self, item_id: i64, region_id: i64, price: Isk) {
        self.prices.lock().unwrap().insert((item_id, region_id), price);
        self.failing.lock().unwrap().remove(&(item_id, region_id));
    }

    pub fn fail(&self, item_id: i64, region_id: i64) {
        self.failing.lock().unwrap().insert((item_id, region_id));
    }

    pub fn fetch_count(&self, item_id: i64, region_id: i64) -> usize {
        self.fetches.lock().unwrap().get(&(item_id, region_id)).copied().unwrap_or_default()
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }

    pub fn reset_counts(&self) {
        self.fetches.lock().unwrap().clear();
    }
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn fetch_current_price(&self, item_id: i64, region_id: i64) -> Result<Isk, MarketDataError> {
        let key = (item_id, region_id);
        *self.fetches.lock().unwrap().entry(key).or_default() += 1;
        if self.failing.lock().unwrap().contains(&key) {
            return Err(MarketDataError::LookupFailed("market is down".into()));
        }
        self.prices.lock().unwrap().get(&key).copied().ok_or(MarketDataError::NoData { item_id, region_id })
    }
}

/// Records every notice it is given. Subscribers can be made unreachable, after which delivery to them fails.
#[derive(Debug, Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<(SubscriberRef, TrackingNotice)>>,
    unreachable: Mutex<HashSet<SubscriberRef>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_unreachable(&self, subscriber: &SubscriberRef) {
        self.unreachable.lock().unwrap().insert(subscriber.clone());
    }

    pub fn deliveries(&self) -> Vec<(SubscriberRef, TrackingNotice)> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn notices_for(&self, subscriber: &SubscriberRef) -> Vec<TrackingNotice> {
        self.deliveries.lock().unwrap().iter().filter(|(s, _)| s == subscriber).map(|(_, n)| n.clone()).collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, subscriber: &SubscriberRef, notice: &TrackingNotice) -> Result<(), DeliveryError> {
        if self.unreachable.lock().unwrap().contains(subscriber) {
            return Err(DeliveryError::Unreachable(subscriber.clone()));
        }
        self.deliveries.lock().unwrap().push((subscriber.clone(), notice.clone()));
        Ok(())
    }
}
