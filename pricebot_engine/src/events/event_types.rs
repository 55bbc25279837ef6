use chrono::{DateTime, Utc};
use pricebot_common::Isk;

use crate::tracker::{SubscriberRef, TrackingEntry, TrackingId};

/// A tracked price moved by at least the entry's threshold and the subscriber was told about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceChangedEvent {
    pub entry_id: TrackingId,
    pub item_id: i64,
    pub region_id: i64,
    pub subscriber: SubscriberRef,
    pub previous: Isk,
    pub current: Isk,
    pub delta: Isk,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingEndReason {
    Expired,
    DeliveryFailed,
    Cancelled,
}

/// A tracking entry left the active set.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingEndedEvent {
    pub entry: TrackingEntry,
    pub reason: TrackingEndReason,
}

impl TrackingEndedEvent {
    pub fn new(entry: TrackingEntry, reason: TrackingEndReason) -> Self {
        Self { entry, reason }
    }
}
