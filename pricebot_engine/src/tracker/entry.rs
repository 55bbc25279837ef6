use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};
use pricebot_common::Isk;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

pub type TrackingId = u64;

/// Opaque reference to whoever asked for tracking (a channel, a user, a webhook). Only the host's
/// [`NotificationSink`](crate::traits::NotificationSink) knows what it means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberRef(String);

impl SubscriberRef {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubscriberRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for SubscriberRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entries with the same key share one price lookup per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub item_id: i64,
    pub region_id: i64,
}

/// The smallest price movement worth reporting: one cent.
pub fn minimum_threshold() -> Isk {
    Isk::from_cents(1)
}

/// Raise `requested` to the minimum threshold if it is below it.
pub fn clamp_threshold(requested: Isk) -> (Isk, Option<TrackingAdjustment>) {
    let floor = minimum_threshold();
    if requested < floor {
        (floor, Some(TrackingAdjustment::ThresholdRaised { requested, applied: floor }))
    } else {
        (requested, None)
    }
}

/// A change made to a tracking request before it was accepted. Each one is meant to be shown to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingAdjustment {
    ThresholdRaised { requested: Isk, applied: Isk },
    DurationCapped { requested: Duration, applied: Duration },
    DurationDefaulted { applied: Duration },
}

impl Display for TrackingAdjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingAdjustment::ThresholdRaised { requested, applied } => {
                write!(f, "A change threshold of {} is below the minimum, using {applied} instead.", requested.value())
            },
            TrackingAdjustment::DurationCapped { requested, applied } => write!(
                f,
                "Tracking for {} minutes is longer than allowed, tracking for {} minutes instead.",
                requested.num_minutes(),
                applied.num_minutes()
            ),
            TrackingAdjustment::DurationDefaulted { applied } => {
                write!(f, "That is not a usable tracking time, tracking for {} minutes instead.", applied.num_minutes())
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackRequest {
    pub item: CatalogEntry,
    pub region: CatalogEntry,
    pub subscriber: SubscriberRef,
    pub threshold: Isk,
    /// `None` uses the scheduler's default duration.
    pub duration: Option<Duration>,
}

impl TrackRequest {
    pub fn new(item: CatalogEntry, region: CatalogEntry, subscriber: SubscriberRef, threshold: Isk) -> Self {
        Self { item, region, subscriber, threshold, duration: None }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingEntry {
    pub id: TrackingId,
    pub item_id: i64,
    pub item_name: String,
    pub region_id: i64,
    pub region_name: String,
    pub subscriber: SubscriberRef,
    /// Never below [`minimum_threshold`].
    pub change_threshold: Isk,
    pub baseline_price: Isk,
    /// The price last reported to the subscriber.
    pub current_price: Option<Isk>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl TrackingEntry {
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey { item_id: self.item_id, region_id: self.region_id }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.started_at + self.duration
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at >= self.duration
    }

    /// The rounded price movement from the baseline to `fetched`, if it is large enough to report.
    pub fn significant_change(&self, fetched: Isk) -> Option<Isk> {
        if fetched == self.baseline_price {
            return None;
        }
        let delta = fetched.abs_diff(self.baseline_price).round_half_up(2);
        (delta >= self.change_threshold).then_some(delta)
    }

    pub fn last_price(&self) -> Isk {
        self.current_price.unwrap_or(self.baseline_price)
    }
}

/// What the requester gets back from a successful track request.
#[derive(Debug, Clone)]
pub struct TrackingReceipt {
    pub entry: TrackingEntry,
    pub adjustments: Vec<TrackingAdjustment>,
}

impl TrackingReceipt {
    /// Messages explaining how the request was adjusted. Empty if it was accepted as-is.
    pub fn notices(&self) -> Vec<String> {
        self.adjustments.iter().map(|a| a.to_string()).collect()
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    fn entry(baseline: &str, threshold: &str) -> TrackingEntry {
        TrackingEntry {
            id: 1,
            item_id: 34,
            item_name: "Tritanium".into(),
            region_id: 10000002,
            region_name: "The Forge".into(),
            subscriber: "alice".into(),
            change_threshold: Isk::from_str(threshold).unwrap(),
            baseline_price: Isk::from_str(baseline).unwrap(),
            current_price: None,
            started_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            duration: Duration::minutes(30),
        }
    }

    #[test]
    fn thresholds_are_clamped() {
        let (applied, adjustment) = clamp_threshold(Isk::from_str("0.001").unwrap());
        assert_eq!(applied, Isk::from_cents(1));
        assert_eq!(
            adjustment.map(|a| a.to_string()).as_deref(),
            Some("A change threshold of 0.001 is below the minimum, using 0.01 ISK instead.")
        );
        assert_eq!(clamp_threshold(Isk::from_cents(-5)).0, Isk::from_cents(1));
        assert_eq!(clamp_threshold(Isk::from_cents(1)), (Isk::from_cents(1), None));
        assert_eq!(clamp_threshold(Isk::from(10)), (Isk::from(10), None));
    }

    #[test]
    fn deltas_are_rounded_before_comparison() {
        let e = entry("100.00", "0.01");
        assert_eq!(e.significant_change(Isk::from_str("100.00").unwrap()), None);
        assert_eq!(e.significant_change(Isk::from_str("100.004").unwrap()), None);
        assert_eq!(e.significant_change(Isk::from_str("100.005").unwrap()), Some(Isk::from_cents(1)));
        assert_eq!(e.significant_change(Isk::from_str("100.01").unwrap()), Some(Isk::from_cents(1)));
        assert_eq!(e.significant_change(Isk::from_str("99.99").unwrap()), Some(Isk::from_cents(1)));
        let e = entry("100.00", "0.02");
        assert_eq!(e.significant_change(Isk::from_str("100.01").unwrap()), None);
        assert_eq!(e.significant_change(Isk::from_str("100.02").unwrap()), Some(Isk::from_cents(2)));
    }

    #[test]
    fn expiry() {
        let e = entry("1", "1");
        assert!(!e.is_expired(e.started_at + Duration::minutes(29)));
        assert!(e.is_expired(e.started_at + Duration::minutes(30)));
        assert_eq!(e.expires_at(), e.started_at + Duration::minutes(30));
        assert_eq!(e.last_price(), Isk::from(1));
        assert_eq!(e.dedup_key(), DedupKey { item_id: 34, region_id: 10000002 });
    }
}
