//! # Price-change tracking
//!
//! A subscriber asks to be told when the price of an item in a region moves. Each request becomes a
//! [`TrackingEntry`] that lives for a limited time. The [`TrackingScheduler`] owns every entry and polls prices on a
//! fixed interval:
//!
//! * Entries that share an `(item, region)` pair share a single price lookup per tick.
//! * A lookup failure means "no change" for that tick.
//! * When the rounded price delta reaches the entry's threshold, the subscriber is notified and the new price becomes
//!   the baseline. A failed delivery removes the entry.
//! * Entries past their duration get a best-effort expiry notice and are removed.
//!
//! New requests and cancellations go through a [`TrackerHandle`] and take effect at the start of the next tick, so the
//! scheduler's entry set only ever changes in one place.
mod entry;
mod errors;
mod notice;
mod scheduler;

pub use entry::{
    clamp_threshold,
    minimum_threshold,
    DedupKey,
    SubscriberRef,
    TrackRequest,
    TrackingAdjustment,
    TrackingEntry,
    TrackingId,
    TrackingReceipt,
};
pub use errors::TrackerError;
pub use notice::TrackingNotice;
pub use scheduler::{TickReport, TrackerConfig, TrackerHandle, TrackingScheduler};
