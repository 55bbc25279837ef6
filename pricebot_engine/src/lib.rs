//! Pricebot Engine
//!
//! The core of a market price chat bot. It knows nothing about chat platforms or market APIs; those are supplied by the
//! host through the traits in [`mod@traits`].
//!
//! The library is divided into two main sections:
//! 1. Name resolution ([`mod@resolver`]). Free text such as `"trit"`, `"mlu"` or `"34"` is turned into one catalog
//!    entity. The catalog itself is held in a [`CatalogStore`] and replaced wholesale when it is refreshed. When the
//!    resolver can only guess, [`hint::hint`] produces the message to show the user.
//! 2. Price-change tracking ([`mod@tracker`]). Subscribers ask to be told when a price moves by some amount. A single
//!    [`TrackingScheduler`] polls prices on an interval and notifies subscribers through a [`NotificationSink`].
//!
//! The scheduler also emits events ([`mod@events`]) that hosts can hook into, e.g. to keep statistics, without
//! taking part in delivery.
pub mod catalog;
pub mod events;
pub mod filters;
pub mod hint;
pub mod resolver;
pub mod shortcuts;
pub mod tracker;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use catalog::{CatalogEntry, CatalogSnapshot, CatalogStore, Category};
pub use filters::{AllPublished, CachedPublicationFilter};
pub use resolver::{ResolutionResult, Resolver};
pub use shortcuts::ShortcutTable;
pub use tracker::{TrackRequest, TrackerConfig, TrackerHandle, TrackingScheduler};
pub use traits::{CatalogSource, MarketData, NotificationSink, PublicationFilter};
