//! # Collaborator contracts
//!
//! The engine never talks to the outside world directly. Everything it needs from outside (catalog data, publication
//! status, market prices and message delivery) comes through the traits in this module, which the host application
//! implements.
//!
//! * [`CatalogSource`] loads the entries of one [`Category`](crate::catalog::Category).
//! * [`PublicationFilter`] decides whether a candidate entity may be shown to users at all.
//! * [`MarketData`] fetches the current price of an item in a region.
//! * [`NotificationSink`] delivers tracking notices to subscribers.
//!
//! All of the traits are object-safe and `Send + Sync`, so implementations can be shared between tasks.
mod catalog_source;
mod market_data;
mod notification;
mod publication;

pub use catalog_source::{CatalogError, CatalogSource};
pub use market_data::{MarketData, MarketDataError};
pub use notification::{DeliveryError, NotificationSink};
pub use publication::{PublicationError, PublicationFilter};
