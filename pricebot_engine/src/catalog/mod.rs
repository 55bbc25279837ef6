//! # The entity catalog
//!
//! The catalog holds every name the bot can resolve, split by [`Category`]. It is loaded from a
//! [`CatalogSource`](crate::traits::CatalogSource) and replaced wholesale on every refresh: readers take an
//! `Arc<CatalogSnapshot>` from the [`CatalogStore`] and keep working against it, even if a newer snapshot is published
//! in the meantime. No entry is ever mutated in place.
mod entry;
mod snapshot;
mod store;

pub use entry::{CatalogEntry, Category, UnknownCategory};
pub use snapshot::CatalogSnapshot;
pub use store::CatalogStore;
