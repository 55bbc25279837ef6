//! # Name resolution
//!
//! [`Resolver`] turns free text typed by a user into a single [`CatalogEntry`]. Matching happens in tiers, and the
//! first tier that yields an entry passing the [`PublicationFilter`] wins:
//!
//! 1. A leading number is tried as an entity id.
//! 2. A leading abbreviation is expanded via the [`ShortcutTable`]. This only rewrites the query.
//! 3. Every query word appears as a whole word in the name (quotes ignored).
//! 4. The name starts with the query.
//! 5. The name ends with the query.
//! 6. The name contains the query.
//! 7. The best fuzzy match, if a [`FuzzyIndex`] is available. Results from this tier are flagged as guesses.
//!
//! Among the survivors of a tier the shortest name wins, since longer names tend to be variants of the intended
//! "base" entity. Equal lengths are decided by the lowest id.
//!
//! If tiers 3-7 find nothing and the query contains quote characters, the tiers are run once more with the quotes
//! removed from both the query and the catalog names.
mod fuzzy;
mod result;
mod text;
mod tiers;

use futures_util::future::join_all;
pub use fuzzy::{FuzzyIndex, FuzzyMatch, NameIndex};
use log::*;
use pricebot_common::helpers::squash_whitespace;
pub use result::ResolutionResult;
pub use text::{leading_id, strip_quotes};
pub use tiers::{shortest_name, CatalogView, Tier};

use crate::{
    catalog::{CatalogEntry, CatalogSnapshot, Category},
    shortcuts::ShortcutTable,
    traits::PublicationFilter,
};

pub struct Resolver<P> {
    shortcuts: ShortcutTable,
    filter: P,
    fuzzy_enabled: bool,
}

impl<P> std::fmt::Debug for Resolver<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Resolver({} shortcuts, fuzzy: {})", self.shortcuts.len(), self.fuzzy_enabled)
    }
}

impl<P> Resolver<P> {
    pub fn new(shortcuts: ShortcutTable, filter: P) -> Self {
        Self { shortcuts, filter, fuzzy_enabled: true }
    }

    /// Turn the fuzzy fallback on or off for [`Resolver::resolve_in`].
    pub fn with_fuzzy_matching(mut self, enabled: bool) -> Self {
        self.fuzzy_enabled = enabled;
        self
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn filter(&self) -> &P {
        &self.filter
    }
}

impl<P> Resolver<P>
where P: PublicationFilter
{
    /// Resolve `input` against one category of a catalog snapshot, using the snapshot's fuzzy index when fuzzy
    /// matching is enabled.
    pub async fn resolve_in(&self, input: &str, snapshot: &CatalogSnapshot, category: Category) -> ResolutionResult {
        let fuzzy = if self.fuzzy_enabled { snapshot.fuzzy_index(category) } else { None };
        self.resolve(input, snapshot.entries(category), fuzzy.map(|f| f as &dyn FuzzyIndex)).await
    }

    /// Resolve `input` against `catalog`.
    ///
    /// Blank input gives an empty result that is not a guess. Input that matches nothing gives an empty result that
    /// *is* a guess.
    pub async fn resolve(
        &self,
        input: &str,
        catalog: &[CatalogEntry],
        fuzzy: Option<&dyn FuzzyIndex>,
    ) -> ResolutionResult {
        let query = squash_whitespace(input);
        if query.is_empty() {
            trace!("🔎️ Blank input, nothing to resolve");
            return ResolutionResult::empty(false);
        }
        if let Some(result) = self.match_id(&query, catalog).await {
            return result;
        }
        let expanded = self.shortcuts.expand(&query);
        if let Some(result) = self.match_tiered(&expanded, &CatalogView::plain(catalog), fuzzy).await {
            return result;
        }
        let stripped = squash_whitespace(&strip_quotes(&expanded));
        if stripped != expanded && !stripped.is_empty() {
            debug!("🔎️ No match for '{expanded}', retrying as '{stripped}'");
            if let Some(result) = self.match_tiered(&stripped, &CatalogView::quote_stripped(catalog), fuzzy).await {
                return result;
            }
        }
        debug!("🔎️ Nothing matches '{query}'");
        ResolutionResult::empty(true)
    }

    async fn match_id(&self, query: &str, catalog: &[CatalogEntry]) -> Option<ResolutionResult> {
        let id = leading_id(query)?;
        let candidates = catalog.iter().filter(|e| e.id == id && e.has_name()).collect::<Vec<_>>();
        let survivors = self.published(candidates).await;
        match shortest_name(survivors) {
            Some(entry) => {
                debug!("🔎️ '{query}' resolved by id to {entry}");
                Some(ResolutionResult::by_id(entry.clone()))
            },
            None => {
                trace!("🔎️ '{query}' looks like an id, but no published entity has id {id}");
                None
            },
        }
    }

    /// Run the text tiers and the fuzzy fallback over `view`, without any retry.
    async fn match_tiered(
        &self,
        query: &str,
        view: &CatalogView<'_>,
        fuzzy: Option<&dyn FuzzyIndex>,
    ) -> Option<ResolutionResult> {
        for tier in Tier::STRUCTURAL {
            let candidates = view.candidates(tier, query);
            if candidates.is_empty() {
                continue;
            }
            let count = candidates.len();
            let survivors = self.published(candidates).await;
            trace!("🔎️ {tier} tier: {} of {count} candidates for '{query}' are published", survivors.len());
            if let Some(entry) = shortest_name(survivors) {
                debug!("🔎️ '{query}' resolved to {entry} by the {tier} tier");
                return Some(ResolutionResult::matched(entry.clone()));
            }
        }
        let best = fuzzy.and_then(|index| index.best(query))?;
        let survivors = self.published(vec![best.entry]).await;
        let entry = survivors.into_iter().next()?;
        debug!("🔎️ '{query}' guessed as {entry} (score {})", best.score);
        Some(ResolutionResult::guessed(entry.clone()))
    }

    /// Check every candidate concurrently, keeping those that are published. Lookup failures drop the candidate.
    async fn published<'a>(&self, candidates: Vec<&'a CatalogEntry>) -> Vec<&'a CatalogEntry> {
        let checks = join_all(candidates.iter().map(|entry| self.filter.is_published(entry))).await;
        candidates
            .into_iter()
            .zip(checks)
            .filter_map(|(entry, check)| match check {
                Ok(true) => Some(entry),
                Ok(false) => {
                    trace!("🔎️ {entry} is not published");
                    None
                },
                Err(e) => {
                    warn!("🔎️ Dropping candidate {entry}. {e}");
                    None
                },
            })
            .collect()
    }
}
