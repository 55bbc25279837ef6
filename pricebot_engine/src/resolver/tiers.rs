//! The structural matching tiers. Everything here is pure: the resolver decides which tier's candidates survive the
//! publication filter.
use std::fmt::Display;

use crate::{
    catalog::CatalogEntry,
    resolver::text::{strip_quotes, words},
};

/// The text-based tiers, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Every query word is a whole word of the name.
    Words,
    Prefix,
    Suffix,
    Substring,
}

impl Tier {
    pub const STRUCTURAL: [Tier; 4] = [Tier::Words, Tier::Prefix, Tier::Suffix, Tier::Substring];
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Words => f.write_str("word"),
            Tier::Prefix => f.write_str("prefix"),
            Tier::Suffix => f.write_str("suffix"),
            Tier::Substring => f.write_str("substring"),
        }
    }
}

struct ViewEntry<'a> {
    entry: &'a CatalogEntry,
    // lowercased name, quote-free in a stripped view
    folded: String,
    // lowercased, always quote-free
    words: Vec<String>,
}

/// The catalog as the tiers see it. A quote-stripped view compares against names with quotes removed, but candidates
/// always refer back to the original entries.
pub struct CatalogView<'a> {
    entries: Vec<ViewEntry<'a>>,
}

impl<'a> CatalogView<'a> {
    pub fn plain(catalog: &'a [CatalogEntry]) -> Self {
        Self::build(catalog, false)
    }

    pub fn quote_stripped(catalog: &'a [CatalogEntry]) -> Self {
        Self::build(catalog, true)
    }

    fn build(catalog: &'a [CatalogEntry], strip: bool) -> Self {
        let entries = catalog
            .iter()
            .filter(|e| e.has_name())
            .map(|entry| {
                let folded = if strip { strip_quotes(&entry.name).to_lowercase() } else { entry.name.to_lowercase() };
                ViewEntry { entry, folded, words: words(&entry.name) }
            })
            .collect();
        Self { entries }
    }

    /// All entries matching `query` under the given tier. `query` must already be whitespace-normalised.
    pub fn candidates(&self, tier: Tier, query: &str) -> Vec<&'a CatalogEntry> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        match tier {
            Tier::Words => {
                let wanted = words(query);
                if wanted.is_empty() {
                    return Vec::new();
                }
                self.select(|e| wanted.iter().all(|w| e.words.contains(w)))
            },
            Tier::Prefix => self.select(|e| e.folded.starts_with(&needle)),
            Tier::Suffix => self.select(|e| e.folded.ends_with(&needle)),
            Tier::Substring => self.select(|e| e.folded.contains(&needle)),
        }
    }

    fn select<F>(&self, predicate: F) -> Vec<&'a CatalogEntry>
    where F: Fn(&ViewEntry<'a>) -> bool {
        self.entries.iter().filter(|e| predicate(*e)).map(|e| e.entry).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pick the entry with the shortest name; equal lengths go to the lowest id.
pub fn shortest_name<'a, I>(candidates: I) -> Option<&'a CatalogEntry>
where I: IntoIterator<Item = &'a CatalogEntry> {
    candidates.into_iter().min_by(|a, b| a.name.chars().count().cmp(&b.name.chars().count()).then(a.id.cmp(&b.id)))
}
