use nucleo_matcher::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config,
    Matcher,
    Utf32String,
};

use crate::catalog::CatalogEntry;

/// A ranked fuzzy hit. Higher scores are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatch<'a> {
    pub entry: &'a CatalogEntry,
    pub score: u32,
}

/// Black-box approximate matcher over one category of the catalog.
pub trait FuzzyIndex: Send + Sync {
    /// Up to `limit` entries matching `query`, best first.
    fn ranked(&self, query: &str, limit: usize) -> Vec<FuzzyMatch<'_>>;

    fn best(&self, query: &str) -> Option<FuzzyMatch<'_>> {
        self.ranked(query, 1).into_iter().next()
    }
}

/// [`FuzzyIndex`] backed by `nucleo-matcher`.
///
/// The query is matched literally: characters that the nucleo pattern syntax would otherwise treat as operators
/// (`^`, `$`, `!`, `'`) are plain text here.
#[derive(Debug, Default)]
pub struct NameIndex {
    entries: Vec<CatalogEntry>,
    haystacks: Vec<Utf32String>,
}

impl NameIndex {
    pub fn new(entries: &[CatalogEntry]) -> Self {
        let entries = entries.iter().filter(|e| e.has_name()).cloned().collect::<Vec<_>>();
        let haystacks = entries.iter().map(|e| Utf32String::from(e.name.as_str())).collect();
        Self { entries, haystacks }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FuzzyIndex for NameIndex {
    fn ranked(&self, query: &str, limit: usize) -> Vec<FuzzyMatch<'_>> {
        if query.trim().is_empty() || limit == 0 {
            return Vec::new();
        }
        let pattern = Pattern::new(query, CaseMatching::Ignore, Normalization::Smart, AtomKind::Fuzzy);
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut scored = self
            .haystacks
            .iter()
            .zip(&self.entries)
            .filter_map(|(haystack, entry)| {
                pattern.score(haystack.slice(..), &mut matcher).map(|score| FuzzyMatch { entry, score })
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.entry.name.len().cmp(&b.entry.name.len()))
                .then_with(|| a.entry.id.cmp(&b.entry.id))
        });
        scored.truncate(limit);
        scored
    }
}
