//! Abbreviations players commonly type instead of full item names.
//!
//! A shortcut only rewrites the first word of the query. The query's first word matches a key when it starts with that
//! key (ignoring case); when several keys match, the longest wins. Because of this prefix rule, keys should not be
//! prefixes of ordinary words.
use std::borrow::Cow;

use log::*;

const DEFAULT_SHORTCUTS: [(&str, &str); 10] = [
    ("mlu", "Mining Laser Upgrade"),
    ("mwd", "Microwarpdrive"),
    ("mjd", "Micro Jump Drive"),
    ("lse", "Large Shield Extender"),
    ("mse", "Medium Shield Extender"),
    ("eanm", "Energized Adaptive Nano Membrane"),
    ("dda", "Drone Damage Amplifier"),
    ("bcs", "Ballistic Control System"),
    ("sebo", "Sensor Booster"),
    ("pdu", "Power Diagnostic System"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    key: String,
    expansion: String,
}

impl Shortcut {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn expansion(&self) -> &str {
        &self.expansion
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShortcutTable {
    // Longest key first, so that the first hit is also the most specific one.
    shortcuts: Vec<Shortcut>,
}

impl ShortcutTable {
    /// An empty table. See [`ShortcutTable::standard`] for the built-in abbreviations.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut table = Self::new();
        for (key, expansion) in DEFAULT_SHORTCUTS {
            table.insert(key, expansion);
        }
        table
    }

    /// Add (or replace) a shortcut. Blank keys are ignored.
    pub fn insert<K: AsRef<str>, E: Into<String>>(&mut self, key: K, expansion: E) -> &mut Self {
        let key = key.as_ref().trim().to_lowercase();
        if key.is_empty() {
            warn!("🔎️ Ignoring shortcut with an empty key");
            return self;
        }
        self.shortcuts.retain(|s| s.key != key);
        let shortcut = Shortcut { key, expansion: expansion.into() };
        let pos = self.shortcuts.iter().position(|s| s.key.len() < shortcut.key.len()).unwrap_or(self.shortcuts.len());
        self.shortcuts.insert(pos, shortcut);
        self
    }

    /// The shortcut matching the given word, if any.
    pub fn lookup(&self, word: &str) -> Option<&Shortcut> {
        let word = word.to_lowercase();
        self.shortcuts.iter().find(|s| word.starts_with(&s.key))
    }

    /// Replace the first word of `query` with its expansion. Returns the query unchanged when no shortcut matches.
    pub fn expand<'a>(&self, query: &'a str) -> Cow<'a, str> {
        let first = query.split(' ').next().unwrap_or_default();
        match self.lookup(first) {
            Some(shortcut) => {
                let rest = &query[first.len()..];
                trace!("🔎️ Shortcut '{}' expands '{query}'", shortcut.key);
                Cow::Owned(format!("{}{rest}", shortcut.expansion))
            },
            None => Cow::Borrowed(query),
        }
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shortcut> {
        self.shortcuts.iter()
    }
}
