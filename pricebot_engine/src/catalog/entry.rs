use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------      Category       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Item,
    Region,
    System,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Item, Category::Region, Category::System];

    /// The plural form, used for file names and log messages.
    pub fn plural(&self) -> &'static str {
        match self {
            Category::Item => "items",
            Category::Region => "regions",
            Category::System => "systems",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Item => f.write_str("item"),
            Category::Region => f.write_str("region"),
            Category::System => f.write_str("system"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Unknown catalog category: {0}")]
pub struct UnknownCategory(String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "item" | "items" => Ok(Category::Item),
            "region" | "regions" => Ok(Category::Region),
            "system" | "systems" => Ok(Category::System),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

//--------------------------------------    CatalogEntry     ---------------------------------------------------------
/// A single resolvable entity. Ids are only unique within a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    pub category: Category,
}

impl CatalogEntry {
    pub fn new<S: Into<String>>(id: i64, name: S, category: Category) -> Self {
        Self { id, name: name.into(), category }
    }

    pub fn item<S: Into<String>>(id: i64, name: S) -> Self {
        Self::new(id, name, Category::Item)
    }

    pub fn region<S: Into<String>>(id: i64, name: S) -> Self {
        Self::new(id, name, Category::Region)
    }

    pub fn system<S: Into<String>>(id: i64, name: S) -> Self {
        Self::new(id, name, Category::System)
    }

    /// Entries without a usable name can never be matched and are discarded at load time.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

impl Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} #{}]", self.name, self.category, self.id)
    }
}
