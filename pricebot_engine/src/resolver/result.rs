use crate::catalog::CatalogEntry;

/// The outcome of resolving one piece of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// `None` is the empty result: nothing matched.
    pub entity: Option<CatalogEntry>,
    /// The entity came from the fuzzy fallback (or nothing matched at all) and should be confirmed with the user.
    pub is_guess: bool,
    /// The input was interpreted as a numeric id.
    pub is_numeric_id: bool,
}

impl ResolutionResult {
    pub fn empty(is_guess: bool) -> Self {
        Self { entity: None, is_guess, is_numeric_id: false }
    }

    pub fn matched(entity: CatalogEntry) -> Self {
        Self { entity: Some(entity), is_guess: false, is_numeric_id: false }
    }

    pub fn guessed(entity: CatalogEntry) -> Self {
        Self { entity: Some(entity), is_guess: true, is_numeric_id: false }
    }

    pub fn by_id(entity: CatalogEntry) -> Self {
        Self { entity: Some(entity), is_guess: false, is_numeric_id: true }
    }

    pub fn is_empty(&self) -> bool {
        self.entity.is_none()
    }

    pub fn id(&self) -> Option<i64> {
        self.entity.as_ref().map(|e| e.id)
    }

    pub fn name(&self) -> Option<&str> {
        self.entity.as_ref().map(|e| e.name.as_str())
    }
}
