use std::collections::BTreeMap;

use crate::model::attempt::AttemptRecord;
use crate::model::ids::LevelNumber;

/// Attempt records of one category, keyed by level.
pub type CategoryProgress = BTreeMap<LevelNumber, AttemptRecord>;

/// Everything persisted for one user: category name → level → attempt record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProgress {
    categories: BTreeMap<String, CategoryProgress>,
}

impl UserProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryProgress> {
        self.categories.get(name)
    }

    #[must_use]
    pub fn attempt(&self, category: &str, level: LevelNumber) -> Option<&AttemptRecord> {
        self.categories.get(category)?.get(&level)
    }

    /// Register a category the user has entered, even before any level.
    pub fn touch_category(&mut self, name: &str) {
        self.categories.entry(name.to_string()).or_default();
    }

    /// Store a record, creating the category entry when needed.
    pub fn set_attempt(&mut self, category: &str, level: LevelNumber, record: AttemptRecord) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(level, record);
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryProgress)> + '_ {
        self.categories
            .iter()
            .map(|(name, levels)| (name.as_str(), levels))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(BTreeMap::is_empty)
    }
}
