use quiz_core::model::{LevelNumber, Username};

/// Who is playing what: the user, the category and the level.
///
/// Passed explicitly to every controller operation instead of being kept as
/// shared mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub username: Username,
    pub category: String,
    pub level: LevelNumber,
}

impl SessionContext {
    #[must_use]
    pub fn new(username: Username, category: impl Into<String>, level: LevelNumber) -> Self {
        Self {
            username,
            category: category.into(),
            level,
        }
    }

    /// Same user and category, another level.
    #[must_use]
    pub fn with_level(&self, level: LevelNumber) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }
}
