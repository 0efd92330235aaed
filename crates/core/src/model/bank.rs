use std::collections::BTreeMap;
use std::ops::Bound;

use crate::model::ids::LevelNumber;
use crate::model::question::QuestionRecord;

/// Ordered questions of one level. A question's position is its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Level {
    questions: Vec<QuestionRecord>,
}

impl Level {
    #[must_use]
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&QuestionRecord> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub(crate) fn push(&mut self, question: QuestionRecord) {
        self.questions.push(question);
    }
}

/// Levels of one category, keyed by level number. Gaps are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    levels: BTreeMap<LevelNumber, Level>,
}

impl Category {
    #[must_use]
    pub fn new(levels: BTreeMap<LevelNumber, Level>) -> Self {
        Self { levels }
    }

    /// Group questions by level, keeping the order in which they arrive.
    #[must_use]
    pub fn from_questions(
        questions: impl IntoIterator<Item = (LevelNumber, QuestionRecord)>,
    ) -> Self {
        let mut levels: BTreeMap<LevelNumber, Level> = BTreeMap::new();
        for (level, question) in questions {
            levels.entry(level).or_default().push(question);
        }
        Self { levels }
    }

    #[must_use]
    pub fn level(&self, number: LevelNumber) -> Option<&Level> {
        self.levels.get(&number)
    }

    /// Level numbers in ascending order.
    pub fn level_numbers(&self) -> impl Iterator<Item = LevelNumber> + '_ {
        self.levels.keys().copied()
    }

    pub fn levels(&self) -> impl Iterator<Item = (LevelNumber, &Level)> + '_ {
        self.levels.iter().map(|(number, level)| (*number, level))
    }

    #[must_use]
    pub fn max_level(&self) -> Option<LevelNumber> {
        self.levels.keys().next_back().copied()
    }

    /// First existing level strictly after `number`.
    #[must_use]
    pub fn level_after(&self, number: LevelNumber) -> Option<LevelNumber> {
        self.levels
            .range((Bound::Excluded(number), Bound::Unbounded))
            .next()
            .map(|(n, _)| *n)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.levels.values().map(Level::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Immutable catalog of categories for a session, keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    categories: BTreeMap<String, Category>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(categories: BTreeMap<String, Category>) -> Self {
        Self { categories }
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Category names in sorted order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.categories.keys().map(String::as_str)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &Category)> + '_ {
        self.categories.iter().map(|(name, cat)| (name.as_str(), cat))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
