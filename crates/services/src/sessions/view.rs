use quiz_core::model::LevelNumber;
use quiz_core::{AnswerVerdict, LevelProgress};

use super::SessionContext;

/// One row of the level menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub level: LevelNumber,
    pub unlocked: bool,
    pub question_count: usize,
    /// `None` until the user has entered the level.
    pub progress: Option<LevelProgress>,
}

/// Levels of a category as seen by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMenu {
    pub category: String,
    pub frontier: LevelNumber,
    pub entries: Vec<LevelEntry>,
}

impl LevelMenu {
    #[must_use]
    pub fn entry(&self, level: LevelNumber) -> Option<&LevelEntry> {
        self.entries.iter().find(|entry| entry.level == level)
    }
}

/// A question still waiting for a correct answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// Position inside the level, used when submitting.
    pub index: usize,
    /// 1-based number for display.
    pub number: usize,
    pub prompt: String,
}

/// State of a level right after entering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelView {
    pub context: SessionContext,
    /// Retry set in ascending order. Empty when every question is answered.
    pub questions: Vec<QuestionView>,
    pub progress: LevelProgress,
    pub frontier: LevelNumber,
    pub next_level: Option<LevelNumber>,
}

impl LevelView {
    #[must_use]
    pub fn is_fully_answered(&self) -> bool {
        self.progress.fully_answered
    }
}

/// Outcome of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub verdict: AnswerVerdict,
    pub progress: LevelProgress,
    pub frontier: LevelNumber,
    pub next_level: Option<LevelNumber>,
    /// The next level is open after this answer.
    pub next_unlocked: bool,
    /// This answer moved the frontier forward.
    pub unlocked_now: bool,
}
