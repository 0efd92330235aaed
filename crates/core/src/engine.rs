//! Level progress rules: retry sets, scoring and level unlocking.
//!
//! Everything here is pure. Callers load and persist the records.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{AttemptRecord, Category, CategoryProgress, Level, LevelNumber, QuestionRecord};

/// Correct answers needed on a level before the next one unlocks.
///
/// Independent of level size: a level with fewer questions never unlocks
/// the next one.
pub const UNLOCK_THRESHOLD: usize = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Caller bugs detected by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("question index {index} is outside a level of {total} questions")]
    IndexOutOfRange { index: usize, total: usize },
}

//
// ─── UNLOCKING ─────────────────────────────────────────────────────────────────
//

/// True if the record has enough correct answers to unlock the next level.
#[must_use]
pub fn is_cleared(record: &AttemptRecord) -> bool {
    record.correct() >= UNLOCK_THRESHOLD
}

/// Highest level the user may currently open in `category`.
///
/// Walks level numbers from 1 upward and stops at the first one that has no
/// record or is not cleared. A number missing from the category has no record,
/// so it stops the walk too. The walk never goes past the category's highest
/// level; an empty category yields level 1.
///
/// # Examples
///
/// ```
/// # use quiz_core::engine::unlock_frontier;
/// # use quiz_core::model::{Category, LevelNumber, QuestionRecord};
/// let question = QuestionRecord::new("Q", "A", Vec::<&str>::new())?;
/// let category = Category::from_questions(vec![
///     (LevelNumber::new(1)?, question.clone()),
///     (LevelNumber::new(2)?, question),
/// ]);
///
/// assert_eq!(unlock_frontier(&category, None), LevelNumber::FIRST);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn unlock_frontier(category: &Category, progress: Option<&CategoryProgress>) -> LevelNumber {
    let Some(last) = category.max_level() else {
        return LevelNumber::FIRST;
    };
    let mut frontier = LevelNumber::FIRST;
    while frontier < last {
        let cleared = progress
            .and_then(|levels| levels.get(&frontier))
            .is_some_and(is_cleared);
        match frontier.next() {
            Some(next) if cleared => frontier = next,
            _ => break,
        }
    }
    frontier
}

/// Lock indicator for a level given the current frontier.
#[must_use]
pub fn is_unlocked(level: LevelNumber, frontier: LevelNumber) -> bool {
    level <= frontier
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Return the existing record, or a fresh one sized to the level.
#[must_use]
pub fn ensure_attempt_record(level: &Level, existing: Option<AttemptRecord>) -> AttemptRecord {
    existing.unwrap_or_else(|| AttemptRecord::fresh(level.len()))
}

/// Question positions to show on this pass, in positional order.
///
/// Empty means the level is fully answered, whatever the unlock state.
#[must_use]
pub fn retry_set(record: &AttemptRecord) -> &BTreeSet<usize> {
    record.missed()
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// What the user sees after submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerVerdict {
    Correct,
    Incorrect { expected: String },
}

impl AnswerVerdict {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerVerdict::Correct)
    }
}

/// Result of [`submit_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub record: AttemptRecord,
    pub verdict: AnswerVerdict,
    /// The record changed and has to be written before the next answer.
    pub persist: bool,
}

/// Score one answer against the question at `index`.
///
/// Only a correct answer to a missed question changes the record. Re-answering
/// a question that is already correct, or answering wrong, leaves it untouched.
///
/// # Errors
///
/// Returns `EngineError::IndexOutOfRange` if `index` is not below the
/// record's `total`.
pub fn submit_answer(
    record: &AttemptRecord,
    index: usize,
    user_text: &str,
    question: &QuestionRecord,
) -> Result<Submission, EngineError> {
    if index >= record.total() {
        return Err(EngineError::IndexOutOfRange {
            index,
            total: record.total(),
        });
    }

    if !question.accepts(user_text) {
        return Ok(Submission {
            record: record.clone(),
            verdict: AnswerVerdict::Incorrect {
                expected: question.display_answer().to_string(),
            },
            persist: false,
        });
    }

    let mut next = record.clone();
    let persist = next.clear_missed(index);
    Ok(Submission {
        record: next,
        verdict: AnswerVerdict::Correct,
        persist,
    })
}

//
// ─── PROGRESS VIEW ─────────────────────────────────────────────────────────────
//

/// Per-level numbers the presentation layer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub correct: usize,
    pub total: usize,
    pub remaining: usize,
    /// Retry set is empty.
    pub fully_answered: bool,
    /// Enough correct answers to unlock the next level.
    pub cleared: bool,
}

impl LevelProgress {
    #[must_use]
    pub fn from_record(record: &AttemptRecord) -> Self {
        Self {
            correct: record.correct(),
            total: record.total(),
            remaining: record.missed().len(),
            fully_answered: record.is_fully_answered(),
            cleared: is_cleared(record),
        }
    }

    /// `correct / total`, or 0 for an empty level.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
