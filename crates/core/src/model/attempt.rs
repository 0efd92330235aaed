use std::collections::BTreeSet;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("correct ({correct}) + missed ({missed}) does not match total ({total})")]
    CountMismatch {
        correct: usize,
        missed: usize,
        total: usize,
    },

    #[error("missed index {index} is outside a level of {total} questions")]
    IndexOutOfRange { index: usize, total: usize },
}

//
// ─── ATTEMPT RECORD ────────────────────────────────────────────────────────────
//

/// Scoring state of one user on one level.
///
/// Invariant: `correct + missed.len() == total`, and every missed index is
/// below `total`. `total` is frozen when the record is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    correct: usize,
    total: usize,
    missed: BTreeSet<usize>,
}

impl AttemptRecord {
    /// Fresh record for a level of `total` questions: everything is missed.
    #[must_use]
    pub fn fresh(total: usize) -> Self {
        Self {
            correct: 0,
            total,
            missed: (0..total).collect(),
        }
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if the stored values break the record invariant.
    pub fn from_persisted(
        correct: usize,
        total: usize,
        missed: impl IntoIterator<Item = usize>,
    ) -> Result<Self, AttemptError> {
        let missed: BTreeSet<usize> = missed.into_iter().collect();
        if let Some(&index) = missed.iter().find(|&&index| index >= total) {
            return Err(AttemptError::IndexOutOfRange { index, total });
        }
        if correct.checked_add(missed.len()) != Some(total) {
            return Err(AttemptError::CountMismatch {
                correct,
                missed: missed.len(),
                total,
            });
        }
        Ok(Self {
            correct,
            total,
            missed,
        })
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Positions still answered incorrectly (the retry set).
    #[must_use]
    pub fn missed(&self) -> &BTreeSet<usize> {
        &self.missed
    }

    #[must_use]
    pub fn is_missed(&self, index: usize) -> bool {
        self.missed.contains(&index)
    }

    /// True once every question of the level has been answered correctly.
    #[must_use]
    pub fn is_fully_answered(&self) -> bool {
        self.missed.is_empty()
    }

    /// Mark `index` as answered correctly. Returns false if it was not missed.
    pub(crate) fn clear_missed(&mut self, index: usize) -> bool {
        if !self.missed.remove(&index) {
            return false;
        }
        self.correct = self.total - self.missed.len();
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
