use std::sync::Arc;

use quiz_core::model::{Category, Level, QuestionBank, Username};
use quiz_core::{LevelProgress, ensure_attempt_record, is_unlocked, retry_set, unlock_frontier};
use tracing::{debug, error, info, instrument, warn};

use super::{AnswerFeedback, LevelEntry, LevelMenu, LevelView, QuestionView, SessionContext};
use crate::error::SessionError;
use crate::progress_store::ProgressStore;

/// Drives the play loop: lists categories and levels, opens a level and
/// scores answers.
///
/// Every operation re-reads progress from the store, and every change is
/// written back before the operation returns.
#[derive(Clone)]
pub struct SessionController {
    bank: Arc<QuestionBank>,
    store: ProgressStore,
}

impl SessionController {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, store: ProgressStore) -> Self {
        Self { bank, store }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Swap in a reloaded catalog. Stored attempt records keep their totals.
    pub fn replace_bank(&mut self, bank: Arc<QuestionBank>) {
        info!(target: "session", categories = bank.len(), "question bank replaced");
        self.bank = bank;
    }

    /// Names of all playable categories, sorted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyCatalog` if nothing was loaded.
    pub fn categories(&self) -> Result<Vec<String>, SessionError> {
        if self.bank.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }
        Ok(self.bank.category_names().map(str::to_string).collect())
    }

    /// Levels of `category` with lock state and progress for `username`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownCategory` if the category is not loaded.
    pub async fn level_menu(
        &self,
        username: &Username,
        category: &str,
    ) -> Result<LevelMenu, SessionError> {
        let cat = self.category(category)?;
        let progress = self.store.load(username).await;
        let recorded = progress.category(category);
        let frontier = unlock_frontier(cat, recorded);

        let entries = cat
            .levels()
            .map(|(level, questions)| LevelEntry {
                level,
                unlocked: is_unlocked(level, frontier),
                question_count: questions.len(),
                progress: recorded
                    .and_then(|levels| levels.get(&level))
                    .map(LevelProgress::from_record),
            })
            .collect();

        Ok(LevelMenu {
            category: category.to_string(),
            frontier,
            entries,
        })
    }

    /// Open a level: create its attempt record on first visit and return the
    /// questions still to answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the category or level does not exist, the
    /// level is locked, or a new record cannot be saved.
    #[instrument(
        level = "debug",
        skip(self),
        fields(user = %ctx.username, category = %ctx.category, level = %ctx.level)
    )]
    pub async fn enter_level(&self, ctx: &SessionContext) -> Result<LevelView, SessionError> {
        let cat = self.category(&ctx.category)?;
        let level = Self::level(cat, ctx)?;

        let mut progress = self.store.load(&ctx.username).await;
        let frontier = unlock_frontier(cat, progress.category(&ctx.category));
        if !is_unlocked(ctx.level, frontier) {
            return Err(SessionError::LevelLocked {
                level: ctx.level,
                frontier,
            });
        }

        let existing = progress.attempt(&ctx.category, ctx.level).cloned();
        let created = existing.is_none();
        let record = ensure_attempt_record(level, existing);
        if created {
            progress.set_attempt(&ctx.category, ctx.level, record.clone());
            self.store.save(&ctx.username, &progress).await?;
            debug!(target: "session", total = record.total(), "attempt record created");
        } else if record.total() != level.len() {
            warn!(
                target: "session",
                recorded = record.total(),
                available = level.len(),
                "level size changed since the record was created"
            );
        }

        let questions = retry_set(&record)
            .iter()
            .filter_map(|&index| match level.question(index) {
                Some(question) => Some(QuestionView {
                    index,
                    number: index + 1,
                    prompt: question.prompt().to_string(),
                }),
                None => {
                    warn!(
                        target: "session",
                        index,
                        "missed question no longer in the bank, skipped"
                    );
                    None
                }
            })
            .collect();

        Ok(LevelView {
            context: ctx.clone(),
            questions,
            progress: LevelProgress::from_record(&record),
            frontier,
            next_level: cat.level_after(ctx.level),
        })
    }

    /// Score `answer` for the question at `index` and persist the change.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the level cannot be played, `index` is not a
    /// question of the level, or the updated record cannot be saved.
    #[instrument(
        level = "debug",
        skip(self, answer),
        fields(user = %ctx.username, category = %ctx.category, level = %ctx.level)
    )]
    pub async fn submit_answer(
        &self,
        ctx: &SessionContext,
        index: usize,
        answer: &str,
    ) -> Result<AnswerFeedback, SessionError> {
        let cat = self.category(&ctx.category)?;
        let level = Self::level(cat, ctx)?;

        let mut progress = self.store.load(&ctx.username).await;
        let before = unlock_frontier(cat, progress.category(&ctx.category));
        if !is_unlocked(ctx.level, before) {
            return Err(SessionError::LevelLocked {
                level: ctx.level,
                frontier: before,
            });
        }

        let existing = progress.attempt(&ctx.category, ctx.level).cloned();
        let created = existing.is_none();
        let record = ensure_attempt_record(level, existing);
        let question = level
            .question(index)
            .ok_or(SessionError::UnknownQuestion { index })?;

        let submission = quiz_core::submit_answer(&record, index, answer, question)
            .inspect_err(|err| error!(target: "session", %err, "answer rejected by the engine"))?;

        if submission.persist || created {
            progress.set_attempt(&ctx.category, ctx.level, submission.record.clone());
            self.store.save(&ctx.username, &progress).await?;
        }

        let frontier = unlock_frontier(cat, progress.category(&ctx.category));
        let next_level = cat.level_after(ctx.level);
        let unlocked_now = frontier > before;
        if unlocked_now {
            info!(target: "session", %frontier, "new level unlocked");
        }

        Ok(AnswerFeedback {
            verdict: submission.verdict,
            progress: LevelProgress::from_record(&submission.record),
            frontier,
            next_level,
            next_unlocked: next_level.is_some_and(|next| is_unlocked(next, frontier)),
            unlocked_now,
        })
    }

    fn category(&self, name: &str) -> Result<&Category, SessionError> {
        if self.bank.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }
        self.bank
            .category(name)
            .ok_or_else(|| SessionError::UnknownCategory(name.to_string()))
    }

    fn level<'a>(cat: &'a Category, ctx: &SessionContext) -> Result<&'a Level, SessionError> {
        cat.level(ctx.level)
            .filter(|level| !level.is_empty())
            .ok_or_else(|| SessionError::EmptyLevel {
                category: ctx.category.clone(),
                level: ctx.level,
            })
    }
}
