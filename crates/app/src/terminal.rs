//! Line-based terminal front end.

use std::io::Write;
use std::sync::Arc;

use quiz_core::AnswerVerdict;
use quiz_core::model::{LevelNumber, QuestionBank, Username};
use services::{LevelMenu, LevelView, SessionContext, SessionController, SessionError};
use storage::{CatalogError, CatalogLoad};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Typed at the answer prompt to leave the level.
const LEAVE_LEVEL: &str = ":q";
/// Typed at the category prompt to re-read the catalog.
const RELOAD_CATALOG: &str = ":r";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TerminalError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Whether the user wants to keep going after leaving a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Quit,
}

enum CategoryChoice {
    Play(String),
    Reload,
    Quit,
}

pub struct Terminal<R, W> {
    input: Lines<R>,
    out: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            input: input.lines(),
            out,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>, TerminalError> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let line = self.input.next_line().await?;
        Ok(line.map(|line| line.trim().to_string()))
    }

    /// Interactive play loop until the user quits or input ends.
    ///
    /// `reload` re-reads the catalog when the user types `:r` at the
    /// category prompt.
    ///
    /// # Errors
    ///
    /// Returns `TerminalError` if the terminal fails, the catalog is empty or
    /// progress cannot be saved.
    pub async fn play(
        &mut self,
        controller: &mut SessionController,
        reload: &dyn Fn() -> Result<QuestionBank, CatalogError>,
        username: &Username,
        category: Option<&str>,
        level: Option<LevelNumber>,
    ) -> Result<(), TerminalError> {
        let mut preset_category = category.map(str::to_string);
        let mut preset_level = level;

        loop {
            let categories = controller.categories()?;
            let category = match preset_category.take() {
                Some(name) if categories.contains(&name) => name,
                Some(name) => {
                    writeln!(self.out, "Unknown category: {name}")?;
                    preset_level = None;
                    continue;
                }
                None => match self.choose_category(&categories).await? {
                    CategoryChoice::Play(name) => name,
                    CategoryChoice::Reload => {
                        match reload() {
                            Ok(bank) if !bank.is_empty() => {
                                writeln!(self.out, "Reloaded {} categories.", bank.len())?;
                                controller.replace_bank(Arc::new(bank));
                            }
                            Ok(_) => writeln!(
                                self.out,
                                "No playable categories found, keeping the current ones."
                            )?,
                            Err(err) => writeln!(self.out, "{err}")?,
                        }
                        continue;
                    }
                    CategoryChoice::Quit => return Ok(()),
                },
            };

            let flow = self
                .play_category(controller, username, &category, preset_level.take())
                .await?;
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    async fn choose_category(
        &mut self,
        categories: &[String],
    ) -> Result<CategoryChoice, TerminalError> {
        loop {
            writeln!(self.out, "\nCategories:")?;
            for (pos, name) in categories.iter().enumerate() {
                writeln!(self.out, "  {}. {name}", pos + 1)?;
            }

            let Some(choice) = self
                .prompt("Choose a category (:r to reload, empty to quit): ")
                .await?
            else {
                return Ok(CategoryChoice::Quit);
            };
            if choice.is_empty() {
                return Ok(CategoryChoice::Quit);
            }
            if choice == RELOAD_CATALOG {
                return Ok(CategoryChoice::Reload);
            }

            let picked = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|pos| categories.get(pos))
                .or_else(|| categories.iter().find(|name| name.eq_ignore_ascii_case(&choice)));
            match picked {
                Some(name) => return Ok(CategoryChoice::Play(name.clone())),
                None => writeln!(self.out, "No such category: {choice}")?,
            }
        }
    }

    async fn play_category(
        &mut self,
        controller: &SessionController,
        username: &Username,
        category: &str,
        mut preset_level: Option<LevelNumber>,
    ) -> Result<Flow, TerminalError> {
        loop {
            let menu = controller.level_menu(username, category).await?;
            self.print_menu(&menu)?;

            let level = match preset_level.take() {
                Some(level) => level,
                None => {
                    let Some(choice) = self.prompt("Choose a level (empty to go back): ").await?
                    else {
                        return Ok(Flow::Quit);
                    };
                    if choice.is_empty() {
                        return Ok(Flow::Back);
                    }
                    match choice.parse::<LevelNumber>() {
                        Ok(level) => level,
                        Err(err) => {
                            writeln!(self.out, "{err}")?;
                            continue;
                        }
                    }
                }
            };

            let ctx = SessionContext::new(username.clone(), category, level);
            let view = match controller.enter_level(&ctx).await {
                Ok(view) => view,
                Err(err @ (SessionError::LevelLocked { .. } | SessionError::EmptyLevel { .. })) => {
                    writeln!(self.out, "{err}")?;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            if self.play_level(controller, &ctx, view).await? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    async fn play_level(
        &mut self,
        controller: &SessionController,
        ctx: &SessionContext,
        view: LevelView,
    ) -> Result<Flow, TerminalError> {
        writeln!(self.out, "\n{}, level {}", ctx.category, ctx.level)?;
        if view.questions.is_empty() {
            writeln!(
                self.out,
                "Every question here is already answered. Progress: {} / {}",
                view.progress.correct, view.progress.total
            )?;
            return Ok(Flow::Back);
        }

        let mut progress = view.progress;
        for question in &view.questions {
            writeln!(self.out, "\nQuestion {}: {}", question.number, question.prompt)?;
            let Some(answer) = self.prompt("> ").await? else {
                return Ok(Flow::Quit);
            };
            if answer == LEAVE_LEVEL {
                return Ok(Flow::Back);
            }
            if answer.is_empty() {
                writeln!(self.out, "Skipped.")?;
                continue;
            }

            let feedback = controller
                .submit_answer(ctx, question.index, &answer)
                .await?;
            match &feedback.verdict {
                AnswerVerdict::Correct => writeln!(self.out, "Correct!")?,
                AnswerVerdict::Incorrect { expected } => {
                    writeln!(self.out, "Wrong. The answer is: {expected}")?;
                }
            }
            writeln!(
                self.out,
                "Progress: {} / {}",
                feedback.progress.correct, feedback.progress.total
            )?;
            if let Some(next) = feedback.next_level.filter(|_| feedback.unlocked_now) {
                writeln!(self.out, "Level {next} is now unlocked!")?;
            }
            progress = feedback.progress;
        }

        if progress.fully_answered {
            writeln!(
                self.out,
                "\nCongratulations! Every question of level {} is answered.",
                ctx.level
            )?;
            if !progress.cleared && view.next_level.is_some() {
                writeln!(
                    self.out,
                    "The next level needs 10 correct answers, this one has only {}.",
                    progress.total
                )?;
            }
        } else {
            writeln!(
                self.out,
                "\n{} question(s) left to retry.",
                progress.remaining
            )?;
        }
        Ok(Flow::Back)
    }

    fn print_menu(&mut self, menu: &LevelMenu) -> Result<(), TerminalError> {
        writeln!(self.out, "\n{}:", menu.category)?;
        for entry in &menu.entries {
            let lock = if entry.unlocked { "🔓" } else { "🔒" };
            match entry.progress {
                Some(progress) => writeln!(
                    self.out,
                    "  {lock} Level {}  {} / {} ({:.0}%)",
                    entry.level,
                    progress.correct,
                    progress.total,
                    progress.ratio() * 100.0
                )?,
                None => writeln!(
                    self.out,
                    "  {lock} Level {}  {} questions",
                    entry.level, entry.question_count
                )?,
            }
        }
        Ok(())
    }

    /// Level menus of every category for one user.
    ///
    /// # Errors
    ///
    /// Returns `TerminalError` if the catalog is empty or output fails.
    pub async fn status(
        &mut self,
        controller: &SessionController,
        username: &Username,
    ) -> Result<(), TerminalError> {
        writeln!(self.out, "Progress of {username}")?;
        for category in controller.categories()? {
            let menu = controller.level_menu(username, &category).await?;
            self.print_menu(&menu)?;
        }
        Ok(())
    }

    /// Report which sources loaded and why others were skipped.
    ///
    /// # Errors
    ///
    /// Returns `TerminalError::Io` if output fails.
    pub fn report_catalog(&mut self, load: &CatalogLoad) -> Result<(), TerminalError> {
        for source in &load.loaded {
            write!(
                self.out,
                "ok      {}: {} level(s), {} question(s)",
                source.name, source.levels, source.questions
            )?;
            if source.dropped_rows > 0 {
                write!(self.out, ", {} incomplete row(s) ignored", source.dropped_rows)?;
            }
            writeln!(self.out)?;
        }
        for source in &load.skipped {
            writeln!(
                self.out,
                "skipped {} ({}): {}",
                source.name,
                source.path.display(),
                source.reason
            )?;
        }
        if load.loaded.is_empty() {
            writeln!(self.out, "No playable categories found.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use quiz_core::model::{Category, QuestionRecord};
    use services::ProgressStore;
    use storage::repository::InMemoryRepository;

    use super::*;

    fn bank(level_one: usize) -> QuestionBank {
        let questions = (0..level_one)
            .map(|i| (LevelNumber::FIRST, format!("Q{i}"), format!("a{i}")))
            .chain(std::iter::once((
                LevelNumber::new(2).unwrap(),
                "Last".to_string(),
                "z".to_string(),
            )))
            .map(|(level, prompt, answer)| {
                (level, QuestionRecord::new(prompt, answer, Vec::<String>::new()).unwrap())
            });
        let mut categories = BTreeMap::new();
        categories.insert("Films".to_string(), Category::from_questions(questions));
        QuestionBank::new(categories)
    }

    fn controller(level_one: usize) -> SessionController {
        SessionController::new(
            Arc::new(bank(level_one)),
            ProgressStore::new(Arc::new(InMemoryRepository::new())),
        )
    }

    async fn run_play(controller: &mut SessionController, input: &str) -> String {
        let mut terminal = Terminal::new(input.as_bytes(), Vec::new());
        let user = Username::new("alice").unwrap();
        let reload = || Ok::<_, CatalogError>(bank(20));
        terminal
            .play(controller, &reload, &user, None, None)
            .await
            .unwrap();
        String::from_utf8(terminal.into_output()).unwrap()
    }

    #[tokio::test]
    async fn answering_shows_feedback_and_progress() {
        let mut controller = controller(2);
        let out = run_play(&mut controller, "1\n1\na0\nwrong\n").await;

        assert!(out.contains("🔓 Level 1"));
        assert!(out.contains("🔒 Level 2"));
        assert!(out.contains("Question 1: Q0"));
        assert!(out.contains("Correct!"));
        assert!(out.contains("Wrong. The answer is: a1"));
        assert!(out.contains("Progress: 1 / 2"));
        assert!(out.contains("1 question(s) left to retry."));
    }

    #[tokio::test]
    async fn clearing_a_level_announces_the_unlock() {
        let mut controller = controller(10);
        let answers: String = (0..10).map(|i| format!("a{i}\n")).collect();
        let out = run_play(&mut controller, &format!("Films\n1\n{answers}")).await;

        assert!(out.contains("Level 2 is now unlocked!"));
        assert!(out.contains("Congratulations!"));
        assert!(out.contains("🔓 Level 2"));
    }

    #[tokio::test]
    async fn locked_level_is_refused() {
        let mut controller = controller(1);
        let out = run_play(&mut controller, "1\n2\n").await;
        assert!(out.contains("level 2 is still locked"));
    }

    #[tokio::test]
    async fn skip_and_leave_commands() {
        let mut controller = controller(3);
        let out = run_play(&mut controller, "1\n1\n\n:q\n\n\n").await;
        assert!(out.contains("Skipped."));
        assert!(!out.contains("Question 3"));
        assert!(!out.contains("Progress:"));
    }

    #[tokio::test]
    async fn reload_swaps_the_catalog() {
        let mut controller = controller(2);
        let out = run_play(&mut controller, ":r\n").await;
        assert!(out.contains("Reloaded 1 categories."));
        let level_one = controller.bank().category("Films").unwrap().level(LevelNumber::FIRST);
        assert_eq!(level_one.unwrap().len(), 20);
    }
}
