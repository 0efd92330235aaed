//! Reads one CSV question source into a category.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use quiz_core::model::{Category, LevelNumber, QuestionRecord};
use tracing::debug;

use super::{SkipReason, SourceOutcome};

const LEVEL_COLUMNS: &[&str] = &["level", "уровень"];
const PROMPT_COLUMNS: &[&str] = &["question", "prompt", "вопрос"];
const ANSWER_COLUMNS: &[&str] = &["answer", "ответ"];
const ALTERNATES_COLUMNS: &[&str] = &["alternatives", "alternates", "альтернативы"];

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    level: usize,
    prompt: usize,
    answer: usize,
    alternates: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, SkipReason> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim_matches('\u{feff}').trim().to_lowercase())
            .collect();
        let find = |aliases: &[&str]| names.iter().position(|n| aliases.contains(&n.as_str()));

        let level = find(LEVEL_COLUMNS);
        let prompt = find(PROMPT_COLUMNS);
        let answer = find(ANSWER_COLUMNS);

        match (level, prompt, answer) {
            (Some(level), Some(prompt), Some(answer)) => Ok(Self {
                level,
                prompt,
                answer,
                alternates: find(ALTERNATES_COLUMNS),
            }),
            _ => {
                let missing = [(level, "level"), (prompt, "question"), (answer, "answer")]
                    .into_iter()
                    .filter(|(pos, _)| pos.is_none())
                    .map(|(_, name)| name.to_string())
                    .collect();
                Err(SkipReason::MissingColumns(missing))
            }
        }
    }
}

/// Parse a level cell. Integral decimals (`"2.0"`) are accepted because
/// spreadsheet exports write numbers that way.
pub(crate) fn parse_level(cell: &str) -> Option<LevelNumber> {
    let cell = cell.trim();
    if let Ok(level) = cell.parse::<LevelNumber>() {
        return Some(level);
    }
    let value: f64 = cell.parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    LevelNumber::new(value as u32).ok()
}

fn non_empty(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_row(record: &StringRecord, columns: Columns) -> Option<(LevelNumber, QuestionRecord)> {
    let level = parse_level(non_empty(record, columns.level)?)?;
    let prompt = non_empty(record, columns.prompt)?;
    let answer = non_empty(record, columns.answer)?;
    let alternates = columns.alternates.and_then(|idx| non_empty(record, idx));
    let question = QuestionRecord::with_alternates_list(prompt, answer, alternates).ok()?;
    Some((level, question))
}

/// Validate and read a single source file.
pub(crate) fn read_source(path: &Path) -> SourceOutcome {
    let mut reader = match ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(err) => return SourceOutcome::Skipped(SkipReason::Unreadable(err.to_string())),
    };

    let columns = match reader.headers() {
        Ok(headers) => match Columns::resolve(headers) {
            Ok(columns) => columns,
            Err(reason) => return SourceOutcome::Skipped(reason),
        },
        Err(err) => return SourceOutcome::Skipped(SkipReason::Unreadable(err.to_string())),
    };

    let mut questions = Vec::new();
    let mut dropped_rows = 0_usize;
    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => return SourceOutcome::Skipped(SkipReason::Unreadable(err.to_string())),
        };
        match parse_row(&record, columns) {
            Some(question) => questions.push(question),
            None => {
                // Header is line 1.
                debug!(
                    target: "catalog",
                    path = %path.display(),
                    line = row + 2,
                    "row dropped: missing level, question or answer"
                );
                dropped_rows += 1;
            }
        }
    }

    if questions.is_empty() {
        return SourceOutcome::Skipped(SkipReason::NoQuestions);
    }

    SourceOutcome::Loaded {
        category: Category::from_questions(questions),
        dropped_rows,
    }
}
