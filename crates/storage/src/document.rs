//! Serialized shape of a user's progress record.
//!
//! ```json
//! {
//!   "cat_Films": {
//!     "lvl_1": { "correct": 1, "total": 3, "mistakes": [1, 2] }
//!   }
//! }
//! ```
//!
//! Both the JSON-file and the `SQLite` backends store this document.

use std::collections::BTreeMap;

use quiz_core::model::{AttemptRecord, LevelNumber, UserProgress};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::StorageError;

const CATEGORY_PREFIX: &str = "cat_";
const LEVEL_PREFIX: &str = "lvl_";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("category key {0:?} is missing the `cat_` prefix")]
    CategoryKey(String),

    #[error("level key {0:?} is not of the form `lvl_<n>`")]
    LevelKey(String),

    #[error(transparent)]
    Domain(#[from] quiz_core::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<DocumentError> for StorageError {
    fn from(err: DocumentError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AttemptDocument {
    correct: usize,
    total: usize,
    mistakes: Vec<usize>,
}

type ProgressDocument = BTreeMap<String, BTreeMap<String, AttemptDocument>>;

fn to_document(progress: &UserProgress) -> ProgressDocument {
    progress
        .categories()
        .map(|(name, levels)| {
            let levels = levels
                .iter()
                .map(|(level, record)| {
                    (
                        format!("{LEVEL_PREFIX}{level}"),
                        AttemptDocument {
                            correct: record.correct(),
                            total: record.total(),
                            mistakes: record.missed().iter().copied().collect(),
                        },
                    )
                })
                .collect();
            (format!("{CATEGORY_PREFIX}{name}"), levels)
        })
        .collect()
}

fn from_document(document: ProgressDocument) -> Result<UserProgress, DocumentError> {
    let mut progress = UserProgress::new();
    for (category_key, levels) in document {
        let category = category_key
            .strip_prefix(CATEGORY_PREFIX)
            .ok_or_else(|| DocumentError::CategoryKey(category_key.clone()))?;
        progress.touch_category(category);
        for (level_key, attempt) in levels {
            let level: LevelNumber = level_key
                .strip_prefix(LEVEL_PREFIX)
                .ok_or_else(|| DocumentError::LevelKey(level_key.clone()))?
                .parse()
                .map_err(|_| DocumentError::LevelKey(level_key.clone()))?;
            let record =
                AttemptRecord::from_persisted(attempt.correct, attempt.total, attempt.mistakes)
                    .map_err(quiz_core::Error::from)?;
            progress.set_attempt(category, level, record);
        }
    }
    Ok(progress)
}

/// Encode progress as pretty-printed UTF-8 JSON.
///
/// # Errors
///
/// Returns `DocumentError::Json` if serialization fails.
pub fn encode(progress: &UserProgress) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&to_document(progress))?)
}

/// Decode and validate a stored document.
///
/// # Errors
///
/// Returns `DocumentError` for malformed JSON, unknown keys or records that
/// break the attempt invariants.
pub fn decode(raw: &str) -> Result<UserProgress, DocumentError> {
    let document: ProgressDocument = serde_json::from_str(raw)?;
    from_document(document)
}
