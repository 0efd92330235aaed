//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::EngineError;
use quiz_core::model::LevelNumber;
use storage::repository::StorageError;

/// Errors emitted by `ProgressStore::save`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressStoreError {
    #[error("could not save progress: {0}")]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionController`.
///
/// Every message is meant to be shown to the user as-is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no question categories are available")]
    EmptyCatalog,
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("level {level} of {category} has no questions")]
    EmptyLevel { category: String, level: LevelNumber },
    #[error(
        "level {level} is still locked; pass level {frontier} with 10+ correct answers first"
    )]
    LevelLocked {
        level: LevelNumber,
        frontier: LevelNumber,
    },
    #[error("question {index} does not exist in this level")]
    UnknownQuestion { index: usize },
    #[error("internal error: {0}")]
    Contract(#[from] EngineError),
    #[error(transparent)]
    Progress(#[from] ProgressStoreError),
}
