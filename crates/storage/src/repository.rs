use async_trait::async_trait;
use quiz_core::model::{UserProgress, Username};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json::JsonFileRepository;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for per-user progress records.
///
/// One record per username. A save replaces the whole record; readers never
/// observe a partially written one. Concurrent writers for the same username
/// are not coordinated: the last save wins.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored progress for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record exists but cannot be read or decoded.
    async fn load_progress(
        &self,
        username: &Username,
    ) -> Result<Option<UserProgress>, StorageError>;

    /// Replace the stored progress for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn save_progress(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<Username, UserProgress>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(
        &self,
        username: &Username,
    ) -> Result<Option<UserProgress>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(username).cloned())
    }

    async fn save_progress(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(username.clone(), progress.clone());
        Ok(())
    }
}

/// Progress repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }

    /// Build a `Storage` writing one JSON file per user under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub async fn json_dir(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let repo = JsonFileRepository::open(dir).await?;
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Ok(Self { progress })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AttemptRecord, LevelNumber};

    #[tokio::test]
    async fn in_memory_round_trips_progress() {
        let repo = InMemoryRepository::new();
        let user = Username::new("ann").unwrap();
        assert!(repo.load_progress(&user).await.unwrap().is_none());

        let mut progress = UserProgress::new();
        progress.set_attempt(
            "Films",
            LevelNumber::FIRST,
            AttemptRecord::from_persisted(1, 3, [1, 2]).unwrap(),
        );
        repo.save_progress(&user, &progress).await.unwrap();

        let loaded = repo.load_progress(&user).await.unwrap();
        assert_eq!(loaded, Some(progress));
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let storage = Storage::in_memory();
        let user = Username::new("ann").unwrap();

        let mut first = UserProgress::new();
        first.set_attempt("A", LevelNumber::FIRST, AttemptRecord::fresh(2));
        storage.progress.save_progress(&user, &first).await.unwrap();

        let second = UserProgress::new();
        storage.progress.save_progress(&user, &second).await.unwrap();

        let loaded = storage.progress.load_progress(&user).await.unwrap();
        assert_eq!(loaded, Some(second));
    }
}
