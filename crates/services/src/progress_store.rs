use std::sync::Arc;

use quiz_core::model::{UserProgress, Username};
use storage::repository::ProgressRepository;
use tracing::{debug, warn};

use crate::error::ProgressStoreError;

/// Loads and saves user progress on top of a repository.
///
/// Loading is fail-open: a missing, unreadable or invalid record yields empty
/// progress so the user can keep playing.
#[derive(Clone)]
pub struct ProgressStore {
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self { repo }
    }

    /// Load the user's progress, or empty progress when none can be read.
    pub async fn load(&self, username: &Username) -> UserProgress {
        match self.repo.load_progress(username).await {
            Ok(Some(progress)) => progress,
            Ok(None) => {
                debug!(target: "progress", user = %username, "no stored progress");
                UserProgress::new()
            }
            Err(err) => {
                warn!(
                    target: "progress",
                    user = %username,
                    error = %err,
                    "stored progress is unreadable, starting from scratch"
                );
                UserProgress::new()
            }
        }
    }

    /// Replace the user's stored progress.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError::Storage` if the write fails.
    pub async fn save(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), ProgressStoreError> {
        self.repo.save_progress(username, progress).await?;
        debug!(target: "progress", user = %username, "progress saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AttemptRecord, LevelNumber};
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn unknown_user_loads_empty() {
        let store = ProgressStore::new(Arc::new(InMemoryRepository::new()));
        let user = Username::new("nobody").unwrap();
        assert!(store.load(&user).await.is_empty());
    }

    #[tokio::test]
    async fn saved_progress_reads_back() {
        let store = ProgressStore::new(Arc::new(InMemoryRepository::new()));
        let user = Username::new("alice").unwrap();
        let mut progress = UserProgress::new();
        progress.set_attempt("Films", LevelNumber::FIRST, AttemptRecord::fresh(2));

        store.save(&user, &progress).await.unwrap();
        assert_eq!(store.load(&user).await, progress);
    }
}
