use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{UserProgress, Username};
use sqlx::Row;

use crate::document;
use crate::repository::{ProgressRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(
        &self,
        username: &Username,
    ) -> Result<Option<UserProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT document
            FROM user_progress
            WHERE username = ?1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row
            .try_get("document")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(document::decode(&raw)?))
    }

    async fn save_progress(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        let raw = document::encode(progress)?;
        let updated_at: DateTime<Utc> = Utc::now();

        sqlx::query(
            r"
            INSERT INTO user_progress (username, document, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(username) DO UPDATE SET
                document = excluded.document,
                updated_at = excluded.updated_at
            ",
        )
        .bind(username.as_str())
        .bind(raw)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
