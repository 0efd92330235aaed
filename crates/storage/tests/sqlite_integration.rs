use quiz_core::model::{AttemptRecord, LevelNumber, UserProgress, Username};
use storage::repository::{ProgressRepository, Storage};
use storage::sqlite::SqliteRepository;

fn sample_progress() -> UserProgress {
    let mut progress = UserProgress::new();
    progress.set_attempt(
        "Films",
        LevelNumber::FIRST,
        AttemptRecord::from_persisted(10, 12, [3, 7]).unwrap(),
    );
    progress.set_attempt(
        "Films",
        LevelNumber::new(2).unwrap(),
        AttemptRecord::fresh(4),
    );
    progress.touch_category("Музыка");
    progress
}

async fn memory_repo(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:memdb_progress_{name}?mode=memory&cache=shared");
    SqliteRepository::connect(&url).await.expect("connect")
}

#[tokio::test]
async fn sqlite_roundtrip_persists_progress() {
    let repo = memory_repo("roundtrip").await;
    repo.migrate().await.expect("migrate");

    let user = Username::new("ann").unwrap();
    assert!(repo.load_progress(&user).await.unwrap().is_none());

    let progress = sample_progress();
    repo.save_progress(&user, &progress).await.unwrap();

    let loaded = repo.load_progress(&user).await.unwrap();
    assert_eq!(loaded, Some(progress));
}

#[tokio::test]
async fn sqlite_save_overwrites_and_keeps_users_apart() {
    let storage = Storage::sqlite("sqlite:file:memdb_progress_users?mode=memory&cache=shared")
        .await
        .expect("storage");
    let ann = Username::new("ann").unwrap();
    let bob = Username::new("bob").unwrap();

    storage.progress.save_progress(&ann, &sample_progress()).await.unwrap();

    let mut updated = sample_progress();
    updated.set_attempt(
        "Films",
        LevelNumber::new(2).unwrap(),
        AttemptRecord::from_persisted(1, 4, [0, 1, 3]).unwrap(),
    );
    storage.progress.save_progress(&ann, &updated).await.unwrap();

    let loaded = storage.progress.load_progress(&ann).await.unwrap();
    assert_eq!(loaded, Some(updated));
    assert!(storage.progress.load_progress(&bob).await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = memory_repo("migrate").await;
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn corrupt_row_is_reported_as_serialization_error() {
    let repo = memory_repo("corrupt").await;
    repo.migrate().await.expect("migrate");

    sqlx::query("INSERT INTO user_progress (username, document, updated_at) VALUES (?, ?, ?)")
        .bind("eve")
        .bind("{oops")
        .bind("2024-01-01T00:00:00Z")
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo
        .load_progress(&Username::new("eve").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, storage::StorageError::Serialization(_)));
}
