#![forbid(unsafe_code)]

pub mod catalog;
pub mod document;
pub mod json;
pub mod repository;
pub mod sqlite;

pub use catalog::{CatalogError, CatalogLoad, SkipReason, load_categories};
pub use json::JsonFileRepository;
pub use repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteRepository};
