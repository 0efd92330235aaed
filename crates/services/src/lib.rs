#![forbid(unsafe_code)]

pub mod error;
pub mod progress_store;
pub mod sessions;

pub use error::{ProgressStoreError, SessionError};
pub use progress_store::ProgressStore;
pub use sessions::{
    AnswerFeedback, LevelEntry, LevelMenu, LevelView, QuestionView, SessionContext,
    SessionController,
};
