#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod model;

pub use engine::{
    AnswerVerdict, EngineError, LevelProgress, Submission, UNLOCK_THRESHOLD, ensure_attempt_record,
    is_cleared, is_unlocked, retry_set, submit_answer, unlock_frontier,
};
pub use error::Error;
