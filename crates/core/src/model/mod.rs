mod attempt;
mod bank;
mod ids;
mod progress;
mod question;

pub use attempt::{AttemptError, AttemptRecord};
pub use bank::{Category, Level, QuestionBank};
pub use ids::{IdError, LevelNumber, Username};
pub use progress::{CategoryProgress, UserProgress};
pub use question::{QuestionError, QuestionRecord, normalize_answer};
