mod context;
mod controller;
mod view;

pub use context::SessionContext;
pub use controller::SessionController;
pub use view::{AnswerFeedback, LevelEntry, LevelMenu, LevelView, QuestionView};
