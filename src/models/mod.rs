mod category;
mod question;
mod settings;

pub use category::{Category, Difficulty};
pub use question::{Question, NUM_OPTIONS};
pub use settings::{QuizSettings, DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT};
