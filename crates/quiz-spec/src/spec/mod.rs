pub mod question;
pub mod quiz;

pub use question::{FillInTheBlankQuestion, MultipleChoiceQuestion, Question, QuestionType};
pub use quiz::{LoadOptions, Quiz};
