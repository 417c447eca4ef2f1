#![allow(missing_docs)]

pub mod answers;
pub mod catalog;
pub mod load;
pub mod normalize;
pub mod render;
pub mod report;
pub mod schema;
pub mod session;
pub mod shuffle;
pub mod spec;
pub mod validate;

pub use answers::{ANSWER_REVEALED, AnswerRecord, NOT_ANSWERED, NOT_APPLICABLE};
pub use catalog::{CatalogEntry, CatalogError, DEFAULT_PATTERN, discover};
pub use load::{LoadError, parse_quiz, read_quiz};
pub use normalize::{answers_match, normalize_answer, strip_prefix};
pub use render::{
    NavigationView, OptionMark, OptionView, QuestionView, RenderError, RenderProgress,
    SessionView, TextRenderer, build_view, render_json_ui, render_text, report_json,
};
pub use report::{Report, ReportEntry, Verdict};
pub use schema::quiz_schema;
pub use session::{LiveFeedback, QuizSession, SelectionOutcome, SessionError, SessionState};
pub use shuffle::{apply_shuffles, shuffle};
pub use spec::{
    FillInTheBlankQuestion, LoadOptions, MultipleChoiceQuestion, Question, QuestionType, Quiz,
};
pub use validate::{ValidationError, validate};
