use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Question;

/// Top-level quiz document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn multiple_choice_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|question| question.is_multiple_choice())
            .count()
    }
}

/// Options applied when a quiz is loaded into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOptions {
    #[serde(default, alias = "shuffle_questions")]
    pub shuffle_questions: bool,
    #[serde(default, alias = "shuffle_options")]
    pub shuffle_options: bool,
    #[serde(default, alias = "live_check")]
    pub live_check: bool,
}
