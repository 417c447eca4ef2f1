use serde::{Deserialize, Serialize};

use crate::normalize::answers_match;
use crate::spec::{Question, QuestionType};

/// User answer stored when a flashcard answer is revealed.
pub const ANSWER_REVEALED: &str = "Answer Revealed";
/// User answer stored for a flashcard that was never revealed.
pub const NOT_APPLICABLE: &str = "Not applicable";
/// Display text for a multiple-choice question left blank.
pub const NOT_ANSWERED: &str = "Not answered";

/// Outcome of one interaction with a question. At most one per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    #[serde(rename = "type")]
    pub kind: QuestionType,
}

impl AnswerRecord {
    pub fn selection(question: &Question, selected: &str) -> Self {
        Self {
            question: question.text().to_string(),
            user_answer: Some(selected.to_string()),
            correct_answer: question.correct_answer().to_string(),
            is_correct: answers_match(selected, question.correct_answer()),
            kind: question.kind(),
        }
    }

    pub fn revealed(question: &Question) -> Self {
        Self {
            question: question.text().to_string(),
            user_answer: Some(ANSWER_REVEALED.to_string()),
            correct_answer: question.correct_answer().to_string(),
            is_correct: true,
            kind: question.kind(),
        }
    }

    pub fn unanswered(question: &Question) -> Self {
        let user_answer = match question {
            Question::MultipleChoice(_) => None,
            Question::FillInTheBlank(_) => Some(NOT_APPLICABLE.to_string()),
        };
        Self {
            question: question.text().to_string(),
            user_answer,
            correct_answer: question.correct_answer().to_string(),
            is_correct: false,
            kind: question.kind(),
        }
    }

    pub fn user_answer_text(&self) -> &str {
        self.user_answer.as_deref().unwrap_or(NOT_ANSWERED)
    }

    pub fn is_revealed(&self) -> bool {
        self.kind == QuestionType::FillInTheBlank
            && self.user_answer.as_deref() == Some(ANSWER_REVEALED)
    }
}
