use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Supported question kinds, labelled the way quiz documents spell them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    FillInTheBlank,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::FillInTheBlank => "fill_in_the_blank",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "multiple_choice" => Some(QuestionType::MultipleChoice),
            "fill_in_the_blank" => Some(QuestionType::FillInTheBlank),
            _ => None,
        }
    }
}

/// A question graded against a fixed set of options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceQuestion {
    pub question: String,
    pub correct_answer: String,
    pub options: Vec<String>,
}

/// A flashcard whose answer is revealed on demand rather than graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillInTheBlankQuestion {
    pub question: String,
    pub correct_answer: String,
    /// Carried through untouched; flashcards never grade options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    MultipleChoice(MultipleChoiceQuestion),
    FillInTheBlank(FillInTheBlankQuestion),
}

impl Question {
    pub fn kind(&self) -> QuestionType {
        match self {
            Question::MultipleChoice(_) => QuestionType::MultipleChoice,
            Question::FillInTheBlank(_) => QuestionType::FillInTheBlank,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Question::MultipleChoice(question) => &question.question,
            Question::FillInTheBlank(question) => &question.question,
        }
    }

    pub fn correct_answer(&self) -> &str {
        match self {
            Question::MultipleChoice(question) => &question.correct_answer,
            Question::FillInTheBlank(question) => &question.correct_answer,
        }
    }

    /// Options presented to the user; empty for flashcards.
    pub fn options(&self) -> &[String] {
        match self {
            Question::MultipleChoice(question) => &question.options,
            Question::FillInTheBlank(_) => &[],
        }
    }

    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, Question::MultipleChoice(_))
    }
}
