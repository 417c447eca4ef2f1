use serde_json::{Map, Value};
use thiserror::Error;

use crate::normalize::normalize_answer;
use crate::spec::{
    FillInTheBlankQuestion, MultipleChoiceQuestion, Question, QuestionType, Quiz,
};

/// Reasons a quiz document is rejected. Question numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("quiz data must be an object")]
    NotAnObject,
    #[error("quiz must have a non-empty 'title' string")]
    MissingTitle,
    #[error("quiz must have a non-empty 'questions' array")]
    MissingQuestions,
    #[error(
        "invalid type at question {number}: must be 'multiple_choice' or 'fill_in_the_blank'"
    )]
    InvalidType { number: usize },
    #[error("question {number} is missing 'question' text")]
    MissingQuestionText { number: usize },
    #[error("question {number} is missing 'correctAnswer'")]
    MissingCorrectAnswer { number: usize },
    #[error("multiple-choice question {number} must have at least two 'options'")]
    TooFewOptions { number: usize },
    #[error("multiple-choice question {number}: option {option} is not a string")]
    OptionNotString { number: usize, option: usize },
    #[error("answer not in options at question {number}: 'correctAnswer' must be one of the 'options'")]
    AnswerNotInOptions { number: usize },
    #[error("fill-in-the-blank question {number}: 'options', if present, must be an array")]
    OptionsNotArray { number: usize },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NotAnObject => "not_an_object",
            ValidationError::MissingTitle => "missing_title",
            ValidationError::MissingQuestions => "missing_questions",
            ValidationError::InvalidType { .. } => "invalid_type",
            ValidationError::MissingQuestionText { .. } => "missing_question_text",
            ValidationError::MissingCorrectAnswer { .. } => "missing_correct_answer",
            ValidationError::TooFewOptions { .. } => "too_few_options",
            ValidationError::OptionNotString { .. } => "option_not_string",
            ValidationError::AnswerNotInOptions { .. } => "answer_not_in_options",
            ValidationError::OptionsNotArray { .. } => "options_not_array",
        }
    }

    pub fn question_number(&self) -> Option<usize> {
        match self {
            ValidationError::NotAnObject
            | ValidationError::MissingTitle
            | ValidationError::MissingQuestions => None,
            ValidationError::InvalidType { number }
            | ValidationError::MissingQuestionText { number }
            | ValidationError::MissingCorrectAnswer { number }
            | ValidationError::TooFewOptions { number }
            | ValidationError::OptionNotString { number, .. }
            | ValidationError::AnswerNotInOptions { number }
            | ValidationError::OptionsNotArray { number } => Some(*number),
        }
    }
}

/// Checks an untrusted quiz document and returns the typed quiz.
///
/// Rules are applied in document order and the first failure wins.
pub fn validate(doc: &Value) -> Result<Quiz, ValidationError> {
    let object = doc.as_object().ok_or(ValidationError::NotAnObject)?;

    let title = non_empty_str(object, "title").ok_or(ValidationError::MissingTitle)?;

    let raw_questions = object
        .get("questions")
        .and_then(Value::as_array)
        .filter(|questions| !questions.is_empty())
        .ok_or(ValidationError::MissingQuestions)?;

    let questions = raw_questions
        .iter()
        .enumerate()
        .map(|(index, raw)| validate_question(index + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Quiz {
        title: title.to_string(),
        questions,
    })
}

fn validate_question(number: usize, raw: &Value) -> Result<Question, ValidationError> {
    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);

    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .and_then(QuestionType::from_label)
        .ok_or(ValidationError::InvalidType { number })?;
    let question = non_empty_str(object, "question")
        .ok_or(ValidationError::MissingQuestionText { number })?
        .to_string();
    let correct_answer = non_empty_str(object, "correctAnswer")
        .ok_or(ValidationError::MissingCorrectAnswer { number })?
        .to_string();

    match kind {
        QuestionType::MultipleChoice => {
            let raw_options = object
                .get("options")
                .and_then(Value::as_array)
                .filter(|options| options.len() >= 2)
                .ok_or(ValidationError::TooFewOptions { number })?;
            let options = raw_options
                .iter()
                .enumerate()
                .map(|(position, option)| {
                    option
                        .as_str()
                        .map(String::from)
                        .ok_or(ValidationError::OptionNotString {
                            number,
                            option: position + 1,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let expected = normalize_answer(&correct_answer);
            if !options
                .iter()
                .any(|option| normalize_answer(option) == expected)
            {
                return Err(ValidationError::AnswerNotInOptions { number });
            }

            Ok(Question::MultipleChoice(MultipleChoiceQuestion {
                question,
                correct_answer,
                options,
            }))
        }
        QuestionType::FillInTheBlank => {
            let options = match object.get("options") {
                None => None,
                Some(Value::Array(values)) => Some(values.clone()),
                Some(_) => return Err(ValidationError::OptionsNotArray { number }),
            };
            Ok(Question::FillInTheBlank(FillInTheBlankQuestion {
                question,
                correct_answer,
                options,
            }))
        }
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}
