use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::answers::AnswerRecord;
use crate::normalize::answers_match;
use crate::report::Report;
use crate::shuffle::apply_shuffles;
use crate::spec::{LoadOptions, Question, QuestionType, Quiz};

/// Lifecycle of a session: `Idle -> InProgress -> Submitted -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    InProgress,
    Submitted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::InProgress => "in_progress",
            SessionState::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no quiz is in progress")]
    NotInProgress,
    #[error("question {} does not exist (quiz has {count} questions)", .index + 1)]
    QuestionOutOfRange { index: usize, count: usize },
    #[error("question {} is not a {} question", .index + 1, .expected.as_str())]
    WrongQuestionType {
        index: usize,
        expected: QuestionType,
    },
    #[error(
        "please answer all multiple-choice questions before submitting (unanswered: {})",
        question_numbers(.unanswered)
    )]
    IncompleteAnswers { unanswered: Vec<usize> },
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotInProgress => "not_in_progress",
            SessionError::QuestionOutOfRange { .. } => "question_out_of_range",
            SessionError::WrongQuestionType { .. } => "wrong_question_type",
            SessionError::IncompleteAnswers { .. } => "incomplete_answers",
        }
    }
}

fn question_numbers(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|index| (index + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Immediate grading result handed back while live check is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveFeedback {
    pub is_correct: bool,
    pub selected: String,
    /// Option equal to the correct answer, for highlighting after a miss.
    pub correct_option: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub question_index: usize,
    pub selected: String,
    /// Graded record, exposed only while live check is on.
    pub record: Option<AnswerRecord>,
    pub feedback: Option<LiveFeedback>,
}

/// The single active quiz session.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    quiz: Option<Quiz>,
    current_index: usize,
    answers: Vec<Option<AnswerRecord>>,
    score: usize,
    live_check_enabled: bool,
    report: Option<Report>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (&self.quiz, &self.report) {
            (None, _) => SessionState::Idle,
            (Some(_), None) => SessionState::InProgress,
            (Some(_), Some(_)) => SessionState::Submitted,
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &[Option<AnswerRecord>] {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&AnswerRecord> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn live_check_enabled(&self) -> bool {
        self.live_check_enabled
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn question_count(&self) -> usize {
        self.quiz.as_ref().map_or(0, Quiz::question_count)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz
            .as_ref()
            .and_then(|quiz| quiz.questions.get(self.current_index))
    }

    /// Replaces the session with `quiz`, which must already be validated.
    pub fn load<R: Rng + ?Sized>(&mut self, mut quiz: Quiz, options: LoadOptions, rng: &mut R) {
        self.reset();
        apply_shuffles(&mut quiz, &options, rng);
        debug!(
            title = %quiz.title,
            questions = quiz.question_count(),
            shuffle_questions = options.shuffle_questions,
            shuffle_options = options.shuffle_options,
            live_check = options.live_check,
            "quiz loaded"
        );
        self.answers = vec![None; quiz.question_count()];
        self.live_check_enabled = options.live_check;
        self.quiz = Some(quiz);
    }

    pub fn reset(&mut self) {
        if self.quiz.is_some() {
            debug!("session reset");
        }
        *self = Self::default();
    }

    /// Moves to `index`, clamped into the question range.
    ///
    /// Returns the new index, or `None` when no quiz is in progress.
    pub fn go_to(&mut self, index: isize) -> Option<usize> {
        if self.state() != SessionState::InProgress {
            return None;
        }
        let count = self.question_count();
        if count == 0 {
            return None;
        }
        let clamped = index.clamp(0, count as isize - 1) as usize;
        if clamped != self.current_index {
            debug!(from = self.current_index, to = clamped, "navigate");
        }
        self.current_index = clamped;
        Some(clamped)
    }

    pub fn next(&mut self) -> Option<usize> {
        self.go_to(self.current_index as isize + 1)
    }

    pub fn prev(&mut self) -> Option<usize> {
        self.go_to(self.current_index as isize - 1)
    }

    pub fn can_go_prev(&self) -> bool {
        self.state() == SessionState::InProgress && self.current_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.state() == SessionState::InProgress && self.current_index + 1 < self.question_count()
    }

    pub fn question_counter(&self) -> Option<String> {
        self.quiz.as_ref().map(|quiz| {
            format!(
                "Question {} of {}",
                self.current_index + 1,
                quiz.question_count()
            )
        })
    }

    fn question_in_progress(&self, index: usize) -> Result<&Question, SessionError> {
        if self.state() != SessionState::InProgress {
            return Err(SessionError::NotInProgress);
        }
        let quiz = self.quiz.as_ref().ok_or(SessionError::NotInProgress)?;
        quiz.questions
            .get(index)
            .ok_or(SessionError::QuestionOutOfRange {
                index,
                count: quiz.question_count(),
            })
    }

    fn store(&mut self, index: usize, record: AnswerRecord) -> &AnswerRecord {
        self.answers[index].insert(record)
    }

    /// Grades `selected` against the question and overwrites its record.
    pub fn record_multiple_choice(
        &mut self,
        index: usize,
        selected: &str,
    ) -> Result<&AnswerRecord, SessionError> {
        let question = self.question_in_progress(index)?;
        if !question.is_multiple_choice() {
            return Err(SessionError::WrongQuestionType {
                index,
                expected: QuestionType::MultipleChoice,
            });
        }
        let record = AnswerRecord::selection(question, selected);
        debug!(question = index, is_correct = record.is_correct, "selection recorded");
        Ok(self.store(index, record))
    }

    /// Marks a flashcard as revealed, which always counts as correct.
    pub fn record_fill_in_blank(&mut self, index: usize) -> Result<&AnswerRecord, SessionError> {
        let question = self.question_in_progress(index)?;
        if question.is_multiple_choice() {
            return Err(SessionError::WrongQuestionType {
                index,
                expected: QuestionType::FillInTheBlank,
            });
        }
        let record = AnswerRecord::revealed(question);
        debug!(question = index, "answer revealed");
        Ok(self.store(index, record))
    }

    pub fn record_unanswered(&mut self, index: usize) -> Result<&AnswerRecord, SessionError> {
        let record = AnswerRecord::unanswered(self.question_in_progress(index)?);
        Ok(self.store(index, record))
    }

    /// Handles a selection event, grading immediately when live check is on.
    ///
    /// Without live check the selection is stored but its grade stays hidden
    /// until submission.
    pub fn select_option(
        &mut self,
        index: usize,
        value: &str,
    ) -> Result<SelectionOutcome, SessionError> {
        let record = self.record_multiple_choice(index, value)?.clone();
        if !self.live_check_enabled {
            return Ok(SelectionOutcome {
                question_index: index,
                selected: value.to_string(),
                record: None,
                feedback: None,
            });
        }
        let correct_option = self
            .question_in_progress(index)?
            .options()
            .iter()
            .find(|option| answers_match(option, &record.correct_answer))
            .cloned();
        let feedback = LiveFeedback {
            is_correct: record.is_correct,
            selected: value.to_string(),
            correct_option,
        };
        Ok(SelectionOutcome {
            question_index: index,
            selected: value.to_string(),
            record: Some(record),
            feedback: Some(feedback),
        })
    }

    pub fn reveal(&mut self, index: usize) -> Result<&AnswerRecord, SessionError> {
        self.record_fill_in_blank(index)
    }

    /// Indices of multiple-choice questions without a selection.
    ///
    /// A question counts as answered only when its record carries a
    /// selection, so a record written by `record_unanswered` stays listed.
    pub fn unanswered_multiple_choice(&self) -> Vec<usize> {
        let Some(quiz) = &self.quiz else {
            return Vec::new();
        };
        quiz.questions
            .iter()
            .zip(&self.answers)
            .enumerate()
            .filter(|(_, (question, slot))| {
                question.is_multiple_choice()
                    && slot
                        .as_ref()
                        .and_then(|record| record.user_answer.as_ref())
                        .is_none()
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Grades the session and produces the report.
    ///
    /// Without live check, every multiple-choice question needs a selection;
    /// otherwise the submission is rejected and nothing changes.
    pub fn submit(&mut self) -> Result<&Report, SessionError> {
        if self.state() != SessionState::InProgress {
            return Err(SessionError::NotInProgress);
        }
        if !self.live_check_enabled {
            let unanswered = self.unanswered_multiple_choice();
            if !unanswered.is_empty() {
                warn!(?unanswered, "submission rejected");
                return Err(SessionError::IncompleteAnswers { unanswered });
            }
        }

        let quiz = self.quiz.as_ref().ok_or(SessionError::NotInProgress)?;
        let records = quiz
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(question, slot)| match (question, slot) {
                (Question::MultipleChoice(_), Some(record)) => match &record.user_answer {
                    Some(selected) => AnswerRecord::selection(question, selected),
                    None => AnswerRecord::unanswered(question),
                },
                (Question::FillInTheBlank(_), Some(record)) => record.clone(),
                (_, None) => AnswerRecord::unanswered(question),
            })
            .collect::<Vec<_>>();
        let report = Report::new(&quiz.title, &records);

        self.answers = records.into_iter().map(Some).collect();
        self.score = report.score;
        debug!(
            score = report.score,
            total = report.total_multiple_choice,
            verdict = ?report.verdict,
            "quiz submitted"
        );
        Ok(&*self.report.insert(report))
    }
}
