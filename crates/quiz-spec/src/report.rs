use serde::{Deserialize, Serialize};

use crate::answers::AnswerRecord;
use crate::spec::QuestionType;

/// Narrative tier for a submitted quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every multiple-choice answer was correct.
    Perfect,
    /// At least half of the multiple-choice answers were correct.
    Pass,
    Fail,
    /// Flashcard-only quiz; there is nothing to score.
    Completed,
}

impl Verdict {
    pub fn from_score(score: usize, total_multiple_choice: usize) -> Self {
        if total_multiple_choice == 0 {
            Verdict::Completed
        } else if score >= total_multiple_choice {
            Verdict::Perfect
        } else if score * 2 >= total_multiple_choice {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Perfect => "Congratulations! You got all the multiple-choice answers correct!",
            Verdict::Pass => "Good effort! You did well on multiple-choice questions.",
            Verdict::Fail => "Keep practicing! You'll get there.",
            Verdict::Completed => "You have completed the flashcard set!",
        }
    }

    pub fn is_pass(&self) -> bool {
        !matches!(self, Verdict::Fail)
    }
}

/// One line of the per-question breakdown, in presented order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub index: usize,
    pub question_text: String,
    pub user_answer_text: String,
    pub correct_answer_text: String,
    pub is_correct: bool,
    #[serde(rename = "type")]
    pub kind: QuestionType,
}

impl ReportEntry {
    pub fn from_record(index: usize, record: &AnswerRecord) -> Self {
        Self {
            index,
            question_text: record.question.clone(),
            user_answer_text: record.user_answer_text().to_string(),
            correct_answer_text: record.correct_answer.clone(),
            is_correct: record.is_correct,
            kind: record.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub score: usize,
    pub total_multiple_choice: usize,
    pub verdict: Verdict,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(title: &str, records: &[AnswerRecord]) -> Self {
        let total_multiple_choice = records
            .iter()
            .filter(|record| record.kind == QuestionType::MultipleChoice)
            .count();
        let score = records
            .iter()
            .filter(|record| record.kind == QuestionType::MultipleChoice && record.is_correct)
            .count();
        let entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| ReportEntry::from_record(index, record))
            .collect();
        Self {
            title: title.to_string(),
            score,
            total_multiple_choice,
            verdict: Verdict::from_score(score, total_multiple_choice),
            entries,
        }
    }

    pub fn score_line(&self) -> String {
        format!(
            "You scored {} out of {} on multiple-choice questions!",
            self.score, self.total_multiple_choice
        )
    }

    pub fn correctness(&self) -> Vec<bool> {
        self.entries.iter().map(|entry| entry.is_correct).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_score(3, 3), Verdict::Perfect);
        assert_eq!(Verdict::from_score(2, 4), Verdict::Pass);
        assert_eq!(Verdict::from_score(1, 4), Verdict::Fail);
        assert_eq!(Verdict::from_score(0, 0), Verdict::Completed);
        assert_eq!(Verdict::from_score(5, 0), Verdict::Completed);
    }

    #[test]
    fn just_under_half_fails() {
        assert_eq!(Verdict::from_score(2, 5), Verdict::Fail);
        assert_eq!(Verdict::from_score(3, 5), Verdict::Pass);
    }

    #[test]
    fn messages_match_tiers() {
        assert!(Verdict::Perfect.message().starts_with("Congratulations"));
        assert!(Verdict::Fail.message().starts_with("Keep practicing"));
        assert!(Verdict::Completed.is_pass());
        assert!(!Verdict::Fail.is_pass());
    }
}
