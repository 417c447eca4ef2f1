use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use quiz_spec::{
    ANSWER_REVEALED, LoadOptions, NOT_APPLICABLE, Question, QuestionType, Quiz, QuizSession,
    SessionError, SessionState, Verdict, answers_match, parse_quiz, validate,
};

fn rng() -> StdRng {
    StdRng::seed_from_u64(2024)
}

fn science_quiz() -> Quiz {
    validate(&json!({
        "title": "Science",
        "questions": [
            { "type": "multiple_choice", "question": "Symbol for gold?",
              "options": ["Ag", "Au", "Gd"], "correctAnswer": "Au" },
            { "type": "multiple_choice", "question": "Plants make food by?",
              "options": ["Respiration", "Photosynthesis"], "correctAnswer": "Photosynthesis" },
            { "type": "multiple_choice", "question": "Largest planet?",
              "options": ["Mars", "Jupiter"], "correctAnswer": "Jupiter" }
        ]
    }))
    .expect("valid quiz")
}

fn flashcard_quiz() -> Quiz {
    validate(&json!({
        "title": "Cards",
        "questions": [
            { "type": "fill_in_the_blank", "question": "2 + 2 = ____", "correctAnswer": "4" }
        ]
    }))
    .expect("valid quiz")
}

fn loaded(quiz: Quiz, live_check: bool) -> QuizSession {
    let mut session = QuizSession::new();
    let options = LoadOptions {
        live_check,
        ..LoadOptions::default()
    };
    session.load(quiz, options, &mut rng());
    session
}

#[test]
fn new_session_is_idle() {
    let session = QuizSession::new();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.quiz().is_none());
    assert!(session.answers().is_empty());
    assert_eq!(session.score(), 0);
    assert!(!session.can_go_prev());
    assert!(!session.can_go_next());
}

#[test]
fn load_initialises_progress() {
    let session = loaded(science_quiz(), true);
    assert_eq!(session.state(), SessionState::InProgress);
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.answers().len(), 3);
    assert!(session.answers().iter().all(Option::is_none));
    assert!(session.live_check_enabled());
    assert_eq!(session.question_counter().as_deref(), Some("Question 1 of 3"));
}

#[test]
fn go_to_clamps_at_both_ends() {
    let mut session = loaded(science_quiz(), false);
    assert_eq!(session.go_to(-5), Some(0));
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.go_to(3 + 5), Some(2));
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.go_to(1), Some(1));
}

#[test]
fn prev_and_next_stop_at_bounds() {
    let mut session = loaded(science_quiz(), false);
    assert!(!session.can_go_prev());
    assert!(session.can_go_next());
    session.prev();
    assert_eq!(session.current_index(), 0);

    session.next();
    session.next();
    assert_eq!(session.current_index(), 2);
    assert!(!session.can_go_next());
    session.next();
    assert_eq!(session.current_index(), 2);
    assert!(session.can_go_prev());
}

#[test]
fn navigation_without_quiz_is_a_no_op() {
    let mut session = QuizSession::new();
    assert_eq!(session.go_to(3), None);
    assert_eq!(session.next(), None);
    assert_eq!(session.current_index(), 0);
}

#[test]
fn rerecording_overwrites_previous_answer() {
    let mut session = loaded(science_quiz(), false);
    session.record_multiple_choice(0, "Ag").expect("record");
    session.record_multiple_choice(0, "Au").expect("record");
    assert_eq!(session.answered_count(), 1);
    let record = session.answer(0).expect("record exists");
    assert_eq!(record.user_answer.as_deref(), Some("Au"));
    assert!(record.is_correct);
}

#[test]
fn recorder_rejects_wrong_type_and_range() {
    let mut session = loaded(science_quiz(), false);
    assert_eq!(
        session.record_fill_in_blank(0).unwrap_err(),
        SessionError::WrongQuestionType {
            index: 0,
            expected: QuestionType::FillInTheBlank
        }
    );
    assert_eq!(
        session.record_multiple_choice(9, "Au").unwrap_err(),
        SessionError::QuestionOutOfRange { index: 9, count: 3 }
    );
    let mut idle = QuizSession::new();
    assert_eq!(
        idle.record_multiple_choice(0, "Au").unwrap_err(),
        SessionError::NotInProgress
    );
}

#[test]
fn live_check_reports_correct_option_after_a_miss() {
    let mut session = loaded(science_quiz(), true);
    let outcome = session.select_option(1, "Respiration").expect("select");
    let feedback = outcome.feedback.expect("live feedback");
    assert!(!feedback.is_correct);
    assert_eq!(feedback.correct_option.as_deref(), Some("Photosynthesis"));
    let record = outcome.record.expect("live record");
    assert!(!record.is_correct);
}

#[test]
fn selections_without_live_check_give_no_feedback() {
    let mut session = loaded(science_quiz(), false);
    let outcome = session.select_option(0, "Au").expect("select");
    assert!(outcome.feedback.is_none());
    assert!(outcome.record.is_none());
    assert_eq!(outcome.selected, "Au");
    assert_eq!(session.answered_count(), 1);
}

#[test]
fn record_unanswered_still_blocks_submission() {
    let mut session = loaded(science_quiz(), false);
    session.select_option(0, "Au").expect("select");
    session.select_option(1, "Photosynthesis").expect("select");
    session.record_unanswered(2).expect("record");
    assert_eq!(session.unanswered_multiple_choice(), vec![2]);
    assert_eq!(
        session.submit().unwrap_err(),
        SessionError::IncompleteAnswers { unanswered: vec![2] }
    );
}

#[test]
fn digit_marked_options_grade_against_bare_answer() {
    let quiz = validate(&json!({
        "title": "Planets",
        "questions": [
            { "type": "multiple_choice", "question": "Closest to the sun?",
              "options": ["1.Mercury", "2.Venus"], "correctAnswer": "Mercury" }
        ]
    }))
    .expect("valid quiz");
    let mut session = loaded(quiz, false);
    let record = session.record_multiple_choice(0, "1.Mercury").expect("record");
    assert!(record.is_correct);
    let report = session.submit().expect("submit");
    assert_eq!(report.score, 1);
}

#[test]
fn submit_without_live_check_requires_every_choice() {
    let mut session = loaded(science_quiz(), false);
    session.select_option(0, "Au").expect("select");
    session.select_option(1, "Respiration").expect("select");

    let error = session.submit().unwrap_err();
    assert_eq!(error, SessionError::IncompleteAnswers { unanswered: vec![2] });
    assert_eq!(error.code(), "incomplete_answers");
    assert!(error.to_string().contains("unanswered: 3"));
    assert_eq!(session.state(), SessionState::InProgress);
    assert!(session.answer(2).is_none());
    assert!(session.report().is_none());
}

#[test]
fn submit_with_live_check_scores_partial_answers() {
    let mut session = loaded(science_quiz(), true);
    session.select_option(0, "Au").expect("select");
    session.select_option(1, "Respiration").expect("select");

    let report = session.submit().expect("submit").clone();
    assert_eq!(report.score, 1);
    assert_eq!(report.total_multiple_choice, 3);
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.correctness(), vec![true, false, false]);
    assert_eq!(report.entries[2].user_answer_text, "Not answered");
    assert_eq!(report.verdict, Verdict::Fail);
    assert_eq!(session.score(), 1);
    assert_eq!(session.state(), SessionState::Submitted);
    assert!(session.answer(2).expect("recorded").user_answer.is_none());
}

#[test]
fn unrevealed_flashcard_is_not_applicable() {
    let mut session = loaded(flashcard_quiz(), false);
    let report = session.submit().expect("submit").clone();
    let record = session.answer(0).expect("record");
    assert_eq!(record.user_answer.as_deref(), Some(NOT_APPLICABLE));
    assert!(!record.is_correct);
    assert_eq!(report.verdict, Verdict::Completed);
    assert_eq!(report.total_multiple_choice, 0);
}

#[test]
fn revealed_flashcard_counts_as_acknowledged() {
    let mut session = loaded(flashcard_quiz(), false);
    session.reveal(0).expect("reveal");
    session.submit().expect("submit");
    let record = session.answer(0).expect("record");
    assert_eq!(record.user_answer.as_deref(), Some(ANSWER_REVEALED));
    assert!(record.is_correct);
}

#[test]
fn submitted_session_is_frozen_until_reset() {
    let mut session = loaded(flashcard_quiz(), false);
    session.submit().expect("submit");
    assert_eq!(session.submit().unwrap_err(), SessionError::NotInProgress);
    assert_eq!(session.reveal(0).unwrap_err(), SessionError::NotInProgress);
    assert_eq!(session.go_to(0), None);
}

#[test]
fn reset_returns_to_initial_state() {
    let mut session = loaded(science_quiz(), true);
    session.next();
    session.select_option(1, "Photosynthesis").expect("select");
    session.submit().expect("submit");
    session.reset();

    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.quiz().is_none());
    assert_eq!(session.current_index(), 0);
    assert!(session.answers().is_empty());
    assert_eq!(session.score(), 0);
    assert!(!session.live_check_enabled());
    assert!(session.report().is_none());
}

#[test]
fn reload_after_submit_starts_fresh() {
    let mut session = loaded(flashcard_quiz(), false);
    session.submit().expect("submit");
    session.load(science_quiz(), LoadOptions::default(), &mut rng());
    assert_eq!(session.state(), SessionState::InProgress);
    assert_eq!(session.answers().len(), 3);
    assert!(session.report().is_none());
}

#[test]
fn shuffling_preserves_questions_and_correct_options() {
    let original = parse_quiz(include_str!("fixtures/gensci.json")).expect("fixture");
    let options = LoadOptions {
        shuffle_questions: true,
        shuffle_options: true,
        live_check: false,
    };
    let mut session = QuizSession::new();
    session.load(original.clone(), options, &mut rng());
    let shuffled = session.quiz().expect("loaded");

    assert_eq!(shuffled.question_count(), original.question_count());
    for question in &original.questions {
        let counterpart = shuffled
            .questions
            .iter()
            .find(|candidate| candidate.text() == question.text())
            .expect("question survives shuffle");
        assert_eq!(counterpart.correct_answer(), question.correct_answer());

        let mut before = question.options().to_vec();
        let mut after = counterpart.options().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after);

        if let Question::MultipleChoice(_) = counterpart {
            assert_eq!(
                counterpart
                    .options()
                    .iter()
                    .filter(|option| answers_match(option, counterpart.correct_answer()))
                    .count(),
                1
            );
        }
    }
}

#[test]
fn scoring_uses_presented_order() {
    let options = LoadOptions {
        shuffle_questions: true,
        shuffle_options: false,
        live_check: true,
    };
    let mut session = QuizSession::new();
    session.load(science_quiz(), options, &mut rng());
    let presented: Vec<String> = session
        .quiz()
        .expect("loaded")
        .questions
        .iter()
        .map(|question| question.text().to_string())
        .collect();
    let report = session.submit().expect("submit");
    let reported: Vec<String> = report
        .entries
        .iter()
        .map(|entry| entry.question_text.clone())
        .collect();
    assert_eq!(presented, reported);
    assert!(report.entries.iter().enumerate().all(|(i, e)| e.index == i));
}
