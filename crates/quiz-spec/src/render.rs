use handlebars::{Handlebars, no_escape};
use serde_json::{Value, json};
use thiserror::Error;

use crate::{
    normalize::answers_match,
    report::Report,
    session::{QuizSession, SessionState},
    spec::{Question, QuestionType},
};

const QUESTION_TEMPLATE: &str = "\
{{title}}
{{counter}}{{#if live_check}} [live check]{{/if}}

{{question.number}}. {{question.text}}
{{#each question.options}}
  {{label}}) {{value}}{{#if selected}} *{{/if}}{{#if mark}} [{{mark}}]{{/if}}
{{/each}}
{{#if question.revealed}}
  Answer: {{question.revealed_answer}}
{{/if}}
";

const REPORT_TEMPLATE: &str = "\
Results: {{title}}
{{score_line}}
{{message}}

{{#each entries}}
{{number}}. {{question_text}}
{{#if multiple_choice}}
   Your answer: {{user_answer_text}} {{#if is_correct}}✓{{else}}✗{{/if}}
{{#unless is_correct}}
   Correct answer: {{correct_answer_text}}
{{/unless}}
{{else}}
   Answer: {{correct_answer_text}}
{{/if}}
{{/each}}
";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid template: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("render failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Live-check highlight for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    Incorrect,
}

impl OptionMark {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionMark::Correct => "correct",
            OptionMark::Incorrect => "incorrect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub position: usize,
    pub label: String,
    pub value: String,
    pub selected: bool,
    pub mark: Option<OptionMark>,
}

/// Everything needed to draw the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub number: usize,
    pub kind: QuestionType,
    pub text: String,
    pub options: Vec<OptionView>,
    pub revealed: bool,
    pub revealed_answer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationView {
    pub can_prev: bool,
    pub can_next: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub answered: usize,
    pub total: usize,
}

/// Read-only projection of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub status: SessionState,
    pub title: Option<String>,
    pub counter: Option<String>,
    pub progress: RenderProgress,
    pub live_check: bool,
    pub navigation: NavigationView,
    pub current: Option<QuestionView>,
    pub report: Option<Report>,
}

/// Letter label for the option at `position` (0-based), falling back to digits.
pub fn option_label(position: usize) -> String {
    u8::try_from(position)
        .ok()
        .filter(|position| *position < 26)
        .map(|position| char::from(b'A' + position).to_string())
        .unwrap_or_else(|| (position + 1).to_string())
}

pub fn build_view(session: &QuizSession) -> SessionView {
    let status = session.state();
    let current = if status == SessionState::InProgress {
        session
            .current_question()
            .map(|question| question_view(session, question))
    } else {
        None
    };

    SessionView {
        status,
        title: session.quiz().map(|quiz| quiz.title.clone()),
        counter: session.question_counter(),
        progress: RenderProgress {
            answered: session.answered_count(),
            total: session.question_count(),
        },
        live_check: session.live_check_enabled(),
        navigation: NavigationView {
            can_prev: session.can_go_prev(),
            can_next: session.can_go_next(),
        },
        current,
        report: session.report().cloned(),
    }
}

fn question_view(session: &QuizSession, question: &Question) -> QuestionView {
    let index = session.current_index();
    let record = session.answer(index);
    let selected = record.and_then(|record| record.user_answer.as_deref());
    let missed = session.live_check_enabled() && record.is_some_and(|record| !record.is_correct);

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(position, value)| {
            let is_selected = selected == Some(value.as_str());
            let mark = if !session.live_check_enabled() || record.is_none() {
                None
            } else if answers_match(value, question.correct_answer())
                && (is_selected || missed)
            {
                Some(OptionMark::Correct)
            } else if is_selected {
                Some(OptionMark::Incorrect)
            } else {
                None
            };
            OptionView {
                position: position + 1,
                label: option_label(position),
                value: value.clone(),
                selected: is_selected,
                mark,
            }
        })
        .collect();

    let revealed = record.is_some_and(|record| record.is_revealed());
    QuestionView {
        index,
        number: index + 1,
        kind: question.kind(),
        text: question.text().to_string(),
        options,
        revealed,
        revealed_answer: revealed.then(|| question.correct_answer().to_string()),
    }
}

pub fn report_json(report: &Report) -> Value {
    json!({
        "title": report.title,
        "score": report.score,
        "total_multiple_choice": report.total_multiple_choice,
        "verdict": report.verdict,
        "message": report.verdict.message(),
        "score_line": report.score_line(),
        "entries": report.entries.iter().map(|entry| json!({
            "index": entry.index,
            "number": entry.index + 1,
            "question_text": entry.question_text,
            "user_answer_text": entry.user_answer_text,
            "correct_answer_text": entry.correct_answer_text,
            "is_correct": entry.is_correct,
            "type": entry.kind.as_str(),
            "multiple_choice": entry.kind == QuestionType::MultipleChoice,
        })).collect::<Vec<_>>(),
    })
}

fn question_json(question: &QuestionView) -> Value {
    json!({
        "index": question.index,
        "number": question.number,
        "type": question.kind.as_str(),
        "text": question.text,
        "options": question.options.iter().map(|option| json!({
            "position": option.position,
            "label": option.label,
            "value": option.value,
            "selected": option.selected,
            "mark": option.mark.map(|mark| mark.as_str()),
        })).collect::<Vec<_>>(),
        "revealed": question.revealed,
        "revealed_answer": question.revealed_answer,
    })
}

/// JSON projection consumed by UI front ends.
pub fn render_json_ui(view: &SessionView) -> Value {
    json!({
        "status": view.status.as_str(),
        "title": view.title,
        "counter": view.counter,
        "progress": {
            "answered": view.progress.answered,
            "total": view.progress.total,
        },
        "live_check": view.live_check,
        "navigation": {
            "can_prev": view.navigation.can_prev,
            "can_next": view.navigation.can_next,
        },
        "question": view.current.as_ref().map(question_json),
        "report": view.report.as_ref().map(report_json),
    })
}

/// Plain-text renderer for terminals.
pub struct TextRenderer {
    registry: Handlebars<'static>,
}

impl TextRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_template_string("question", QUESTION_TEMPLATE)?;
        registry.register_template_string("report", REPORT_TEMPLATE)?;
        Ok(Self { registry })
    }

    pub fn render(&self, view: &SessionView) -> Result<String, RenderError> {
        match (&view.current, &view.report) {
            (_, Some(report)) => self.render_report(report),
            (Some(_), None) => self.render_question(view),
            (None, None) => Ok("No quiz loaded.\n".to_string()),
        }
    }

    pub fn render_question(&self, view: &SessionView) -> Result<String, RenderError> {
        let ui = render_json_ui(view);
        Ok(self.registry.render("question", &ui)?)
    }

    pub fn render_report(&self, report: &Report) -> Result<String, RenderError> {
        Ok(self.registry.render("report", &report_json(report))?)
    }
}

pub fn render_text(view: &SessionView) -> Result<String, RenderError> {
    TextRenderer::new()?.render(view)
}
