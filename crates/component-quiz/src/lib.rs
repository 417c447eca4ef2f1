use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use quiz_spec::{
    LoadError, LoadOptions, Quiz, QuizSession, SessionError, build_view, parse_quiz,
    render_json_ui, report_json, validate,
};

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ComponentError {
    pub fn code(&self) -> &'static str {
        match self {
            ComponentError::Parse { .. } => "invalid_command",
            ComponentError::JsonEncode(_) => "json_encode",
            ComponentError::Load(error) => error.code(),
            ComponentError::Session(error) => error.code(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    #[serde(alias = "previous")]
    Prev,
}

/// Events pushed by the presentation layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Load {
        quiz: Value,
        #[serde(default)]
        options: LoadOptions,
    },
    SelectOption {
        question_index: usize,
        value: String,
    },
    Reveal {
        question_index: usize,
    },
    Navigate {
        direction: Direction,
    },
    GoTo {
        index: isize,
    },
    Submit,
    Reset,
    View,
}

/// Hosts one quiz session and the random source used for shuffling.
pub struct QuizComponent {
    session: QuizSession,
    rng: StdRng,
}

impl Default for QuizComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizComponent {
    pub fn new() -> Self {
        Self {
            session: QuizSession::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic shuffles, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            session: QuizSession::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn view(&self) -> Value {
        render_json_ui(&build_view(&self.session))
    }

    /// Loads an already validated quiz, replacing any current session.
    pub fn load(&mut self, quiz: Quiz, options: LoadOptions) -> Value {
        self.session.load(quiz, options, &mut self.rng);
        json!({ "event": "loaded", "view": self.view() })
    }

    /// Parses and validates `quiz_json`; the session is untouched on failure.
    pub fn load_json(&mut self, quiz_json: &str, options: LoadOptions) -> Result<Value, ComponentError> {
        let quiz = parse_quiz(quiz_json)?;
        Ok(self.load(quiz, options))
    }

    pub fn handle(&mut self, command: Command) -> Result<Value, ComponentError> {
        debug!(?command, "handling command");
        match command {
            Command::Load { quiz, options } => {
                let quiz = validate(&quiz).map_err(LoadError::from)?;
                Ok(self.load(quiz, options))
            }
            Command::SelectOption {
                question_index,
                value,
            } => {
                let outcome = self.session.select_option(question_index, &value)?;
                let record =
                    serde_json::to_value(&outcome.record).map_err(ComponentError::JsonEncode)?;
                let feedback =
                    serde_json::to_value(&outcome.feedback).map_err(ComponentError::JsonEncode)?;
                Ok(json!({
                    "event": "selected",
                    "question_index": outcome.question_index,
                    "selected": outcome.selected,
                    "record": record,
                    "feedback": feedback,
                    "view": self.view(),
                }))
            }
            Command::Reveal { question_index } => {
                let record = self.session.reveal(question_index)?;
                let record = serde_json::to_value(record).map_err(ComponentError::JsonEncode)?;
                Ok(json!({
                    "event": "revealed",
                    "question_index": question_index,
                    "record": record,
                    "view": self.view(),
                }))
            }
            Command::Navigate { direction } => {
                let index = match direction {
                    Direction::Next => self.session.next(),
                    Direction::Prev => self.session.prev(),
                };
                Ok(json!({ "event": "navigated", "index": index, "view": self.view() }))
            }
            Command::GoTo { index } => {
                let index = self.session.go_to(index);
                Ok(json!({ "event": "navigated", "index": index, "view": self.view() }))
            }
            Command::Submit => {
                let report = report_json(self.session.submit()?);
                Ok(json!({ "event": "submitted", "report": report, "view": self.view() }))
            }
            Command::Reset => {
                self.session.reset();
                Ok(json!({ "event": "reset", "view": self.view() }))
            }
            Command::View => Ok(self.view()),
        }
    }

    /// JSON-in, JSON-out entry point. Failures come back as `{"error": ...}`.
    pub fn dispatch(&mut self, command_json: &str) -> String {
        let result = serde_json::from_str::<Command>(command_json)
            .map_err(|source| ComponentError::Parse {
                what: "command",
                source,
            })
            .and_then(|command| self.handle(command));
        respond(result)
    }
}

fn error_response(err: &ComponentError) -> Value {
    let mut body = json!({ "error": err.to_string(), "code": err.code() });
    if let ComponentError::Session(SessionError::IncompleteAnswers { unanswered }) = err {
        body["unanswered"] = json!(unanswered);
    }
    body
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => {
            warn!(code = err.code(), error = %err, "command failed");
            error_response(&err).to_string()
        }
    }
}
