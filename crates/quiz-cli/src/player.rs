use std::io::{self, BufRead, Write};

use component_quiz::{Command, ComponentError, Direction, QuizComponent};
use quiz_spec::{
    LoadOptions, QuestionType, QuestionView, Quiz, RenderError, TextRenderer, build_view,
};
use serde_json::Value;

pub const HELP: &str = "\
Commands:
  <number> or <letter>   select an option
  r, reveal              reveal a flashcard answer
  n, next / p, prev      move between questions
  g N, goto N            jump to question N
  s, submit              submit the quiz
  q, quit                leave without submitting
Option letters win over single-letter commands; use the full word instead.";

/// Output format for the play loop.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// One line of user input, resolved against the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    Select(String),
    Reveal,
    Next,
    Prev,
    GoTo(isize),
    Submit,
    Quit,
    Help,
    Redraw,
}

/// Why a line of input could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    pub message: String,
}

impl InputError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn parse_input(raw: &str, question: Option<&QuestionView>) -> Result<PlayerInput, InputError> {
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();
    if lowered.is_empty() {
        return Ok(PlayerInput::Redraw);
    }

    let choices = question
        .filter(|question| question.kind == QuestionType::MultipleChoice)
        .map(|question| question.options.as_slice())
        .unwrap_or_default();

    if let Some(option) = choices.iter().find(|option| option.label.to_lowercase() == lowered) {
        return Ok(PlayerInput::Select(option.value.clone()));
    }
    if let Ok(position) = lowered.parse::<usize>() {
        return choices
            .iter()
            .find(|option| option.position == position)
            .map(|option| PlayerInput::Select(option.value.clone()))
            .ok_or_else(|| {
                if choices.is_empty() {
                    InputError::new("this question has no options; use 'reveal' or navigate")
                } else {
                    InputError::new(format!("choose an option between 1 and {}", choices.len()))
                }
            });
    }

    let mut words = lowered.split_whitespace();
    let command = words.next().unwrap_or_default();
    match command {
        "n" | "next" => Ok(PlayerInput::Next),
        "p" | "prev" | "previous" => Ok(PlayerInput::Prev),
        "r" | "reveal" => Ok(PlayerInput::Reveal),
        "s" | "submit" => Ok(PlayerInput::Submit),
        "q" | "quit" | "exit" => Ok(PlayerInput::Quit),
        "h" | "help" | "?" => Ok(PlayerInput::Help),
        "g" | "goto" => {
            let number = words
                .next()
                .and_then(|value| value.parse::<isize>().ok())
                .ok_or_else(|| InputError::new("usage: goto <question number>"))?;
            Ok(PlayerInput::GoTo(number - 1))
        }
        _ => Err(InputError::new(format!("unrecognized input '{}'", trimmed))),
    }
}

/// Prints views, feedback and reports.
pub struct Presenter {
    format: OutputFormat,
    renderer: TextRenderer,
}

impl Presenter {
    pub fn new(format: OutputFormat) -> Result<Self, RenderError> {
        Ok(Self {
            format,
            renderer: TextRenderer::new()?,
        })
    }

    pub fn show_view<W: Write>(&self, component: &QuizComponent, out: &mut W) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let view = build_view(component.session());
                let text = self
                    .renderer
                    .render(&view)
                    .map_err(|err| io::Error::other(err.to_string()))?;
                write!(out, "{}", text)?;
                if let Some(question) = &view.current
                    && question.kind == QuestionType::FillInTheBlank
                    && !question.revealed
                {
                    writeln!(out, "  (type 'r' to reveal the answer)")?;
                }
                Ok(())
            }
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&component.view())?;
                writeln!(out, "{}", pretty)
            }
        }
    }

    pub fn show_feedback<W: Write>(&self, response: &Value, out: &mut W) -> io::Result<()> {
        let feedback = &response["feedback"];
        match feedback["is_correct"].as_bool() {
            Some(true) => writeln!(out, "Correct!"),
            Some(false) => match feedback["correct_option"].as_str() {
                Some(correct) => writeln!(out, "Incorrect. The correct answer is: {}", correct),
                None => writeln!(out, "Incorrect."),
            },
            None => Ok(()),
        }
    }

    pub fn show_report<W: Write>(
        &self,
        component: &QuizComponent,
        response: &Value,
        out: &mut W,
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.show_view(component, out),
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&response["report"])?;
                writeln!(out, "{}", pretty)
            }
        }
    }

    pub fn show_error<W: Write>(&self, error: &ComponentError, out: &mut W) -> io::Result<()> {
        writeln!(out, "Error: {}", error)
    }

    pub fn show_input_error<W: Write>(&self, error: &InputError, out: &mut W) -> io::Result<()> {
        writeln!(out, "Invalid input: {}", error.message)
    }
}

fn prompt<R: BufRead, W: Write>(label: &str, input: &mut R, out: &mut W) -> io::Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn command_for(input: PlayerInput, question: Option<&QuestionView>) -> Option<Command> {
    match input {
        PlayerInput::Select(value) => question.map(|question| Command::SelectOption {
            question_index: question.index,
            value,
        }),
        PlayerInput::Reveal => question.map(|question| Command::Reveal {
            question_index: question.index,
        }),
        PlayerInput::Next => Some(Command::Navigate {
            direction: Direction::Next,
        }),
        PlayerInput::Prev => Some(Command::Navigate {
            direction: Direction::Prev,
        }),
        PlayerInput::GoTo(index) => Some(Command::GoTo { index }),
        PlayerInput::Submit => Some(Command::Submit),
        PlayerInput::Quit | PlayerInput::Help | PlayerInput::Redraw => None,
    }
}

/// Runs the interactive loop until the user quits, declines a retake, or input ends.
pub fn play<R: BufRead, W: Write>(
    component: &mut QuizComponent,
    quiz: &Quiz,
    options: LoadOptions,
    presenter: &Presenter,
    input: &mut R,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    component.load(quiz.clone(), options);
    presenter.show_view(component, out)?;

    loop {
        let Some(line) = prompt("> ", input, out)? else {
            return Ok(());
        };
        let current = build_view(component.session()).current;
        let parsed = match parse_input(&line, current.as_ref()) {
            Ok(parsed) => parsed,
            Err(err) => {
                presenter.show_input_error(&err, out)?;
                continue;
            }
        };

        match parsed {
            PlayerInput::Quit => return Ok(()),
            PlayerInput::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            PlayerInput::Redraw => {
                presenter.show_view(component, out)?;
                continue;
            }
            _ => {}
        }

        let submitting = parsed == PlayerInput::Submit;
        let Some(command) = command_for(parsed, current.as_ref()) else {
            continue;
        };
        let response = match component.handle(command) {
            Ok(response) => response,
            Err(err) => {
                presenter.show_error(&err, out)?;
                continue;
            }
        };

        if !submitting {
            presenter.show_feedback(&response, out)?;
            presenter.show_view(component, out)?;
            continue;
        }

        presenter.show_report(component, &response, out)?;
        let retake = prompt("Retake quiz? [y/N] ", input, out)?
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false);
        if !retake {
            return Ok(());
        }
        component.handle(Command::Reset)?;
        component.load(quiz.clone(), options);
        presenter.show_view(component, out)?;
    }
}
