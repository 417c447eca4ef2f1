mod player;

use clap::{Parser, Subcommand, ValueEnum};
use component_quiz::QuizComponent;
use player::{OutputFormat, Presenter, play};
use quiz_spec::{DEFAULT_PATTERN, LoadOptions, discover, quiz_schema, read_quiz};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Terminal quiz player",
    long_about = "Plays, validates, and lists quiz documents backed by the quiz component"
)]
struct Cli {
    /// Emit debug logs on stderr (QUIZDECK_LOG overrides the filter).
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

impl From<RenderMode> for OutputFormat {
    fn from(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Text => OutputFormat::Text,
            RenderMode::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Play a quiz one question at a time in a text shell.
    Play {
        /// Path to the quiz JSON document.
        #[arg(long, value_name = "QUIZ")]
        quiz: PathBuf,
        /// Randomize the order of questions.
        #[arg(long)]
        shuffle_questions: bool,
        /// Randomize the order of options within each multiple-choice question.
        #[arg(long)]
        shuffle_options: bool,
        /// Grade each selection immediately instead of only at submission.
        #[arg(long)]
        live_check: bool,
        /// Seed for reproducible shuffles.
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
        /// Output mode for questions and the final report.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Check a quiz document without playing it.
    Validate {
        /// Path to the quiz JSON document.
        #[arg(long, value_name = "QUIZ")]
        quiz: PathBuf,
    },
    /// List quiz documents available in a directory.
    List {
        /// Directory to scan (defaults to QUIZDECK_DIR or the current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// File name pattern for quiz documents.
        #[arg(long, default_value = DEFAULT_PATTERN)]
        pattern: String,
    },
    /// Print the JSON Schema for quiz documents.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Play {
            quiz,
            shuffle_questions,
            shuffle_options,
            live_check,
            seed,
            format,
        } => {
            let options = LoadOptions {
                shuffle_questions,
                shuffle_options,
                live_check,
            };
            run_play(quiz, options, seed, format)
        }
        Command::Validate { quiz } => run_validate(quiz),
        Command::List { dir, pattern } => run_list(dir, &pattern),
        Command::Schema => run_schema(),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("QUIZDECK_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_play(
    quiz_path: PathBuf,
    options: LoadOptions,
    seed: Option<u64>,
    format: RenderMode,
) -> CliResult<()> {
    let quiz = read_quiz(&quiz_path)?;
    debug!(path = %quiz_path.display(), "quiz document read");
    let mut component = match seed {
        Some(seed) => QuizComponent::with_seed(seed),
        None => QuizComponent::new(),
    };
    let presenter = Presenter::new(format.into())?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    play(
        &mut component,
        &quiz,
        options,
        &presenter,
        &mut input,
        &mut out,
    )
}

fn run_validate(quiz_path: PathBuf) -> CliResult<()> {
    match read_quiz(&quiz_path) {
        Ok(quiz) => {
            println!(
                "Quiz is valid: {} ({} questions, {} multiple choice)",
                quiz.title,
                quiz.question_count(),
                quiz.multiple_choice_count()
            );
            Ok(())
        }
        Err(err) => {
            println!("Quiz is invalid: {}", err);
            Err("validation failed".into())
        }
    }
}

fn resolve_quiz_dir(dir: Option<PathBuf>) -> CliResult<PathBuf> {
    let candidate = match dir {
        Some(path) => path,
        None => env::var_os("QUIZDECK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    if candidate.as_os_str().is_empty() {
        return Err("quiz directory cannot be empty".into());
    }
    Ok(candidate)
}

fn run_list(dir: Option<PathBuf>, pattern: &str) -> CliResult<()> {
    let dir = resolve_quiz_dir(dir)?;
    let entries = discover(&dir, pattern)?;
    if entries.is_empty() {
        println!("No quizzes found in {}", dir.display());
        return Ok(());
    }
    for entry in entries {
        println!("{}\t{}", entry.label, entry.path.display());
    }
    Ok(())
}

fn run_schema() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&quiz_schema())?);
    Ok(())
}
