use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::spec::Quiz;
use crate::validate::{ValidationError, validate};

/// Failure to obtain a usable quiz document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("quiz document {} was not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse quiz document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid quiz: {0}")]
    Invalid(#[from] ValidationError),
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::NotFound(_) => "not_found",
            LoadError::Read { .. } => "read_failed",
            LoadError::Parse(_) => "parse_failed",
            LoadError::Invalid(error) => error.code(),
        }
    }
}

pub fn parse_quiz(json: &str) -> Result<Quiz, LoadError> {
    let doc: Value = serde_json::from_str(json).map_err(LoadError::Parse)?;
    Ok(validate(&doc)?)
}

pub fn read_quiz(path: &Path) -> Result<Quiz, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_quiz(&contents)
}
