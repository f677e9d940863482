//! Error taxonomy for a ranking run.
//!
//! None of these are recovered locally: every variant aborts the run before
//! the report is written.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankerError>;

#[derive(Debug, Error)]
pub enum RankerError {
    /// An expected division report is missing or unreadable.
    #[error("division report {} could not be read: {source}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The results tables could not be located, or a cell could not be parsed.
    #[error("malformed results table in division {division}: {reason}")]
    MalformedTable { division: String, reason: String },

    /// A required column is absent from an extracted table.
    #[error("division {division}: {table} table has no `{column}` column")]
    MissingColumn {
        division: String,
        table: &'static str,
        column: String,
    },

    /// An identity seen on one day has no counterpart on the other.
    #[error("quizzer `{quizzer}` competed on {present_on} but has no {missing_on} record")]
    QuizzerNotFound {
        quizzer: String,
        present_on: String,
        missing_on: String,
    },

    /// Two divisions of the same day report the same identity (strict policy only).
    #[error("quizzer `{quizzer}` appears in both {first} and {second} on {day}")]
    DuplicateQuizzer {
        quizzer: String,
        day: String,
        first: String,
        second: String,
    },

    #[error("could not write report to {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl RankerError {
    /// Process exit code for this error kind. `1` is left for failures outside
    /// the taxonomy.
    pub fn exit_code(&self) -> u8 {
        match self {
            RankerError::SourceNotFound { .. } => 2,
            RankerError::MalformedTable { .. } => 3,
            RankerError::MissingColumn { .. } => 4,
            RankerError::QuizzerNotFound { .. } => 5,
            RankerError::DuplicateQuizzer { .. } => 6,
            RankerError::OutputWrite { .. } => 7,
            RankerError::Config { .. } => 8,
        }
    }

    pub(crate) fn malformed(division: &str, reason: impl Into<String>) -> Self {
        RankerError::MalformedTable {
            division: division.to_string(),
            reason: reason.into(),
        }
    }
}
