use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// Fatal errors. Any of these aborts the run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("test runner `{program}` not found: {source}")]
    RunnerNotFound {
        program: String,
        #[source]
        source: which::Error,
    },
    #[error("failed to start `{command}`: {source}")]
    RunnerSpawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to generate coverage profile: `{command}` returned {status}")]
    RunnerFailed { command: String, status: ExitStatus },
    #[error("file not found: {}", .0.display())]
    ProfileNotFound(PathBuf),
    #[error("error reading file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

impl AdvisorError {
    /// Classifies a read failure, keeping "missing file" distinct from the rest.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::ProfileNotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

/// Reasons a single profile line is rejected. Never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("missing `file:range` location")]
    MissingRange,
    #[error("expected 3 fields, found {found}")]
    TokenCount { found: usize },
    #[error("invalid {field} count '{value}'")]
    InvalidCount { field: &'static str, value: String },
    #[error("statement count overflows the file total")]
    CountOverflow,
}
