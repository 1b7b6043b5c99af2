//! Error taxonomy for analysis construction and invocation.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("R script not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("could not extract `{entry}` arguments from {}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        entry: String,
        reason: String,
    },
    #[error("expected inputs {expected:?}, but got {received:?}")]
    Validation {
        expected: Vec<String>,
        received: Vec<String>,
    },
    #[error("unsupported input for `{parameter}`: {found}")]
    Type { parameter: String, found: String },
    #[error("error executing R function: {0}")]
    Runtime(#[from] RuntimeFailure),
}

/// Phase of the R session in which a script-side error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPhase {
    Load,
    Invoke,
}

impl std::fmt::Display for ScriptPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptPhase::Load => write!(f, "loading script"),
            ScriptPhase::Invoke => write!(f, "calling entry function"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeFailure {
    #[error("error reading R script {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start `{program}` (is R installed? set RSCRIPT_PATH): {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to stage R driver program: {0}")]
    Stage(#[source] std::io::Error),
    #[error("R session timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("R error while {phase}: {message}")]
    Script { phase: ScriptPhase, message: String },
    #[error("entry function `{0}` is not defined by the script")]
    MissingEntry(String),
    #[error("entry function must return a named result collection")]
    UnnamedResult,
    #[error("R session exited with status {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },
    #[error("malformed R session output: {0}")]
    Protocol(String),
}

impl AnalysisError {
    /// Short class name used when rendering errors for display.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::NotFound { .. } => "NotFoundError",
            AnalysisError::Parse { .. } => "ParseError",
            AnalysisError::Validation { .. } => "ValidationError",
            AnalysisError::Type { .. } => "TypeError",
            AnalysisError::Runtime(_) => "RuntimeError",
        }
    }
}
