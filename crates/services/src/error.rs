//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AnswerError, OptionLabel, QuestionError, SessionPhase};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Why a quiz payload could not be turned into a `QuizSet`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WireError {
    #[error("payload is neither a list nor an object with a `{key}` list")]
    NotAList { key: &'static str },
    #[error("payload contains no questions")]
    Empty,
    #[error("question {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: EntryError,
    },
}

/// Why a single question record was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing prompt")]
    MissingPrompt,
    #[error("missing option {0}")]
    MissingOption(OptionLabel),
    #[error("missing answer")]
    MissingAnswer,
    #[error("answer {0:?} matches no option")]
    UnknownAnswer(String),
    #[error(transparent)]
    Invalid(#[from] QuestionError),
}

/// Errors emitted by quiz sources. All of them mean "no data".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
    #[error("quiz request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("quiz body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read quiz file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Errors emitted by camera devices. Never fatal to a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CameraError {
    #[error("no camera available")]
    Unavailable,
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),
}

/// Errors emitted by the session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz data unavailable: {0}")]
    DataUnavailable(#[from] LoaderError),
    #[error("{} question(s) unanswered", .unanswered.len())]
    ValidationFailed { unanswered: Vec<usize> },
    #[error("session is {phase:?}, expected Active")]
    NotActive { phase: SessionPhase },
    #[error("session was restarted")]
    Superseded,
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
