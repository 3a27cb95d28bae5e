//! Error types shared by the editor, the resolver and the shell.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Rejected edit. The caller decides whether to surface or log it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value for field '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Something the resolver had to skip while rendering a thread.
///
/// These never abort resolution; the affected decoration is omitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveIssue {
    #[error("message {message} points at missing user #{user_index}")]
    DanglingAuthor { message: Uuid, user_index: usize },

    #[error("message {message} quotes unresolvable message #{mention_index}")]
    DanglingMention { message: Uuid, mention_index: usize },

    #[error("message {message} has malformed timestamp {raw:?}")]
    MalformedTimestamp { message: Uuid, raw: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,

    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed file is not a valid conversation: {0}")]
    Json(#[from] serde_json::Error),
}
