use std::io;
use std::path::PathBuf;

use thiserror::Error;
use word_graph_core::{NotFound, WalkError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no graph loaded; load a text file first")]
    NotLoaded,

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is {size} bytes, exceeds max_file_mb limit of {limit} bytes")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("sentence needs at least two words")]
    SentenceTooShort,

    #[error("word must not be empty")]
    EmptyWord,

    #[error(transparent)]
    Path(#[from] NotFound),

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("cannot start random walk worker: {0}")]
    Spawn(#[source] io::Error),

    #[error("random walk worker panicked")]
    WorkerPanicked,
}

impl SessionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SessionError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
