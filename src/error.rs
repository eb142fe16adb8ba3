//! Error type shared by the whole pipeline.
//!
//! Unresolved rule references are not errors (they are logged and skipped);
//! neither is a document with nothing to model. Everything here aborts the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration ({path}): {message}")]
    Config { path: String, message: String },

    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("jq filter failed: {message}")]
    Jq { message: String },

    #[error("input pattern `{pattern}`: {message}")]
    InputPattern { pattern: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
