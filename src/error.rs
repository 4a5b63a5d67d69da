//! Crate-level error type and `Result` alias.
//! Only failures outside the payload pipeline live here: sink writes and
//! configuration resolution. Malformed JSON payloads are recovered inside the
//! parser and never surface as an `Error`.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("log sink error: {0}")]
    Sink(String),
}

impl Error {
    pub fn sink<E: std::fmt::Display>(e: E) -> Self {
        Error::Sink(e.to_string())
    }
}
