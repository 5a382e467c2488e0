use std::path::PathBuf;

use oui_proto::{MacParseError, ParseError};
use thiserror::Error;

/// Errors raised by the OUI index, its ingestion and its lookups
#[derive(Debug, Error)]
pub enum Error {
    /// No vendor is stored for the prefix. Only produced on request, see
    /// `LookupResult::require_vendor`; lookups themselves report absence as `None`.
    #[error("no vendor found for prefix {0}")]
    NotFound(String),

    /// A vendor-list line that could not be turned into a record
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: &'static str },

    /// The SQLite layer failed; `phase` names the operation that was running
    #[error("storage error during {phase}: {source}")]
    Storage {
        phase: String,
        #[source]
        source: sqlx::Error,
    },

    /// The upstream vendor list could not be obtained
    #[error("vendor list unavailable: {0}")]
    SourceUnavailable(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rejected by strict address validation
    #[error("invalid MAC address: {0}")]
    InvalidAddress(#[from] MacParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn storage(phase: impl Into<String>, source: impl Into<sqlx::Error>) -> Self {
        Self::Storage {
            phase: phase.into(),
            source: source.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert a parser error; read failures are attributed to `path`
    pub(crate) fn from_parse(err: ParseError, path: impl Into<PathBuf>) -> Self {
        match err {
            ParseError::Malformed { line, reason } => Self::MalformedRecord { line, reason },
            ParseError::Io(source) => Self::io(path, source),
        }
    }
}
