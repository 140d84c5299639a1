//! Error types for the on-disk stores.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("score {0} is out of range (expected 0..=10)")]
    InvalidScore(u8),

    #[error("table {0} is not playable (expected 2..=10)")]
    InvalidTable(u8),

    #[error("player name must not be empty")]
    EmptyPlayer,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }

    /// Validation failures: the request was bad, the store is fine.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidScore(_) | StoreError::InvalidTable(_) | StoreError::EmptyPlayer
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
