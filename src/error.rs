//! Crate error type

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by level loading and progress persistence
#[derive(Debug, Error)]
pub enum GameError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed level file {path}: {source}")]
    LevelFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no level definitions found in {0}")]
    NoLevels(PathBuf),

    #[error("level {index} is not available ({count} levels loaded)")]
    LevelNotFound { index: usize, count: usize },

    #[error("failed to encode progress record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;
