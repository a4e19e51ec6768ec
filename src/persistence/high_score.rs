//! Storage for the best score across sessions
//!
//! [`JsonFileStore`] keeps the value in a small JSON document so it survives
//! restarts. [`MemoryStore`] keeps it for the lifetime of the process only.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read high score from {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write high score to {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("high score file {path:?} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("high score storage is unavailable")]
    Unavailable,
}

/// Load/save capability for the persisted high score
pub trait HighScoreStore {
    /// Returns the stored value, or 0 if nothing was stored yet
    fn load(&self) -> Result<u32, PersistenceError>;

    fn save(&mut self, score: u32) -> Result<(), PersistenceError>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<u32, PersistenceError> {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<(), PersistenceError> {
        (**self).save(score)
    }
}

/// Session-only store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self { value: Some(value) }
    }

    pub fn value(&self) -> Option<u32> {
        self.value
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        Ok(self.value.unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<(), PersistenceError> {
        self.value = Some(score);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Store backed by a JSON file such as `{"high_score": 120}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let record: HighScoreRecord =
            serde_json::from_str(&json).map_err(|source| PersistenceError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        Ok(record.high_score)
    }

    fn save(&mut self, score: u32) -> Result<(), PersistenceError> {
        let write_error = |source: io::Error| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        // Create parent directories if needed
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })
            .map_err(|source| PersistenceError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        std::fs::write(&self.path, json).map_err(write_error)
    }
}
