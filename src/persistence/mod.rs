//! High score persistence
//!
//! The session only ever stores one scalar. Stores are injected so the
//! terminal binary can keep it in a JSON file while tests use memory.

pub mod high_score;

pub use high_score::{HighScoreStore, JsonFileStore, MemoryStore, PersistenceError};
