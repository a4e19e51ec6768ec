//! Core game logic module for Snake
//!
//! This module contains the simulation without any I/O, timing or rendering
//! dependencies. The session controller drives it one step per tick.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use engine::{GameEngine, StepResult};
pub use state::{CollisionType, GameState, Position, Snake};
