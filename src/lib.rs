//! Snake - a terminal snake game built around an explicit session object
//!
//! This library provides:
//! - Core simulation (game module)
//! - Run/pause/game-over state machine and tick scheduling (session module)
//! - High score persistence (persistence module)
//! - TUI rendering and key mapping (render, input modules)
//! - Optional score sharing (share module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
pub mod session;
pub mod share;
