//! Session controller
//!
//! Owns the run/pause/game-over state machine, the single tick timer and the
//! high score. The terminal app feeds it [`Command`]s and timer ticks.

pub mod controller;
pub mod scheduler;

pub use controller::{Command, GameOverReason, Session, SessionState, TickOutcome};
pub use scheduler::{ManualScheduler, Scheduler, TickTimer};
