use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;
use crate::session::{Command, SessionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Session(Command),
    Share,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Translate a key press. Space pauses a game in progress and restarts
    /// one that is not.
    pub fn handle_key_event(&self, key: KeyEvent, state: SessionState) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let in_play = matches!(state, SessionState::Running | SessionState::Paused);

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Session(Command::Move(Direction::Up)),
            KeyCode::Down => KeyAction::Session(Command::Move(Direction::Down)),
            KeyCode::Left => KeyAction::Session(Command::Move(Direction::Left)),
            KeyCode::Right => KeyAction::Session(Command::Move(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::Session(Command::Move(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Session(Command::Move(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Session(Command::Move(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Session(Command::Move(Direction::Right))
            }

            // Controls
            KeyCode::Char(' ') if in_play => KeyAction::Session(Command::TogglePause),
            KeyCode::Char(' ') => KeyAction::Session(Command::Restart),
            KeyCode::Enter => KeyAction::Session(Command::Start),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Session(Command::Restart),
            KeyCode::Char('x') | KeyCode::Char('X') if state == SessionState::GameOver => {
                KeyAction::Share
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
