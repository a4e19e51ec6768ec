use std::time::{Duration, Instant};

use crate::session::SessionState;

/// Play clock and game counter shown in the HUD
pub struct GameMetrics {
    running_since: Option<Instant>,
    accumulated: Duration,
    pub elapsed_time: Duration,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            accumulated: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        let running = self
            .running_since
            .map(|since| since.elapsed())
            .unwrap_or(Duration::ZERO);
        self.elapsed_time = self.accumulated + running;
    }

    /// Follow a session transition. `restarted` marks a fresh game that
    /// began while another was still running.
    pub fn track(&mut self, before: SessionState, after: SessionState, restarted: bool) {
        match (before, after) {
            (_, SessionState::Running) if restarted => self.on_game_start(),
            (SessionState::Idle | SessionState::GameOver, SessionState::Running) => {
                self.on_game_start()
            }
            (SessionState::Running, SessionState::Paused) => self.on_pause(),
            (SessionState::Paused, SessionState::Running) => self.on_resume(),
            (SessionState::Running, SessionState::GameOver) => self.on_game_over(),
            (_, SessionState::Idle) => self.on_reset(),
            _ => {}
        }
        self.update();
    }

    pub fn on_game_start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    pub fn on_pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub fn on_resume(&mut self) {
        self.running_since.get_or_insert_with(Instant::now);
    }

    pub fn on_game_over(&mut self) {
        self.on_pause();
        self.games_played += 1;
    }

    pub fn on_reset(&mut self) {
        self.running_since = None;
        self.accumulated = Duration::ZERO;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
