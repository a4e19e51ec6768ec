use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::render::{Renderer, SessionView};
use crate::session::{Command, Session, SessionState, TickOutcome, TickTimer};
use crate::share::{SharePayload, ShareTarget};

pub type BoxedStore = Box<dyn HighScoreStore>;

/// Interactive terminal game
pub struct PlayMode {
    session: Session<TickTimer, BoxedStore>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    share_target: Option<Box<dyn ShareTarget>>,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(
        config: GameConfig,
        store: BoxedStore,
        share_target: Option<Box<dyn ShareTarget>>,
    ) -> Self {
        Self {
            session: Session::new(config, TickTimer::new(), store),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            share_target,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Repaints the clock; state changes redraw immediately
        let mut clock_timer = interval(Duration::from_millis(250));

        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => warn!(error = %err, "terminal event error"),
                        None => self.should_quit = true,
                    }
                    self.draw(terminal)?;
                }

                // Game logic tick, only pending while the session runs
                _ = self.session.scheduler_mut().tick() => {
                    self.update_game();
                    self.draw(terminal)?;
                }

                _ = clock_timer.tick() => {
                    self.metrics.update();
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            games_played = self.metrics.games_played,
            high_score = self.session.high_score(),
            "quitting"
        );

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let view = SessionView::of(&self.session, self.share_target.is_some());
        terminal
            .draw(|frame| {
                self.renderer.render(frame, &view, &self.metrics);
            })
            .context("Failed to draw frame")?;

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self
                .input_handler
                .handle_key_event(key, self.session.state());

            match action {
                KeyAction::Session(command) => self.apply_command(command),
                KeyAction::Share => self.share_score(),
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn apply_command(&mut self, command: Command) {
        let before = self.session.state();
        let accepted = self.session.handle(command);

        if accepted {
            let restarted = command == Command::Restart;
            self.metrics.track(before, self.session.state(), restarted);
        }
    }

    fn update_game(&mut self) {
        let before = self.session.state();
        let outcome = self.session.tick();

        if let TickOutcome::GameOver { .. } = outcome {
            self.metrics.track(before, SessionState::GameOver, false);
        }
    }

    fn share_score(&mut self) {
        let Some(target) = self.share_target.as_mut() else {
            return;
        };

        let payload = SharePayload::for_score(self.session.score());
        match target.share(&payload) {
            Ok(()) => info!(score = self.session.score(), "score shared"),
            Err(err) => warn!(error = %err, "failed to share score"),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
