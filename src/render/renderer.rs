use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{CollisionType, GameState, Position};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::session::{GameOverReason, Scheduler, Session, SessionState};

/// Everything the renderer reads from a session
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub game: &'a GameState,
    pub state: SessionState,
    pub high_score: u32,
    pub new_record: bool,
    pub game_over_reason: Option<GameOverReason>,
    pub persistence_degraded: bool,
    pub can_share: bool,
}

impl<'a> SessionView<'a> {
    pub fn of<S: Scheduler, P: HighScoreStore>(
        session: &'a Session<S, P>,
        can_share: bool,
    ) -> Self {
        Self {
            game: session.game(),
            state: session.state(),
            high_score: session.high_score(),
            new_record: session.is_new_record(),
            game_over_reason: session.game_over_reason(),
            persistence_degraded: session.is_persistence_degraded(),
            can_share,
        }
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &SessionView, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view, metrics), chunks[0]);

        // Two columns per cell plus the border
        let grid_width = (view.game.grid_size as u16).saturating_mul(2) + 2;
        let grid_height = view.game.grid_size as u16 + 2;
        let game_area = centered(chunks[1], grid_width, grid_height);

        frame.render_widget(self.render_grid(view.game), game_area);

        if let Some(overlay) = self.render_overlay(view) {
            let area = centered(game_area, 34, 8);
            frame.render_widget(Clear, area);
            frame.render_widget(overlay, area);
        }

        frame.render_widget(self.render_controls(view), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let mut lines = Vec::with_capacity(state.grid_size);
        let head = state.snake.head();

        for y in 0..state.grid_size {
            let mut spans = Vec::with_capacity(state.grid_size);

            for x in 0..state.grid_size {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if state.food == Some(pos) {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, view: &SessionView, metrics: &GameMetrics) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.game.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High score: ", Style::default().fg(Color::Yellow)),
            Span::styled(view.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];

        if view.persistence_degraded {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "(high score not saved)",
                Style::default().fg(Color::DarkGray),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_overlay(&self, view: &SessionView) -> Option<Paragraph<'static>> {
        let key = |label: &'static str| {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        };
        let hint = |text: &'static str| Span::styled(text, Style::default().fg(Color::Gray));

        let (title, color, mut lines) = match view.state {
            SessionState::Running => return None,
            SessionState::Idle => (
                "SNAKE",
                Color::Cyan,
                vec![Line::from(vec![
                    hint("Press "),
                    key("Enter"),
                    hint(" or "),
                    key("Space"),
                    hint(" to start"),
                ])],
            ),
            SessionState::Paused => (
                "PAUSED",
                Color::Yellow,
                vec![Line::from(vec![
                    hint("Press "),
                    key("Space"),
                    hint(" to resume"),
                ])],
            ),
            SessionState::GameOver => {
                let headline = match view.game_over_reason {
                    Some(GameOverReason::BoardFilled) => "You filled the board!".to_string(),
                    Some(GameOverReason::Collision(CollisionType::Wall)) => {
                        "You hit the wall".to_string()
                    }
                    Some(GameOverReason::Collision(CollisionType::SelfCollision)) => {
                        "You bit yourself".to_string()
                    }
                    None => String::new(),
                };
                let score = if view.new_record {
                    format!("New record: {}", view.game.score)
                } else {
                    format!("Score: {}", view.game.score)
                };
                let title = if view.game_over_reason.is_some_and(|r| r.is_win()) {
                    "YOU WIN"
                } else {
                    "GAME OVER"
                };

                (
                    title,
                    Color::Red,
                    vec![
                        Line::from(headline),
                        Line::from(Span::styled(
                            score,
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        )),
                        Line::from(vec![
                            hint("Press "),
                            key("Space"),
                            hint(" or "),
                            key("R"),
                            hint(" to restart"),
                        ]),
                    ],
                )
            }
        };

        if view.can_share && view.state == SessionState::GameOver {
            lines.push(Line::from(vec![hint("Press "), key("X"), hint(" to share")]));
        }

        let mut text = vec![Line::from("")];
        text.append(&mut lines);

        Some(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {title} ")),
            ),
        )
    }

    fn render_controls(&self, view: &SessionView) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
        ];

        if view.can_share {
            spans.push(Span::styled("X", Style::default().fg(Color::Green)));
            spans.push(Span::raw(" share | "));
        }

        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rect of at most `width` x `height` centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
