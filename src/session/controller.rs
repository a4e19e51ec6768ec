use tracing::{debug, info, warn};

use super::scheduler::Scheduler;
use crate::game::{CollisionType, Direction, GameConfig, GameEngine, GameState, StepResult};
use crate::persistence::HighScoreStore;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Input consumed by [`Session::handle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request a new heading for the next tick
    Move(Direction),
    TogglePause,
    Start,
    /// Reset everything and start running immediately
    Restart,
    /// Reset everything and wait in `Idle`
    Reset,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    Collision(CollisionType),
    /// The snake covers the whole grid, nothing left to eat
    BoardFilled,
}

impl GameOverReason {
    pub fn is_win(&self) -> bool {
        matches!(self, GameOverReason::BoardFilled)
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not running
    Skipped,
    Moved,
    Ate { score: u32 },
    GameOver {
        reason: GameOverReason,
        new_record: bool,
    },
}

/// One game session: the simulation plus the state machine deciding when it runs
pub struct Session<S: Scheduler, P: HighScoreStore> {
    engine: GameEngine,
    game: GameState,
    state: SessionState,
    pending_direction: Option<Direction>,
    high_score: u32,
    new_record: bool,
    game_over_reason: Option<GameOverReason>,
    persistence_degraded: bool,
    scheduler: S,
    store: P,
}

impl<S: Scheduler, P: HighScoreStore> Session<S, P> {
    pub fn new(config: GameConfig, scheduler: S, store: P) -> Self {
        Self::with_engine(GameEngine::new(config), scheduler, store)
    }

    /// Build a session around an existing engine, e.g. a seeded one
    pub fn with_engine(mut engine: GameEngine, scheduler: S, store: P) -> Self {
        let game = engine.reset();

        let (high_score, persistence_degraded) = match store.load() {
            Ok(score) => (score, false),
            Err(err) => {
                warn!(error = %err, "high score unavailable, keeping it in memory only");
                (0, true)
            }
        };

        info!(high_score, grid_size = game.grid_size, "session created");

        Self {
            engine,
            game,
            state: SessionState::Idle,
            pending_direction: None,
            high_score,
            new_record: false,
            game_over_reason: None,
            persistence_degraded,
            scheduler,
            store,
        }
    }

    /// Apply a command. Returns false when the command had no effect in the
    /// current state.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Move(direction) => self.request_direction(direction),
            Command::TogglePause => self.toggle_pause(),
            Command::Start => match self.state {
                SessionState::Idle => {
                    self.start();
                    true
                }
                SessionState::GameOver => {
                    self.restart();
                    true
                }
                SessionState::Paused => {
                    self.run();
                    info!("session resumed");
                    true
                }
                SessionState::Running => false,
            },
            Command::Restart => {
                self.restart();
                true
            }
            Command::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Advance the simulation by one step if the session is running
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SessionState::Running {
            return TickOutcome::Skipped;
        }

        // At most one direction change per tick
        if let Some(direction) = self.pending_direction.take() {
            self.game.direction = Some(direction);
        }
        let direction = *self.game.direction.get_or_insert(Direction::DEFAULT);

        match self.engine.step(&self.game, direction) {
            StepResult::Collided(kind) => self.finish(GameOverReason::Collision(kind)),
            result @ StepResult::Grew { food: None, .. } => {
                self.game.apply(result);
                self.finish(GameOverReason::BoardFilled)
            }
            result @ StepResult::Grew { score, .. } => {
                self.game.apply(result);
                debug!(score, length = self.game.snake.len(), "food eaten");
                TickOutcome::Ate { score }
            }
            result @ StepResult::Continue { .. } => {
                self.game.apply(result);
                TickOutcome::Moved
            }
        }
    }

    fn request_direction(&mut self, direction: Direction) -> bool {
        if self.state != SessionState::Running {
            return false;
        }

        if self
            .game
            .direction
            .is_some_and(|current| current.is_opposite(direction))
        {
            debug!(?direction, "reversal ignored");
            return false;
        }

        self.pending_direction = Some(direction);
        true
    }

    fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::Running => {
                self.scheduler.cancel();
                self.state = SessionState::Paused;
                info!(score = self.game.score, "session paused");
                true
            }
            SessionState::Paused => {
                self.run();
                info!("session resumed");
                true
            }
            SessionState::Idle | SessionState::GameOver => false,
        }
    }

    fn start(&mut self) {
        if self.game.direction.is_none() {
            self.game.direction = Some(Direction::DEFAULT);
        }

        self.run();
        info!(high_score = self.high_score, "session started");
    }

    fn run(&mut self) {
        // start() replaces any previous timer
        self.scheduler.start(self.engine.config().tick_interval());
        self.state = SessionState::Running;
    }

    fn reset(&mut self) {
        self.scheduler.cancel();
        self.game = self.engine.reset();
        self.pending_direction = None;
        self.new_record = false;
        self.game_over_reason = None;
        self.state = SessionState::Idle;
    }

    fn restart(&mut self) {
        self.reset();
        self.start();
    }

    fn finish(&mut self, reason: GameOverReason) -> TickOutcome {
        self.scheduler.cancel();
        self.state = SessionState::GameOver;
        self.game_over_reason = Some(reason);
        self.pending_direction = None;

        let score = self.game.score;
        if score > self.high_score {
            self.high_score = score;
            self.new_record = true;

            match self.store.save(score) {
                Ok(()) => self.persistence_degraded = false,
                Err(err) => {
                    warn!(error = %err, score, "failed to persist high score");
                    self.persistence_degraded = true;
                }
            }
        }

        info!(
            ?reason,
            score,
            high_score = self.high_score,
            new_record = self.new_record,
            steps = self.game.steps,
            "game over"
        );

        TickOutcome::GameOver {
            reason,
            new_record: self.new_record,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn score(&self) -> u32 {
        self.game.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Whether the finished game beat the previous high score
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// True when the high score is only kept in memory
    pub fn is_persistence_degraded(&self) -> bool {
        self.persistence_degraded
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn store(&self) -> &P {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Snake};
    use crate::persistence::{MemoryStore, PersistenceError};
    use crate::session::scheduler::ManualScheduler;

    /// Store that refuses every operation
    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&self) -> Result<u32, PersistenceError> {
            Err(PersistenceError::Unavailable)
        }

        fn save(&mut self, _score: u32) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable)
        }
    }

    fn session_with(store: MemoryStore) -> Session<ManualScheduler, MemoryStore> {
        let engine = GameEngine::with_seed(GameConfig::default(), 7);
        Session::with_engine(engine, ManualScheduler::new(), store)
    }

    fn session() -> Session<ManualScheduler, MemoryStore> {
        session_with(MemoryStore::new())
    }

    /// Keep food out of the way of the moves under test
    fn park_food(session: &mut Session<ManualScheduler, MemoryStore>) {
        session.game.food = Some(Position::new(0, 19));
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session_with(MemoryStore::with_value(90));

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.high_score(), 90);
        assert_eq!(session.score(), 0);
        assert_eq!(session.game().direction, None);
        assert!(!session.scheduler().is_active());
        assert!(!session.is_persistence_degraded());
    }

    #[test]
    fn test_start_assigns_default_direction() {
        let mut session = session();
        assert!(session.handle(Command::Start));

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.game().direction, Some(Direction::Right));
        assert!(session.scheduler().is_active());
        assert_eq!(
            session.scheduler().period(),
            Some(std::time::Duration::from_millis(150))
        );
    }

    #[test]
    fn test_ticks_skipped_unless_running() {
        let mut session = session();
        let before = session.game().clone();

        assert_eq!(session.tick(), TickOutcome::Skipped);
        assert_eq!(session.game(), &before);
    }

    #[test]
    fn test_moves_ignored_unless_running() {
        let mut session = session();
        assert!(!session.handle(Command::Move(Direction::Up)));
        assert_eq!(session.pending_direction(), None);

        session.handle(Command::Start);
        session.handle(Command::TogglePause);
        assert!(!session.handle(Command::Move(Direction::Up)));
        assert_eq!(session.pending_direction(), None);
    }

    #[test]
    fn test_last_direction_request_wins() {
        let mut session = session();
        session.handle(Command::Start);
        park_food(&mut session);

        assert!(session.handle(Command::Move(Direction::Down)));
        assert!(session.handle(Command::Move(Direction::Up)));
        assert_eq!(session.pending_direction(), Some(Direction::Up));

        assert_eq!(session.tick(), TickOutcome::Moved);
        assert_eq!(session.game().direction, Some(Direction::Up));
        assert_eq!(session.game().snake.head(), Position::new(10, 9));
        assert_eq!(session.pending_direction(), None);

        // Nothing pending, keep heading
        session.tick();
        assert_eq!(session.game().snake.head(), Position::new(10, 8));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut session = session();
        session.handle(Command::Start);
        park_food(&mut session);
        session.game.snake = Snake::from_segments(vec![
            Position::new(10, 10),
            Position::new(9, 10),
            Position::new(8, 10),
        ])
        .unwrap();

        assert!(!session.handle(Command::Move(Direction::Left)));
        assert_eq!(session.pending_direction(), None);

        // A valid request survives a later reversal attempt
        assert!(session.handle(Command::Move(Direction::Down)));
        assert!(!session.handle(Command::Move(Direction::Left)));
        assert_eq!(session.pending_direction(), Some(Direction::Down));

        session.tick();
        assert_eq!(session.game().direction, Some(Direction::Down));
        assert_eq!(session.game().snake.head(), Position::new(10, 11));
    }

    #[test]
    fn test_pause_and_resume_preserve_state() {
        let mut session = session();
        session.handle(Command::Start);
        park_food(&mut session);
        session.tick();
        let before = session.game().clone();

        assert!(session.handle(Command::TogglePause));
        assert_eq!(session.state(), SessionState::Paused);
        assert!(!session.scheduler().is_active());

        // Ticks delivered while paused do nothing
        assert_eq!(session.tick(), TickOutcome::Skipped);
        assert_eq!(session.game(), &before);

        assert!(session.handle(Command::TogglePause));
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.scheduler().is_active());
        assert_eq!(session.game(), &before);

        session.tick();
        assert_eq!(session.game().steps, before.steps + 1);
        assert_eq!(session.game().snake.head(), Position::new(12, 10));
    }

    #[test]
    fn test_at_most_one_timer() {
        let mut session = session();
        let commands = [
            Command::Start,
            Command::TogglePause,
            Command::TogglePause,
            Command::Restart,
            Command::Start,
            Command::Restart,
            Command::TogglePause,
            Command::Restart,
            Command::Reset,
            Command::Start,
        ];

        for command in commands {
            session.handle(command);
            let scheduler = session.scheduler();
            let live = scheduler.starts - scheduler.cancels;
            assert!(live <= 1, "{live} timers live after {command:?}");
            assert_eq!(
                scheduler.is_active(),
                session.state() == SessionState::Running
            );
        }
    }

    #[test]
    fn test_toggle_pause_outside_play() {
        let mut session = session();
        assert!(!session.handle(Command::TogglePause));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut session = session();
        session.handle(Command::Start);
        session.tick();
        let steps = session.game().steps;

        assert!(!session.handle(Command::Start));
        assert_eq!(session.game().steps, steps);
        assert_eq!(session.scheduler().starts, 1);
    }

    #[test]
    fn test_start_resumes_paused_session() {
        let mut session = session();
        session.handle(Command::Start);
        park_food(&mut session);
        session.tick();
        session.handle(Command::TogglePause);
        let before = session.game().clone();

        assert!(session.handle(Command::Start));

        assert_eq!(session.state(), SessionState::Running);
        assert!(session.scheduler().is_active());
        assert_eq!(session.scheduler().starts - session.scheduler().cancels, 1);
        // resumed in place, not reset
        assert_eq!(session.game(), &before);

        session.tick();
        assert_eq!(session.game().snake.head(), Position::new(12, 10));
    }

    #[test]
    fn test_eating_food_scores_ten() {
        let mut session = session();
        session.game.food = Some(Position::new(11, 10));
        session.handle(Command::Start);

        assert_eq!(session.tick(), TickOutcome::Ate { score: 10 });

        let game = session.game();
        assert_eq!(game.score, 10);
        assert_eq!(game.snake.len(), 2);
        assert_eq!(game.snake.head(), Position::new(11, 10));

        let food = game.food.unwrap();
        assert!(!game.snake.occupies(food));
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_wall_collision_ends_session() {
        let mut session = session_with(MemoryStore::with_value(30));
        session.game.snake = Snake::new(Position::new(0, 5));
        session.game.direction = Some(Direction::Left);
        session.handle(Command::Start);
        assert_eq!(session.game().direction, Some(Direction::Left));

        let outcome = session.tick();

        assert_eq!(
            outcome,
            TickOutcome::GameOver {
                reason: GameOverReason::Collision(CollisionType::Wall),
                new_record: false,
            }
        );
        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.high_score(), 30);
        assert!(!session.scheduler().is_active());
        assert_eq!(session.tick(), TickOutcome::Skipped);
    }

    #[test]
    fn test_self_collision_ends_session() {
        let mut session = session();
        session.handle(Command::Start);
        park_food(&mut session);
        session.game.snake = Snake::from_segments(vec![
            Position::new(5, 5),
            Position::new(5, 6),
            Position::new(6, 6),
            Position::new(6, 5),
            Position::new(6, 4),
        ])
        .unwrap();
        session.game.direction = Some(Direction::Left);
        session.handle(Command::Move(Direction::Down));

        assert_eq!(
            session.tick(),
            TickOutcome::GameOver {
                reason: GameOverReason::Collision(CollisionType::SelfCollision),
                new_record: false,
            }
        );
    }

    #[test]
    fn test_new_record_is_persisted() {
        let mut session = session_with(MemoryStore::with_value(5));
        session.game.food = Some(Position::new(11, 10));
        session.handle(Command::Start);
        session.tick();

        session.game.snake = Snake::new(Position::new(19, 10));
        let outcome = session.tick();

        assert_eq!(
            outcome,
            TickOutcome::GameOver {
                reason: GameOverReason::Collision(CollisionType::Wall),
                new_record: true,
            }
        );
        assert_eq!(session.high_score(), 10);
        assert!(session.is_new_record());
        assert_eq!(session.store().value(), Some(10));
    }

    #[test]
    fn test_filled_board_is_a_win() {
        let engine = GameEngine::with_seed(GameConfig::new(2), 3);
        let mut session = Session::with_engine(engine, ManualScheduler::new(), MemoryStore::new());
        session.handle(Command::Start);
        session.game.snake = Snake::from_segments(vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ])
        .unwrap();
        session.game.food = Some(Position::new(1, 0));

        let outcome = session.tick();

        assert_eq!(
            outcome,
            TickOutcome::GameOver {
                reason: GameOverReason::BoardFilled,
                new_record: true,
            }
        );
        assert!(session.game_over_reason().unwrap().is_win());
        assert_eq!(session.game().snake.len(), 4);
        assert_eq!(session.game().food, None);
        assert_eq!(session.high_score(), 10);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = session();
        session.game.food = Some(Position::new(11, 10));
        session.handle(Command::Start);
        session.tick();
        session.handle(Command::Move(Direction::Up));
        session.tick();
        session.game.snake = Snake::new(Position::new(10, 0));
        session.tick();
        assert_eq!(session.state(), SessionState::GameOver);

        assert!(session.handle(Command::Restart));

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.game().steps, 0);
        assert_eq!(session.game().snake.segments(), &[Position::new(10, 10)]);
        // the old Up heading is gone, the fresh start assigns the default
        assert_eq!(session.game().direction, Some(Direction::Right));
        assert_eq!(session.game_over_reason(), None);
        assert!(!session.is_new_record());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = session();
        session.handle(Command::Start);
        session.handle(Command::Move(Direction::Down));

        assert!(session.handle(Command::Reset));

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.game().direction, None);
        assert_eq!(session.pending_direction(), None);
        assert_eq!(session.game().snake.segments(), &[Position::new(10, 10)]);
        assert!(!session.scheduler().is_active());
    }

    #[test]
    fn test_start_after_game_over_restarts() {
        let mut session = session();
        session.game.snake = Snake::new(Position::new(19, 3));
        session.handle(Command::Start);
        session.tick();
        assert_eq!(session.state(), SessionState::GameOver);

        assert!(session.handle(Command::Start));
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.game().snake.head(), Position::new(10, 10));
    }

    #[test]
    fn test_broken_store_degrades_to_memory() {
        let engine = GameEngine::with_seed(GameConfig::default(), 7);
        let mut session = Session::with_engine(engine, ManualScheduler::new(), BrokenStore);
        assert!(session.is_persistence_degraded());
        assert_eq!(session.high_score(), 0);

        session.game.food = Some(Position::new(11, 10));
        session.handle(Command::Start);
        session.tick();
        session.game.snake = Snake::new(Position::new(19, 10));
        session.tick();

        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.high_score(), 10);
        assert!(session.is_persistence_degraded());

        // Still playable afterwards
        assert!(session.handle(Command::Restart));
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.high_score(), 10);
    }
}
