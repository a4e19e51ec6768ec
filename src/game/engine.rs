use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::collections::HashSet;

/// Random draws tried before falling back to enumerating free cells
const MAX_REJECTION_SAMPLES: usize = 32;

/// Outcome of a single simulation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Snake moved, length unchanged
    Continue { snake: Snake },
    /// Snake ate the food and grew by one segment.
    ///
    /// `food` is `None` when the grown snake covers every cell.
    Grew {
        snake: Snake,
        score: u32,
        food: Option<Position>,
    },
    /// Move rejected, nothing was committed
    Collided(CollisionType),
}

impl StepResult {
    pub fn collision(&self) -> Option<CollisionType> {
        match self {
            StepResult::Collided(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self { config, rng }
    }

    /// Create an engine with a fixed seed, overriding the configured one
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config.with_seed(Some(seed)))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(self.config.origin());
        let food = self.place_food(&snake);

        GameState::new(snake, food, self.config.grid_size)
    }

    /// Compute one step moving the head in `direction`.
    ///
    /// The state is not modified; callers commit the result with [`GameState::apply`].
    pub fn step(&mut self, state: &GameState, direction: Direction) -> StepResult {
        let new_head = state.snake.head().moved_in_direction(direction);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            return StepResult::Collided(collision_type);
        }

        if state.food != Some(new_head) {
            return StepResult::Continue {
                snake: state.snake.advanced_to(new_head, false),
            };
        }

        let snake = state.snake.advanced_to(new_head, true);
        let food = self.place_food(&snake);

        StepResult::Grew {
            score: state.score + self.config.food_reward,
            snake,
            food,
        }
    }

    /// Check if the new head position causes a collision.
    ///
    /// The whole current body counts, including the tail cell that the move
    /// would vacate.
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell not covered by the snake.
    ///
    /// Returns `None` when the snake covers the whole grid.
    pub fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        let size = self.config.grid_size;
        let total = self.config.cell_count();
        let free = total.saturating_sub(snake.len());

        if free == 0 {
            return None;
        }

        // Sampling only pays off while most of the board is empty
        if free * 2 >= total {
            for _ in 0..MAX_REJECTION_SAMPLES {
                let x = self.rng.gen_range(0..size) as i32;
                let y = self.rng.gen_range(0..size) as i32;
                let pos = Position::new(x, y);

                if !snake.occupies(pos) {
                    return Some(pos);
                }
            }
        }

        let occupied: HashSet<Position> = snake.segments().iter().copied().collect();
        let candidates: Vec<Position> = (0..size as i32)
            .flat_map(|y| (0..size as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !occupied.contains(pos))
            .collect();

        candidates.choose(&mut self.rng).copied()
    }
}
