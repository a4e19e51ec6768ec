use serde::{Deserialize, Serialize};

/// Heading of the snake's head on the grid. `Up` decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Heading a session gets when it starts without any input yet
    pub const DEFAULT: Direction = Direction::Right;

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// A turn onto `other` would send the head back into the neck
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// One-cell step as `(dx, dy)`
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}
