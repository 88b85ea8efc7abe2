use crate::vector::Vector;
use Direction::*;

use tracing::debug;

pub const INITIAL_LENGTH: usize = 5;
pub const DEFAULT_STEP: i32 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Left,
    Down,
}

impl Direction {
    /// Parses an input symbol. Browser-style `ArrowUp` names are accepted too.
    pub fn from_symbol(symbol: &str) -> Option<Direction> {
        match symbol.strip_prefix("Arrow").unwrap_or(symbol) {
            "Up" => Some(Up),
            "Right" => Some(Right),
            "Left" => Some(Left),
            "Down" => Some(Down),
            _ => None,
        }
    }

    pub fn unit(self) -> Vector {
        match self {
            Up => Vector::new(0, -1),
            Right => Vector::new(1, 0),
            Left => Vector::new(-1, 0),
            Down => Vector::new(0, 1),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Vector>,
    head: Vector,
    velocity: Vector,
    max_length: usize,
    step: i32,
}

impl Snake {
    pub fn new() -> Self {
        Snake::with_step(DEFAULT_STEP)
    }

    pub fn with_step(step: i32) -> Self {
        Snake {
            body: vec![],
            head: Vector::default(),
            velocity: Right.unit() * step,
            max_length: INITIAL_LENGTH,
            step,
        }
    }

    pub fn body(&self) -> &[Vector] {
        &self.body
    }

    pub fn head(&self) -> Vector {
        self.head
    }

    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn advance(&mut self) {
        self.body.push(self.head);
        self.head = self.head + self.velocity;

        if self.body.len() > self.max_length {
            let excess = self.body.len() - self.max_length;
            self.body.drain(0..excess);
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        let target = direction.unit() * self.step;

        if target == -self.velocity {
            debug!(?direction, "reversal rejected");
            return;
        }

        self.velocity = target;
    }

    pub fn check_boundary(&self, grid_size: i32) -> bool {
        let x_in_range = 0 <= self.head.x && self.head.x < grid_size;
        let y_in_range = 0 <= self.head.y && self.head.y < grid_size;
        x_in_range && y_in_range
    }

    pub fn hits_itself(&self) -> bool {
        self.body.contains(&self.head)
    }

    pub fn grow(&mut self) {
        self.max_length += 1;
    }

    pub fn heading(&self) -> Direction {
        match (self.velocity.x.signum(), self.velocity.y.signum()) {
            (0, -1) => Up,
            (-1, 0) => Left,
            (0, 1) => Down,
            _ => Right,
        }
    }

    pub fn head_char(&self) -> char {
        match self.heading() {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

impl Default for Snake {
    fn default() -> Self {
        Snake::new()
    }
}
