use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GRID_SIZE: i32 = 26;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(150);
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);
pub const MAX_GRID_SIZE: i32 = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be between 2 and 256, got {0}")]
    GridSize(i32),
    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),
}

/// Settings for one game session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Number of cells along each side of the square grid
    pub grid_size: i32,
    /// Delay between game ticks
    pub tick_interval: Duration,
    /// Delay between repaints
    pub frame_interval: Duration,
    /// Seed for food placement; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: DEFAULT_GRID_SIZE,
            tick_interval: DEFAULT_TICK_INTERVAL,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(grid_size: i32) -> Self {
        GameConfig { grid_size, ..Default::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(2..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("tick"));
        }
        if self.frame_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("frame"));
        }
        Ok(self)
    }
}
