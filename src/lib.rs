pub mod app;
pub mod audio;
pub mod config;
pub mod game;
pub mod render;
pub mod scheduler;
pub mod snake;
pub mod term;
pub mod vector;

pub use config::GameConfig;
pub use game::{GameEvent, GameLoop, Phase, Snapshot, TickOutcome};
pub use snake::{Direction, Snake};
pub use vector::Vector;
