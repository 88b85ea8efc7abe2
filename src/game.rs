use crate::config::{ConfigError, GameConfig};
use crate::snake::{Direction, Snake, INITIAL_LENGTH};
use crate::vector::Vector;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

pub const POINTS_PER_FOOD: u32 = 10;
pub const GAME_OVER_TEXT: &str = "Game Over";
pub const MAX_QUEUED_EVENTS: usize = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Ended,
}

/// Something the effects layer may want to react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Stepped,
    FoodEaten { position: Vector },
    FoodSpawned { position: Vector },
    ScoreChanged { score: u32 },
    GameOver { score: u32 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Advanced { score: u32 },
    Ended { score: u32 },
}

/// What a display needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub grid_size: i32,
    pub body: Vec<Vector>,
    pub head: Vector,
    pub heading: Direction,
    pub head_char: char,
    pub food: Vec<Vector>,
    pub phase: Phase,
    pub started: bool,
    pub score: u32,
    pub score_label: String,
    pub status_message: &'static str,
    pub score_message: String,
}

pub fn score_for(max_length: usize) -> u32 {
    (max_length.saturating_sub(INITIAL_LENGTH) as u32) * POINTS_PER_FOOD
}

/// Queued events accumulate until `drain_events` is called; hosts drain
/// them once per tick or frame. Past `MAX_QUEUED_EVENTS` the oldest are dropped.
pub struct GameLoop {
    grid_size: i32,
    snake: Snake,
    food: Vec<Vector>,
    phase: Phase,
    started: bool,
    final_score: Option<u32>,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl GameLoop {
    /// Builds an idle game with one food item already on the grid.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let config = config.clone().validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut game = GameLoop {
            grid_size: config.grid_size,
            snake: Snake::new(),
            food: vec![],
            phase: Phase::Ended,
            started: false,
            final_score: None,
            events: vec![],
            rng,
        };
        game.spawn_food();
        Ok(game)
    }

    pub fn start(&mut self) {
        self.phase = Phase::Running;
        self.started = true;
        self.snake = Snake::new();
        self.final_score = None;
        self.push_event(GameEvent::Started);
        info!(grid_size = self.grid_size, "game started");
    }

    /// No-op unless a game is running.
    pub fn end(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        let score = self.score();
        self.phase = Phase::Ended;
        self.final_score = Some(score);
        self.push_event(GameEvent::GameOver { score });
        info!(score, "game over");
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Idle;
        }

        self.snake.advance();
        self.push_event(GameEvent::Stepped);

        let head = self.snake.head();
        let eaten = self.food.iter().filter(|food| **food == head).count();
        if eaten > 0 {
            self.food.retain(|food| *food != head);
            for _ in 0..eaten {
                self.snake.grow();
                debug!(x = head.x, y = head.y, "food eaten");
                self.push_event(GameEvent::FoodEaten { position: head });
                self.spawn_food();
            }
        }

        if self.snake.hits_itself() || !self.snake.check_boundary(self.grid_size) {
            self.end();
        }

        let score = self.score();
        self.push_event(GameEvent::ScoreChanged { score });

        match self.phase {
            Phase::Running => TickOutcome::Advanced { score },
            Phase::Ended => TickOutcome::Ended { score },
        }
    }

    /// Accepted in any phase; only the next running tick observes it.
    pub fn set_direction(&mut self, direction: Direction) {
        self.snake.set_direction(direction);
    }

    /// Unrecognised symbols are ignored.
    pub fn handle_input(&mut self, symbol: &str) {
        match Direction::from_symbol(symbol) {
            Some(direction) => self.set_direction(direction),
            None => debug!(symbol, "ignoring unknown input"),
        }
    }

    pub fn score(&self) -> u32 {
        score_for(self.snake.max_length())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &[Vector] {
        &self.food
    }

    /// Replaces the food list, e.g. to set up a known board.
    pub fn set_food(&mut self, food: Vec<Vector>) {
        self.food = food;
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn status_message(&self) -> &'static str {
        if self.final_score.is_some() {
            GAME_OVER_TEXT
        } else {
            ""
        }
    }

    pub fn score_message(&self) -> String {
        match self.final_score {
            Some(score) => format!("score:{}", score),
            None => String::new(),
        }
    }

    /// Live readout, updated every running tick.
    pub fn score_label(&self) -> String {
        format!("score:{}", self.score())
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.grid_size,
            body: self.snake.body().to_vec(),
            head: self.snake.head(),
            heading: self.snake.heading(),
            head_char: self.snake.head_char(),
            food: self.food.clone(),
            phase: self.phase,
            started: self.started,
            score: self.score(),
            score_label: self.score_label(),
            status_message: self.status_message(),
            score_message: self.score_message(),
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            let excess = self.events.len() + 1 - MAX_QUEUED_EVENTS;
            self.events.drain(0..excess);
        }
        self.events.push(event);
    }

    fn spawn_food(&mut self) {
        let position = Vector::new(
            self.rng.gen_range(0..self.grid_size),
            self.rng.gen_range(0..self.grid_size),
        );
        debug!(x = position.x, y = position.y, "food spawned");
        self.food.push(position);
        self.push_event(GameEvent::FoodSpawned { position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(grid_size: i32) -> GameLoop {
        GameLoop::new(&GameConfig::new(grid_size).with_seed(7)).unwrap()
    }

    #[test]
    fn new_game_is_idle_with_one_food() {
        let mut game = seeded(26);
        assert_eq!(game.phase(), Phase::Ended);
        assert_eq!(game.food().len(), 1);
        assert_eq!(game.status_message(), "");
        assert_eq!(game.score_message(), "");
        assert_eq!(game.tick(), TickOutcome::Idle);

        let events = game.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::FoodSpawned { .. }]));
    }

    #[test]
    fn food_is_inside_the_grid() {
        let mut game = seeded(3);
        game.start();
        for _ in 0..50 {
            game.spawn_food();
        }
        assert!(game
            .food()
            .iter()
            .all(|f| (0..3).contains(&f.x) && (0..3).contains(&f.y)));
    }

    #[test]
    fn eating_grows_and_replaces_food() {
        let mut game = seeded(26);
        game.start();
        game.set_food(vec![Vector::new(1, 0), Vector::new(20, 20)]);
        game.drain_events();

        assert_eq!(game.tick(), TickOutcome::Advanced { score: 10 });
        assert_eq!(game.snake().max_length(), INITIAL_LENGTH + 1);
        assert_eq!(game.food().len(), 2);
        assert!(game.food().contains(&Vector::new(20, 20)));

        let events = game.drain_events();
        assert_eq!(events[0], GameEvent::Stepped);
        assert_eq!(events[1], GameEvent::FoodEaten { position: Vector::new(1, 0) });
        assert!(matches!(events[2], GameEvent::FoodSpawned { .. }));
        assert_eq!(events[3], GameEvent::ScoreChanged { score: 10 });
    }

    #[test]
    fn stacked_food_counts_each_item() {
        let mut game = seeded(26);
        game.start();
        game.set_food(vec![Vector::new(1, 0), Vector::new(1, 0)]);
        game.tick();
        assert_eq!(game.snake().max_length(), INITIAL_LENGTH + 2);
        assert_eq!(game.food().len(), 2);
        assert_eq!(game.score(), 20);
    }

    #[test]
    fn rejects_an_empty_grid() {
        let err = GameLoop::new(&GameConfig::new(0).with_seed(1)).err();
        assert_eq!(err, Some(ConfigError::GridSize(0)));
        assert!(GameLoop::new(&GameConfig::new(-3)).is_err());
    }

    #[test]
    fn end_only_applies_to_a_running_game() {
        let mut game = seeded(26);
        game.end();
        assert_eq!(game.phase(), Phase::Ended);
        assert_eq!(game.status_message(), "");
        assert_eq!(game.score_message(), "");

        game.start();
        game.end();
        game.end();
        let overs = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn draining_empties_the_queue() {
        let mut game = seeded(26);
        game.set_food(vec![]);
        game.start();
        for _ in 0..10 {
            game.tick();
        }
        assert!(!game.drain_events().is_empty());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn undrained_queue_is_capped() {
        let mut game = seeded(26);
        for _ in 0..(MAX_QUEUED_EVENTS + 50) {
            game.start();
        }
        game.end();
        let events = game.drain_events();
        assert_eq!(events.len(), MAX_QUEUED_EVENTS);
        assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn score_formula() {
        assert_eq!(score_for(5), 0);
        assert_eq!(score_for(8), 30);
    }

    #[test]
    fn end_records_score_and_messages() {
        let mut game = seeded(26);
        game.start();
        for x in 1..=3 {
            game.set_food(vec![Vector::new(x, 0)]);
            game.tick();
        }
        assert_eq!(game.snake().max_length(), 8);
        game.end();
        assert_eq!(game.final_score(), Some(30));
        assert_eq!(game.status_message(), "Game Over");
        assert_eq!(game.score_message(), "score:30");
        assert!(game.drain_events().contains(&GameEvent::GameOver { score: 30 }));
    }

    #[test]
    fn restart_resets_snake_and_messages() {
        let mut game = seeded(4);
        game.set_food(vec![]);
        game.start();
        while game.is_running() {
            game.tick();
        }
        assert_eq!(game.status_message(), "Game Over");

        game.start();
        assert!(game.is_running());
        assert_eq!(game.snake().head(), Vector::new(0, 0));
        assert!(game.snake().body().is_empty());
        assert_eq!(game.status_message(), "");
        assert_eq!(game.score_message(), "");
    }

    #[test]
    fn only_one_game_over_per_tick() {
        let mut game = seeded(2);
        game.set_food(vec![]);
        game.start();
        game.tick();
        game.tick();
        let overs = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert_eq!(game.tick(), TickOutcome::Idle);
    }

    #[test]
    fn unknown_input_is_ignored() {
        let mut game = seeded(26);
        game.start();
        game.handle_input("Sideways");
        game.handle_input("");
        assert_eq!(game.snake().velocity(), Vector::new(1, 0));
        game.handle_input("ArrowDown");
        assert_eq!(game.snake().velocity(), Vector::new(0, 1));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut game = seeded(26);
        game.start();
        game.set_food(vec![Vector::new(9, 9)]);
        game.tick();
        let snap = game.snapshot();
        assert_eq!(snap.grid_size, 26);
        assert_eq!(snap.body, vec![Vector::new(0, 0)]);
        assert_eq!(snap.head, Vector::new(1, 0));
        assert_eq!(snap.head_char, '>');
        assert_eq!(snap.food, vec![Vector::new(9, 9)]);
        assert_eq!(snap.phase, Phase::Running);
        assert!(snap.started);
    }
}
