use std::{fs::File, io::stdout, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::app::SnakeApp;
use grid_snake::audio::{Audio, Bell, Mute, Soundboard};
use grid_snake::config::{GameConfig, DEFAULT_GRID_SIZE};
use grid_snake::scheduler::SystemClock;
use grid_snake::term::TermManager;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a square grid, in your terminal")]
struct Cli {
    /// Cells along each side of the board
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: i32,

    /// Milliseconds between game ticks
    #[arg(long, default_value_t = 150)]
    tick_ms: u64,

    /// Milliseconds between repaints
    #[arg(long, default_value_t = 33)]
    frame_ms: u64,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Disable the terminal bell
    #[arg(long)]
    mute: bool,

    /// Write logs here (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("Error creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let mut config = GameConfig::new(cli.grid_size)
        .with_tick_interval(Duration::from_millis(cli.tick_ms))
        .with_frame_interval(Duration::from_millis(cli.frame_ms));
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let config = config.validate()?;

    let audio: Box<dyn Audio> = if cli.mute {
        Box::new(Mute)
    } else {
        Box::new(Bell::new(stdout()))
    };

    let mut app = SnakeApp::new(config, TermManager::new()?, Soundboard::new(audio))?;
    let term = app.term();

    let setup = term.borrow_mut().setup();
    let res = setup.and_then(|_| app.run(SystemClock::new()));
    term.borrow_mut().restore()?;

    res
}
