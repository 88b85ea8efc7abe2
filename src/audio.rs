use std::io::{self, Write};
use std::time::Duration;

use crate::game::GameEvent;

use tracing::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub pitch: &'static str,
    pub volume_db: i8,
    pub delay: Duration,
}

impl Note {
    pub const fn new(pitch: &'static str, volume_db: i8, delay_ms: u64) -> Self {
        Note { pitch, volume_db, delay: Duration::from_millis(delay_ms) }
    }
}

pub const TICK_NOTE: Note = Note::new("A2", -20, 0);
pub const SPAWN_FLOURISH: [Note; 2] = [Note::new("E5", 1, 0), Note::new("A5", 10, 200)];

/// Notes to play in response to a game event.
pub fn cues(event: &GameEvent) -> &'static [Note] {
    match event {
        GameEvent::Stepped => &[TICK_NOTE],
        GameEvent::FoodSpawned { .. } => &SPAWN_FLOURISH,
        _ => &[],
    }
}

pub trait Audio {
    fn play(&mut self, note: &Note) -> io::Result<()>;
}

pub struct Mute;

impl Audio for Mute {
    fn play(&mut self, _note: &Note) -> io::Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell for loud, undelayed notes. Quiet notes are dropped.
pub struct Bell<W: Write> {
    out: W,
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Bell { out }
    }
}

impl<W: Write> Audio for Bell<W> {
    fn play(&mut self, note: &Note) -> io::Result<()> {
        if note.volume_db < 0 || !note.delay.is_zero() {
            return Ok(());
        }
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// Turns game events into sounds. Playback failures never reach the game.
pub struct Soundboard {
    audio: Box<dyn Audio>,
}

impl Soundboard {
    pub fn new(audio: Box<dyn Audio>) -> Self {
        Soundboard { audio }
    }

    pub fn observe(&mut self, event: &GameEvent) {
        for note in cues(event) {
            if let Err(err) = self.audio.play(note) {
                warn!(pitch = note.pitch, %err, "could not play note");
            }
        }
    }
}
