use crate::render::Frame;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result, ensure};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type TermInt = u16;

/// Owns the terminal while a game is on screen.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error setting raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error unsetting raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn ensure_fits(&self, frame_width: usize, frame_height: usize) -> Result<()> {
        ensure!(
            frame_width <= self.width as usize && frame_height <= self.height as usize,
            "terminal is {}x{} but the board needs {}x{}",
            self.width, self.height, frame_width, frame_height
        );
        Ok(())
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    /// Prints the cells that differ from what is already on screen.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let width = frame.width().min(self.width as usize);
        let height = frame.height().min(self.height as usize);

        for y in 0..height {
            for x in 0..width {
                let ch = frame.get(x, y);
                let idx = self.width as usize * y + x;
                if self.screen[idx] != ch {
                    let pos = cursor::MoveTo(x as TermInt, y as TermInt);
                    queue!(self.stdout, pos, style::Print(ch))?;
                    self.screen[idx] = ch;
                }
            }
        }

        self.flush()
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }
}
