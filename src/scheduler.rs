use std::cell::Cell;
use std::rc::Rc;
use std::thread::sleep;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::trace;

pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        sleep(duration);
    }
}

/// A clock that only moves when slept on. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Shared flag that ends a scheduler run.
#[derive(Clone, Default)]
pub struct StopToken {
    stopped: Rc<Cell<bool>>,
}

impl StopToken {
    pub fn new() -> Self {
        StopToken::default()
    }

    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

pub type Task = Box<dyn FnMut() -> Result<()>>;

struct Entry {
    name: &'static str,
    interval: Duration,
    next_due: Duration,
    task: Task,
}

/// Runs repeating tasks one at a time on the calling thread.
pub struct Scheduler<C: Clock> {
    clock: C,
    entries: Vec<Entry>,
    stop: StopToken,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Scheduler { clock, entries: vec![], stop: StopToken::new() }
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// The task first runs one interval from now, then again one interval
    /// after each run finishes.
    pub fn schedule_repeating<F>(&mut self, name: &'static str, interval: Duration, task: F)
    where
        F: FnMut() -> Result<()> + 'static,
    {
        let next_due = self.clock.now() + interval;
        self.entries.push(Entry { name, interval, next_due, task: Box::new(task) });
    }

    pub fn run(&mut self) -> Result<()> {
        self.run_while(|_| true)
    }

    /// Runs until stopped or until the clock passes `deadline`.
    pub fn run_until(&mut self, deadline: Duration) -> Result<()> {
        self.run_while(move |due| due <= deadline)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn run_while<P: Fn(Duration) -> bool>(&mut self, keep_going: P) -> Result<()> {
        while !self.stop.is_stopped() {
            let due = match self.entries.iter().map(|e| e.next_due).min() {
                Some(due) => due,
                None => break,
            };
            if !keep_going(due) {
                break;
            }

            let now = self.clock.now();
            if due > now {
                self.clock.sleep(due - now);
            }

            for i in 0..self.entries.len() {
                if self.stop.is_stopped() {
                    break;
                }
                if self.entries[i].next_due > due {
                    continue;
                }

                trace!(task = self.entries[i].name, "running task");
                (self.entries[i].task)()?;

                let after = self.clock.now();
                let entry = &mut self.entries[i];
                entry.next_due = after + entry.interval;
            }
        }

        Ok(())
    }
}
