use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::audio::Soundboard;
use crate::config::GameConfig;
use crate::game::GameLoop;
use crate::render::{Frame, Renderer};
use crate::scheduler::{Clock, Scheduler, StopToken};
use crate::term::TermManager;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

const INPUT_POLL_MS: u64 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Direction(&'static str),
    Start,
    Quit,
    None,
}

pub fn key_action(ev: &KeyEvent) -> KeyAction {
    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => KeyAction::Direction("Up"),
        KeyCode::Char('a') | KeyCode::Left => KeyAction::Direction("Left"),
        KeyCode::Char('s') | KeyCode::Down => KeyAction::Direction("Down"),
        KeyCode::Char('d') | KeyCode::Right => KeyAction::Direction("Right"),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => KeyAction::Start,
        KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

/// Applies a key to the game. Returns false once the player wants out.
pub fn apply_key(game: &mut GameLoop, action: &KeyAction) -> bool {
    match action {
        KeyAction::Direction(symbol) => game.handle_input(symbol),
        KeyAction::Start => game.start(),
        KeyAction::Quit => return false,
        KeyAction::None => {}
    }
    true
}

/// Everything that reacts to game events without feeding back into the game.
pub struct Effects {
    pub renderer: Renderer,
    pub soundboard: Soundboard,
}

impl Effects {
    pub fn new(soundboard: Soundboard) -> Self {
        Effects { renderer: Renderer::new(), soundboard }
    }

    pub fn dispatch(&mut self, game: &mut GameLoop) {
        for event in game.drain_events() {
            self.renderer.observe(&event);
            self.soundboard.observe(&event);
        }
    }
}

pub struct SnakeApp {
    config: GameConfig,
    game: Rc<RefCell<GameLoop>>,
    effects: Rc<RefCell<Effects>>,
    term: Rc<RefCell<TermManager>>,
}

impl SnakeApp {
    pub fn new(config: GameConfig, term: TermManager, soundboard: Soundboard) -> Result<Self> {
        let (w, h) = Frame::dimensions(config.grid_size);
        term.ensure_fits(w, h)?;

        let game = GameLoop::new(&config)?;
        Ok(SnakeApp {
            config,
            game: Rc::new(RefCell::new(game)),
            effects: Rc::new(RefCell::new(Effects::new(soundboard))),
            term: Rc::new(RefCell::new(term)),
        })
    }

    /// Runs input, tick and render loops until the player quits.
    pub fn run<C: Clock>(&mut self, clock: C) -> Result<()> {
        let mut scheduler = Scheduler::new(clock);
        let stop = scheduler.stop_token();
        self.install(&mut scheduler, stop);

        info!(grid_size = self.config.grid_size, "entering game loop");
        scheduler.run()?;
        info!("quit requested");
        Ok(())
    }

    pub fn term(&self) -> Rc<RefCell<TermManager>> {
        self.term.clone()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn install<C: Clock>(&self, scheduler: &mut Scheduler<C>, stop: StopToken) {
        let (game, term) = (self.game.clone(), self.term.clone());
        scheduler.schedule_repeating("input", Duration::from_millis(INPUT_POLL_MS), move || {
            for key_ev in term.borrow().read_key_events_queue()? {
                if !apply_key(&mut game.borrow_mut(), &key_action(&key_ev)) {
                    stop.stop();
                }
            }
            Ok(())
        });

        let (game, effects) = (self.game.clone(), self.effects.clone());
        scheduler.schedule_repeating("tick", self.config.tick_interval, move || {
            let mut game = game.borrow_mut();
            game.tick();
            effects.borrow_mut().dispatch(&mut game);
            Ok(())
        });

        let (game, effects, term) = (self.game.clone(), self.effects.clone(), self.term.clone());
        scheduler.schedule_repeating("render", self.config.frame_interval, move || {
            let mut game = game.borrow_mut();
            let mut effects = effects.borrow_mut();
            effects.dispatch(&mut game);
            let frame = effects.renderer.compose(&game.snapshot());
            term.borrow_mut().draw(&frame)
        });
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
