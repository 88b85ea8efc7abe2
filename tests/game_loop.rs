use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use grid_snake::scheduler::{ManualClock, Scheduler};
use grid_snake::snake::INITIAL_LENGTH;
use grid_snake::{Direction, GameConfig, GameEvent, GameLoop, Phase, TickOutcome, Vector};

fn empty_board(grid_size: i32) -> GameLoop {
    let mut game = GameLoop::new(&GameConfig::new(grid_size).with_seed(11)).unwrap();
    game.set_food(vec![]);
    game.start();
    game
}

#[test]
fn runs_into_the_right_wall() {
    let mut game = empty_board(26);

    for tick in 1..=30 {
        let outcome = game.tick();
        if tick < 26 {
            assert_eq!(outcome, TickOutcome::Advanced { score: 0 });
        } else if tick == 26 {
            assert_eq!(outcome, TickOutcome::Ended { score: 0 });
        } else {
            assert_eq!(outcome, TickOutcome::Idle);
        }
    }

    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(game.snake().head(), Vector::new(26, 0));
    assert!(!game.snake().check_boundary(26));
    assert_eq!(game.status_message(), "Game Over");
    assert_eq!(game.score_message(), "score:0");
}

#[test]
fn u_turn_into_own_body_ends_on_that_tick() {
    let mut game = empty_board(26);
    for _ in 0..5 {
        game.tick();
    }

    game.set_direction(Direction::Down);
    assert_eq!(game.tick(), TickOutcome::Advanced { score: 0 });
    game.set_direction(Direction::Left);
    assert_eq!(game.tick(), TickOutcome::Advanced { score: 0 });
    game.set_direction(Direction::Up);
    assert!(game.is_running());

    assert_eq!(game.tick(), TickOutcome::Ended { score: 0 });
    assert_eq!(game.snake().head(), Vector::new(4, 0));
    assert!(game.snake().hits_itself());
}

#[test]
fn reversal_does_not_kill_the_snake() {
    let mut game = empty_board(26);
    game.tick();
    game.tick();
    game.handle_input("Left");
    assert_eq!(game.snake().velocity(), Vector::new(1, 0));
    assert_eq!(game.tick(), TickOutcome::Advanced { score: 0 });
}

#[test]
fn body_never_outgrows_max_length() {
    let mut game = empty_board(26);
    let turns = [Direction::Down, Direction::Right, Direction::Up, Direction::Right];

    for (i, turn) in turns.iter().cycle().take(60).enumerate() {
        if i % 3 == 0 {
            game.set_direction(*turn);
        }
        if i % 7 == 0 {
            let ahead = game.snake().head() + game.snake().velocity();
            game.set_food(vec![ahead]);
        }
        game.tick();
        assert!(game.snake().body().len() <= game.snake().max_length());
        if !game.is_running() {
            break;
        }
    }
}

#[test]
fn eating_three_then_dying_scores_thirty() {
    let mut game = empty_board(6);
    for x in 1..=3 {
        game.set_food(vec![Vector::new(x, 0)]);
        game.tick();
    }
    assert_eq!(game.snake().max_length(), INITIAL_LENGTH + 3);

    game.set_food(vec![]);
    while game.is_running() {
        game.tick();
    }
    assert_eq!(game.final_score(), Some(30));
    assert_eq!(game.score_message(), "score:30");
}

#[test]
fn input_while_ended_does_not_move_the_snake() {
    let mut game = empty_board(3);
    while game.is_running() {
        game.tick();
    }
    let head = game.snake().head();
    game.set_direction(Direction::Down);
    game.tick();
    assert_eq!(game.snake().head(), head);

    game.start();
    assert_eq!(game.snake().velocity(), Vector::new(1, 0));
}

#[test]
fn scheduled_ticks_drive_the_game() {
    let game = Rc::new(RefCell::new(empty_board(26)));
    let events = Rc::new(RefCell::new(vec![]));
    let mut scheduler = Scheduler::new(ManualClock::new());

    let (ticking, sink) = (game.clone(), events.clone());
    scheduler.schedule_repeating("tick", Duration::from_millis(150), move || {
        let mut game = ticking.borrow_mut();
        game.tick();
        sink.borrow_mut().extend(game.drain_events());
        Ok(())
    });

    scheduler.run_until(Duration::from_millis(150 * 40)).unwrap();

    let game = game.borrow();
    assert_eq!(game.phase(), Phase::Ended);
    let events = events.borrow();
    let steps = events.iter().filter(|e| **e == GameEvent::Stepped).count();
    assert_eq!(steps, 26);
    assert!(events.contains(&GameEvent::GameOver { score: 0 }));
}
