use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use wrapsnake::{
    Cell, Direction, FoodItem, FoodSource, FoodTier, GameConfig, GameError, Grid, Phase, Schedule, Session,
    TickEvent,
};

/// Hands out a fixed list of food items, then reports the board as full.
struct Scripted {
    items: VecDeque<FoodItem>,
}

impl Scripted {
    fn new(items: &[(i32, i32, FoodTier)]) -> Self {
        let items = items.iter().map(|&(col, row, tier)| FoodItem::new(Cell::new(col, row), tier)).collect();
        Scripted { items }
    }
}

impl FoodSource for Scripted {
    fn spawn(&mut self, occupied: &HashSet<Cell>, grid: &Grid) -> Result<FoodItem, GameError> {
        let item = self.items.pop_front().ok_or(GameError::SpawnExhausted { attempts: 0 })?;
        assert!(grid.contains(item.position), "scripted food off the grid: {:?}", item);
        assert!(!occupied.contains(&item.position), "scripted food on the snake: {:?}", item);
        Ok(item)
    }
}

fn ten_by_ten(script: Scripted) -> Session<Scripted> {
    Session::new(GameConfig::default(), Grid::new(10, 10).unwrap(), script)
}

#[test]
fn five_unit_foods_grow_the_body_once() {
    use wrapsnake::FoodTier::Low;
    let script = Scripted::new(&[(5, 0, Low), (6, 0, Low), (7, 0, Low), (8, 0, Low), (9, 0, Low), (0, 5, Low)]);
    let mut session = ten_by_ten(script);

    // (10,10)..(14,10) folded onto the 10x10 torus.
    let body: Vec<_> = session.snake().body().iter().copied().collect();
    assert_eq!(body, (0..5).rev().map(|col| Cell::new(col, 0)).collect::<Vec<_>>());

    for expected_score in 1..=5 {
        let tick = session.tick().unwrap();
        match tick.event {
            TickEvent::Ate { score, grew, .. } => {
                assert_eq!(score, expected_score);
                assert_eq!(grew, expected_score == 5);
            }
            other => panic!("expected food on tick {}, got {:?}", expected_score, other),
        }
        assert_eq!(tick.schedule, Schedule::Keep);
    }

    assert_eq!(session.score(), 5);
    assert_eq!(session.snake().len(), 6);
    assert_eq!(session.growth_credit(), 0);
    assert_eq!(session.snake().head(), Cell::new(9, 0));
    assert_eq!(session.food().map(|f| f.position), Some(Cell::new(0, 5)));

    // Off the right edge and back in on the left.
    session.tick().unwrap();
    assert_eq!(session.snake().head(), Cell::new(0, 0));
    assert_eq!(session.phase(), Phase::Running);
}

#[test]
fn pushed_reversal_is_discarded_not_requeued() {
    let mut session = ten_by_ten(Scripted::new(&[(0, 9, FoodTier::Low)]));
    session.push_input(Direction::Left);
    session.push_input(Direction::Down);

    session.tick().unwrap();
    assert_eq!(session.snake().get_direction(), Direction::Right);
    assert_eq!(session.snake().head(), Cell::new(5, 0));

    session.tick().unwrap();
    assert_eq!(session.snake().get_direction(), Direction::Down);
    assert_eq!(session.snake().head(), Cell::new(5, 1));
    assert_eq!(session.pending_input(), 0);
}

#[test]
fn closing_a_loop_onto_the_tail_ends_the_game() {
    use wrapsnake::FoodTier::{High, Low, Mid};
    // Two foods worth 5 together make the snake 6 long, then a tight loop
    // brings the head back onto the cell the tail is leaving.
    let script = Scripted::new(&[(5, 0, Mid), (6, 0, High), (0, 9, Low)]);
    let mut session = ten_by_ten(script);
    session.tick().unwrap();
    session.tick().unwrap();
    assert_eq!(session.snake().len(), 6);

    for dir in [Direction::Down, Direction::Left, Direction::Left].iter() {
        session.push_input(*dir);
        assert_ne!(session.tick().unwrap().event, TickEvent::GameOver { final_score: 5 });
    }

    // Body is now (4,1) (5,1) (6,1) (6,0) (5,0) (4,0); tail is (4,0).
    assert_eq!(session.snake().body().back(), Some(&Cell::new(4, 0)));
    session.push_input(Direction::Up);
    let tick = session.tick().unwrap();
    assert_eq!(tick.event, TickEvent::GameOver { final_score: 5 });
    assert_eq!(tick.schedule, Schedule::Stop);
    assert_eq!(session.phase(), Phase::GameOver);
}

#[test]
fn restart_yields_the_same_opening() {
    let script = Scripted::new(&[
        (5, 0, FoodTier::Epic),
        (6, 0, FoodTier::Epic),
        (9, 9, FoodTier::Low),
        (9, 9, FoodTier::Low),
        (9, 9, FoodTier::Low),
    ]);
    let mut session = ten_by_ten(script);
    let opening: Vec<_> = session.snake().body().iter().copied().collect();

    session.tick().unwrap();
    let tick = session.tick().unwrap();
    assert_eq!(tick.schedule, Schedule::Rearm(Duration::from_millis(90)));
    session.push_input(Direction::Up);
    assert_eq!(session.restart(), Schedule::Rearm(Duration::from_millis(100)));
    let first: Vec<_> = session.snake().body().iter().copied().collect();

    session.push_input(Direction::Down);
    session.tick().unwrap();
    session.restart();
    let second: Vec<_> = session.snake().body().iter().copied().collect();

    assert_eq!(first, opening);
    assert_eq!(second, opening);
    assert_eq!(session.snake().get_direction(), Direction::Right);
    assert_eq!((session.score(), session.speed_ms(), session.growth_credit()), (0, 100, 0));
    assert_eq!(session.pending_input(), 0);
}

#[test]
fn running_out_of_food_is_not_a_game_over() {
    let mut session = ten_by_ten(Scripted::new(&[(5, 0, FoodTier::Low)]));
    let tick = session.tick().unwrap();
    assert_eq!(tick.event, TickEvent::Exhausted { final_score: 1 });
    assert_eq!(tick.schedule, Schedule::Stop);
    assert_eq!(session.phase(), Phase::Exhausted);
    assert_eq!(session.toggle_pause(), Schedule::Keep);
}

#[test]
fn surface_too_small_is_rejected_up_front() {
    let err = Session::from_surface(GameConfig::default(), 19, 19, Scripted::new(&[])).err();
    assert_eq!(err, Some(GameError::InvalidDimension { width: 0, height: 0 }));
}
