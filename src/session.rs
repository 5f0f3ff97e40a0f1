use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::food::{FoodItem, FoodSource, RandomSpawner};
use crate::grid::{Cell, Grid};
use crate::input::InputQueue;
use crate::snake::{Direction, Snake};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
    /// Terminal: the board filled up and no food could be placed.
    Exhausted,
}

/// What the host must do with its tick timer after an engine call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Schedule {
    Keep,
    /// Cancel the armed timer and arm a new one with this period.
    Rearm(Duration),
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// The session was not running, nothing moved.
    Idle,
    Moved { vacated: Option<Cell>, grew: bool },
    /// Food was eaten and the score changed.
    Ate { food: FoodItem, score: u32, grew: bool, vacated: Option<Cell> },
    GameOver { final_score: u32 },
    Exhausted { final_score: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub event: TickEvent,
    pub schedule: Schedule,
}

impl Tick {
    fn new(event: TickEvent, schedule: Schedule) -> Self {
        Tick { event, schedule }
    }
}

/// Read-only view handed to the renderer.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub grid: Grid,
    pub body: &'a VecDeque<Cell>,
    pub direction: Direction,
    pub food: Option<&'a FoodItem>,
    pub score: u32,
    pub speed_ms: u64,
    pub growth_credit: u32,
    pub ticks: u64,
    pub phase: Phase,
}

/// One game: the snake, its food, score and pace, plus the pending input.
///
/// All mutation goes through [`Session::tick`] and the lifecycle entry
/// points; input producers only get [`Session::push_input`].
pub struct Session<S = RandomSpawner<StdRng>> {
    config: GameConfig,
    grid: Grid,
    fault: Option<GameError>,
    snake: Snake,
    food: Option<FoodItem>,
    input: InputQueue,
    source: S,
    score: u32,
    speed_ms: u64,
    growth_credit: u32,
    ticks: u64,
    phase: Phase,
}

impl Session {
    /// A session fed by an OS-seeded random spawner.
    pub fn random(config: GameConfig, grid: Grid) -> Self {
        let spawner = RandomSpawner::new(StdRng::from_entropy()).with_max_attempts(config.max_spawn_attempts);
        Session::new(config, grid, spawner)
    }
}

impl<S: FoodSource> Session<S> {
    /// Creates a running session.
    pub fn new(config: GameConfig, grid: Grid, source: S) -> Self {
        let snake = Snake::new(config.initial_head, config.initial_length, config.initial_direction, &grid);
        let mut session = Session {
            speed_ms: config.initial_speed_ms,
            config,
            grid,
            fault: None,
            snake,
            food: None,
            input: InputQueue::new(),
            source,
            score: 0,
            growth_credit: 0,
            ticks: 0,
            phase: Phase::Running,
        };
        session.restart();
        session
    }

    /// Builds the grid from a drawing surface before creating the session.
    pub fn from_surface(config: GameConfig, surface_w: u32, surface_h: u32, source: S) -> Result<Self, GameError> {
        let grid = Grid::from_surface(surface_w, surface_h, config.cell_width, config.cell_height)?;
        Ok(Session::new(config, grid, source))
    }

    /// Advances the game by one step.
    ///
    /// Fails only while the grid is misconfigured, see [`Session::on_resize`].
    pub fn tick(&mut self) -> Result<Tick, GameError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.phase != Phase::Running {
            return Ok(Tick::new(TickEvent::Idle, Schedule::Keep));
        }

        if let Some(dir) = self.input.drain_one() {
            if !self.snake.set_direction(dir) {
                trace!("dropped reversal to {:?}", dir);
            }
        }

        let new_head = self.snake.next_head(&self.grid);
        if self.snake.would_collide(new_head) {
            self.phase = Phase::GameOver;
            info!("snake ran into itself at {:?}, final score {}", new_head, self.score);
            return Ok(Tick::new(TickEvent::GameOver { final_score: self.score }, Schedule::Stop));
        }

        let eaten = self.food.filter(|food| food.position == new_head);
        let grew = match eaten {
            Some(food) => self.credit(food.value),
            None => false,
        };

        let vacated = self.snake.advance(new_head, grew);
        self.ticks += 1;

        let eaten = match eaten {
            Some(food) => food,
            None => return Ok(Tick::new(TickEvent::Moved { vacated, grew }, Schedule::Keep)),
        };

        let schedule = self.speed_up();

        if let Err(err) = self.respawn_food() {
            warn!("{}", err);
            return Ok(Tick::new(TickEvent::Exhausted { final_score: self.score }, Schedule::Stop));
        }

        let event = TickEvent::Ate { food: eaten, score: self.score, grew, vacated };
        Ok(Tick::new(event, schedule))
    }

    pub fn push_input(&mut self, direction: Direction) {
        self.input.push(direction);
    }

    pub fn pause(&mut self) -> Schedule {
        if self.phase != Phase::Running {
            return Schedule::Keep;
        }
        self.phase = Phase::Paused;
        self.input.clear();
        debug!("paused at tick {}", self.ticks);
        Schedule::Stop
    }

    pub fn resume(&mut self) -> Schedule {
        if self.phase != Phase::Paused {
            return Schedule::Keep;
        }
        self.phase = Phase::Running;
        self.input.clear();
        debug!("resumed at {}ms", self.speed_ms);
        Schedule::Rearm(self.interval())
    }

    pub fn toggle_pause(&mut self) -> Schedule {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::GameOver | Phase::Exhausted => Schedule::Keep,
        }
    }

    /// Puts every piece of state back to its starting value.
    pub fn restart(&mut self) -> Schedule {
        let config = &self.config;
        self.snake = Snake::new(config.initial_head, config.initial_length, config.initial_direction, &self.grid);
        self.score = 0;
        self.growth_credit = 0;
        self.speed_ms = config.initial_speed_ms;
        self.ticks = 0;
        self.input.clear();
        self.food = None;
        self.phase = Phase::Running;

        if let Err(err) = self.respawn_food() {
            warn!("cannot start: {}", err);
            return Schedule::Stop;
        }

        info!("new game on a {}x{} grid", self.grid.width(), self.grid.height());
        if self.fault.is_some() {
            return Schedule::Stop;
        }
        Schedule::Rearm(self.interval())
    }

    /// Recomputes the grid from new surface dimensions. An empty grid leaves
    /// the session refusing to tick until a usable size comes in; that resize
    /// hands back a re-arm when the game is running.
    pub fn on_resize(&mut self, surface_w: u32, surface_h: u32) -> Result<Schedule, GameError> {
        let grid = match Grid::from_surface(surface_w, surface_h, self.config.cell_width, self.config.cell_height) {
            Ok(grid) => grid,
            Err(err) => {
                warn!("resize to {}x{} rejected: {}", surface_w, surface_h, err);
                self.fault = Some(err.clone());
                return Err(err);
            }
        };

        let schedule = match self.fault.take() {
            Some(_) if self.phase == Phase::Running => Schedule::Rearm(self.interval()),
            _ => Schedule::Keep,
        };
        if grid == self.grid {
            return Ok(schedule);
        }
        debug!("grid resized to {}x{}", grid.width(), grid.height());
        self.grid = grid;

        let stranded = self.food.map_or(false, |food| !grid.contains(food.position));
        if stranded && matches!(self.phase, Phase::Running | Phase::Paused) {
            if let Err(err) = self.respawn_food() {
                warn!("{}", err);
                return Ok(Schedule::Stop);
            }
        }
        Ok(schedule)
    }

    /// Replaces the current food. Refused when the cell is off the grid or
    /// under the snake.
    pub fn place_food(&mut self, item: FoodItem) -> bool {
        if !self.grid.contains(item.position) || self.snake.contains(item.position) {
            return false;
        }
        self.food = Some(item);
        true
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: self.grid,
            body: self.snake.body(),
            direction: self.snake.get_direction(),
            food: self.food.as_ref(),
            score: self.score,
            speed_ms: self.speed_ms,
            growth_credit: self.growth_credit,
            ticks: self.ticks,
            phase: self.phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn growth_credit(&self) -> u32 {
        self.growth_credit
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<&FoodItem> {
        self.food.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn fault(&self) -> Option<&GameError> {
        self.fault.as_ref()
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Adds eaten value to score and credit; true when the credit pays for a
    /// new segment.
    fn credit(&mut self, value: u32) -> bool {
        self.score += value;
        self.growth_credit += value;
        if self.growth_credit >= self.config.growth_threshold {
            self.growth_credit -= self.config.growth_threshold;
            return true;
        }
        false
    }

    fn speed_up(&mut self) -> Schedule {
        if self.config.speedup_every == 0 || self.score % self.config.speedup_every != 0 {
            return Schedule::Keep;
        }

        let next = self.config.faster(self.speed_ms);
        if next == self.speed_ms {
            return Schedule::Keep;
        }
        debug!("score {} speeds up: {}ms -> {}ms", self.score, self.speed_ms, next);
        self.speed_ms = next;
        Schedule::Rearm(self.interval())
    }

    fn respawn_food(&mut self) -> Result<(), GameError> {
        let occupied: HashSet<Cell> = self.snake.body().iter().copied().collect();
        match self.source.spawn(&occupied, &self.grid) {
            Ok(item) => {
                self.food = Some(item);
                Ok(())
            }
            Err(err) => {
                self.food = None;
                self.phase = Phase::Exhausted;
                Err(err)
            }
        }
    }
}
