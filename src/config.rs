//! Tuning constants and the per-session configuration built from them.
use crate::grid::Cell;
use crate::snake::Direction;

/// Surface units per grid cell, matching a 20px canvas cell.
pub const DEFAULT_CELL_SIZE: u32 = 20;

pub const INITIAL_SNAKE_LENGTH: usize = 5;
pub const INITIAL_HEAD: Cell = Cell::new(14, 10);
pub const INITIAL_DIRECTION: Direction = Direction::Right;

pub const INITIAL_SPEED_MS: u64 = 100;
pub const SPEED_STEP_MS: u64 = 10;
pub const MIN_SPEED_MS: u64 = 25;
/// The interval shrinks whenever the score lands on a multiple of this.
pub const SPEEDUP_EVERY: u32 = 10;

/// Food value needed to add one body segment.
pub const GROWTH_THRESHOLD: u32 = 5;

pub const DEFAULT_MAX_SPAWN_ATTEMPTS: u32 = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub cell_width: u32,
    pub cell_height: u32,
    pub initial_length: usize,
    pub initial_head: Cell,
    pub initial_direction: Direction,
    pub initial_speed_ms: u64,
    pub speed_step_ms: u64,
    pub min_speed_ms: u64,
    pub speedup_every: u32,
    pub growth_threshold: u32,
    pub max_spawn_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            cell_width: DEFAULT_CELL_SIZE,
            cell_height: DEFAULT_CELL_SIZE,
            initial_length: INITIAL_SNAKE_LENGTH,
            initial_head: INITIAL_HEAD,
            initial_direction: INITIAL_DIRECTION,
            initial_speed_ms: INITIAL_SPEED_MS,
            speed_step_ms: SPEED_STEP_MS,
            min_speed_ms: MIN_SPEED_MS,
            speedup_every: SPEEDUP_EVERY,
            growth_threshold: GROWTH_THRESHOLD,
            max_spawn_attempts: DEFAULT_MAX_SPAWN_ATTEMPTS,
        }
    }
}

impl GameConfig {
    pub fn with_cell_size(mut self, width: u32, height: u32) -> Self {
        self.cell_width = width;
        self.cell_height = height;
        self
    }

    /// Interval after one speed-up step from `speed_ms`.
    pub fn faster(&self, speed_ms: u64) -> u64 {
        speed_ms.saturating_sub(self.speed_step_ms).max(self.min_speed_ms)
    }
}
