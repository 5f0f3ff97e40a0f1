use std::collections::HashSet;

use log::{debug, warn};
use rand::seq::IteratorRandom;
use rand::Rng;

use crate::config::DEFAULT_MAX_SPAWN_ATTEMPTS;
use crate::error::GameError;
use crate::grid::{Cell, Grid};

/// Food rarity. The value of an item is fixed by its tier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FoodTier {
    Low,
    Mid,
    High,
    Rare,
    Epic,
}

/// Upper bounds of the cumulative probability bands, in tier order.
const TIER_BANDS: [(f64, FoodTier); 5] = [
    (0.60, FoodTier::Low),
    (0.85, FoodTier::Mid),
    (0.95, FoodTier::High),
    (0.99, FoodTier::Rare),
    (1.00, FoodTier::Epic),
];

/// Colors a pulsing item cycles through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PulseColor {
    Purple,
    Blue,
    Cyan,
    Magenta,
}

const PULSE_PALETTE: [PulseColor; 4] = [PulseColor::Purple, PulseColor::Blue, PulseColor::Cyan, PulseColor::Magenta];

/// Ticks spent on each pulse color.
pub const PULSE_TICKS: u64 = 5;

/// Pulse color for a given tick counter. Purely cosmetic, the engine never
/// stores it.
pub fn pulse_palette(tick: u64) -> PulseColor {
    PULSE_PALETTE[((tick / PULSE_TICKS) % PULSE_PALETTE.len() as u64) as usize]
}

impl FoodTier {
    /// Maps a roll in `[0, 1)` onto a tier. Out of range rolls are clamped.
    pub fn from_roll(roll: f64) -> FoodTier {
        TIER_BANDS
            .iter()
            .find(|(upper, _)| roll < *upper)
            .map(|(_, tier)| *tier)
            .unwrap_or(FoodTier::Epic)
    }

    pub fn value(self) -> u32 {
        match self {
            FoodTier::Low => 1,
            FoodTier::Mid => 2,
            FoodTier::High => 3,
            FoodTier::Rare => 4,
            FoodTier::Epic => 5,
        }
    }

    pub fn is_pulsing(self) -> bool {
        matches!(self, FoodTier::Rare | FoodTier::Epic)
    }

    /// Drawn radius as a fraction of the cell side.
    pub fn radius_fraction(self) -> f32 {
        match self {
            FoodTier::Low => 1.0 / 3.0,
            FoodTier::Mid => 1.0 / 2.5,
            FoodTier::High => 1.0 / 2.0,
            FoodTier::Rare => 1.0 / 1.8,
            FoodTier::Epic => 1.0 / 1.5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FoodItem {
    pub position: Cell,
    pub value: u32,
    pub tier: FoodTier,
    pub is_pulsing: bool,
}

impl FoodItem {
    pub fn new(position: Cell, tier: FoodTier) -> Self {
        FoodItem { position, value: tier.value(), tier, is_pulsing: tier.is_pulsing() }
    }
}

/// Anything able to hand out the next food item.
pub trait FoodSource {
    fn spawn(&mut self, occupied: &HashSet<Cell>, grid: &Grid) -> Result<FoodItem, GameError>;
}

/// Rejection-samples a free cell, then rolls the tier.
pub struct RandomSpawner<R> {
    rng: R,
    max_attempts: u32,
}

impl<R: Rng> RandomSpawner<R> {
    pub fn new(rng: R) -> Self {
        RandomSpawner { rng, max_attempts: DEFAULT_MAX_SPAWN_ATTEMPTS }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    fn pick_cell(&mut self, occupied: &HashSet<Cell>, grid: &Grid) -> Result<Cell, GameError> {
        for _ in 0..self.max_attempts {
            let cell = Cell::new(self.rng.gen_range(0..grid.width()), self.rng.gen_range(0..grid.height()));
            if !occupied.contains(&cell) {
                return Ok(cell);
            }
        }

        // Crowded board: fall back to choosing among the cells that are left.
        debug!("rejection sampling gave up after {} attempts, scanning free cells", self.max_attempts);
        let attempts = self.max_attempts;
        let rng = &mut self.rng;
        grid.cells()
            .filter(|cell| !occupied.contains(cell))
            .choose(rng)
            .ok_or_else(|| {
                warn!("no free cell left on a {}x{} grid", grid.width(), grid.height());
                GameError::SpawnExhausted { attempts }
            })
    }
}

impl<R: Rng> FoodSource for RandomSpawner<R> {
    fn spawn(&mut self, occupied: &HashSet<Cell>, grid: &Grid) -> Result<FoodItem, GameError> {
        let position = self.pick_cell(occupied, grid)?;
        let tier = FoodTier::from_roll(self.rng.gen::<f64>());
        debug!("spawned {:?} food at {:?}", tier, position);
        Ok(FoodItem::new(position, tier))
    }
}
