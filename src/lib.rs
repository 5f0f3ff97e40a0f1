//! A wrap-around snake engine: the snake, its weighted food and the tick
//! state machine, kept free of any terminal or timer code.
pub mod config;
pub mod error;
pub mod food;
pub mod grid;
pub mod input;
pub mod session;
pub mod snake;

pub use config::GameConfig;
pub use error::GameError;
pub use food::{FoodItem, FoodSource, FoodTier, RandomSpawner};
pub use grid::{Cell, Grid};
pub use session::{Phase, Schedule, Session, Snapshot, Tick, TickEvent};
pub use snake::Direction;
