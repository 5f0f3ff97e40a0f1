use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Every cell of the grid is covered by the snake.
    #[error("no free cell left for food, sampled {attempts} times before scanning the grid")]
    SpawnExhausted { attempts: u32 },

    #[error("grid resolves to {width}x{height} cells, both sides must be at least one cell")]
    InvalidDimension { width: i64, height: i64 },
}
