use crate::logic::board::{Pos, Symbol};
use thiserror::Error;

/// Errors raised by the board model, configuration and search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineupError {
    #[error("invalid board size {0}: must be between 3 and 10")]
    InvalidBoardSize(u8),

    #[error("invalid winning line length {win_length} for a {size}x{size} board")]
    InvalidWinLength { size: u8, win_length: u8 },

    #[error("too many blocked cells: {count} (at most {max})")]
    TooManyBlocks { count: usize, max: usize },

    #[error("invalid coordinate: {0:?}")]
    InvalidCoordinate(String),

    #[error("unknown option value: {0:?}")]
    InvalidOption(String),

    #[error("position ({x}, {y}) is outside the board")]
    OutOfBounds { x: u8, y: u8 },

    #[error("cell {0} is not empty")]
    CellOccupied(Pos),

    #[error("player {symbol} ran out of time after {elapsed_ms} ms")]
    SearchTimeout { symbol: Symbol, elapsed_ms: u64 },

    #[error("the game is already over")]
    GameOver,
}

/// Convenience Result type for engine operations
pub type Result<T> = std::result::Result<T, LineupError>;
