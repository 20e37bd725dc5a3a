//! Adversarial search engine for generalized N-in-a-row games.
//!
//! The board is an n×n grid (3 ≤ n ≤ 10) with optional pre-blocked cells,
//! and a player wins by lining up `s` of their symbols in a row, column or
//! diagonal. X always moves first and minimizes; O maximizes.
//!
//! - [`logic`]: board model, line geometry, terminal detection, game state
//! - [`engine`]: heuristics, evaluation cache, minimax / alpha-beta search

pub mod engine;
pub mod error;
pub mod logic;

pub use error::{LineupError, Result};
