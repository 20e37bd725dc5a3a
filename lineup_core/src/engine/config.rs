use crate::error::LineupError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
}

/// Scoring used when the search is cut off before a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heuristic {
    /// Rewards building long runs.
    Aggressive,
    /// Rewards blocking the opponent.
    Defensive,
}

impl FromStr for Algorithm {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "minimax" => Ok(Self::Minimax),
            "a" | "alphabeta" | "alpha-beta" => Ok(Self::AlphaBeta),
            _ => Err(LineupError::InvalidOption(s.to_string())),
        }
    }
}

impl FromStr for Heuristic {
    type Err = LineupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "e1" | "aggressive" => Ok(Self::Aggressive),
            "e2" | "defensive" => Ok(Self::Defensive),
            _ => Err(LineupError::InvalidOption(s.to_string())),
        }
    }
}

/// How long evaluation cache entries live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CacheLifetime {
    /// Cleared as each search call returns; entries stored beforehand are still seen.
    PerCall,
    /// Kept until [`SearchEngine::new_game`](crate::engine::search::SearchEngine::new_game).
    #[default]
    PerGame,
}

/// What a search call does once it runs past its full time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeoutPolicy {
    /// Report [`LineupError::SearchTimeout`]; the player loses.
    #[default]
    Forfeit,
    /// Play a uniformly random empty cell instead.
    RandomMove,
}

/// Per-player, per-call search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Plies to look ahead; `None` searches until terminal states or time runs out.
    pub max_depth: Option<u32>,
    pub time_budget_ms: u64,
    pub heuristic: Heuristic,
    pub algorithm: Algorithm,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(5),
            time_budget_ms: 10_000,
            heuristic: Heuristic::Aggressive,
            algorithm: Algorithm::AlphaBeta,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub const fn new(
        max_depth: Option<u32>,
        time_budget: Duration,
        heuristic: Heuristic,
        algorithm: Algorithm,
    ) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let time_budget_ms = time_budget.as_millis() as u64;
        Self {
            max_depth,
            time_budget_ms,
            heuristic,
            algorithm,
        }
    }

    pub const fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// Engine-wide tunables, shared by every search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Safety margin subtracted from the time budget before cutting off.
    pub leeway_ms: u64,
    pub cache_lifetime: CacheLifetime,
    pub on_timeout: TimeoutPolicy,

    // Aggressive heuristic
    /// Raw points conceded by a symbol whose run touches a blocked cell.
    pub block_penalty: f64,

    // Defensive heuristic
    /// Multiplier on the unit for each change between X and O along a line.
    pub block_weight: f64,

    /// Heuristic scores are clamped into `[-bound, bound]`, strictly inside (-1, 1).
    pub heuristic_bound: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            leeway_ms: 10,
            cache_lifetime: CacheLifetime::PerGame,
            on_timeout: TimeoutPolicy::Forfeit,
            block_penalty: 5.0,
            block_weight: 5.0,
            heuristic_bound: 0.99,
        }
    }
}

impl EngineConfig {
    /// Reads a partial JSON config; missing fields keep their defaults.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json_str)?;
        if !(config.heuristic_bound > 0.0 && config.heuristic_bound < 1.0) {
            config.heuristic_bound = Self::default().heuristic_bound;
        }
        Ok(config)
    }

    pub const fn leeway(&self) -> Duration {
        Duration::from_millis(self.leeway_ms)
    }
}
