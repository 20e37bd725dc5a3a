use crate::error::Result;
use crate::logic::board::{Board, Pos, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod cache;
pub mod config;
pub mod eval;
pub mod search;

#[cfg(test)]
mod search_test;

pub use config::{Algorithm, EngineConfig, Heuristic, SearchConfig};

/// Instrumentation for exactly one top-level search call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Recursive entries, root included.
    pub nodes: u64,
    /// Wins and ties reached, and how many of those verdicts came from the cache.
    pub terminal_states: u64,
    pub terminal_cache_hits: u64,
    pub heuristic_evals: u64,
    pub heuristic_cache_hits: u64,
    /// Full line scans performed by the terminal detector (cache misses).
    pub line_scans: u64,
    pub time_cutoffs: u64,
    pub depth_cutoffs: u64,
    /// Leaf evaluations (terminal or heuristic) keyed by ply from the root.
    pub evals_by_depth: BTreeMap<u32, u64>,
    /// Deepest ply entered.
    pub max_depth: u32,
    /// Mean over the root's children of their own mean recursion depth.
    pub avg_recursion_depth: f64,
    pub time_ms: u64,
}

impl SearchStats {
    pub fn leaves(&self) -> u64 {
        self.evals_by_depth.values().sum()
    }

    /// Mean ply of leaf evaluations.
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_eval_depth(&self) -> f64 {
        let leaves = self.leaves();
        if leaves == 0 {
            return 0.0;
        }
        let total: u64 = self
            .evals_by_depth
            .iter()
            .map(|(&depth, &count)| u64::from(depth) * count)
            .sum();
        total as f64 / leaves as f64
    }

    pub(crate) fn record_leaf(&mut self, ply: u32) {
        *self.evals_by_depth.entry(ply).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Exactly -1, 0 or 1 for proven outcomes, strictly inside (-1, 1) otherwise.
    pub score: f64,
    /// `None` when the root is already terminal.
    pub best_move: Option<Pos>,
    pub stats: SearchStats,
    /// Set when the move was substituted after running out of time.
    pub timed_out: bool,
}

/// Static evaluation of a non-terminal board, positive favoring O.
///
/// Implementations must be pure functions of the board contents: results are
/// memoized by board key.
pub trait Evaluator {
    fn evaluate(&self, board: &Board) -> f64;
}

pub trait Searcher {
    /// Best move for `turn`. The board is mutated during the search and
    /// restored before returning.
    fn find_move(
        &mut self,
        board: &mut Board,
        turn: Symbol,
        config: &SearchConfig,
    ) -> Result<SearchResult>;
}
