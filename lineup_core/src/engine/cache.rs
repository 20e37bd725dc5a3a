use crate::engine::config::{EngineConfig, Heuristic};
use crate::logic::board::{Board, BoardKey};
use crate::logic::rules::{evaluate_terminal, Outcome};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A value fetched through the cache, and whether it was already stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup<T> {
    pub value: T,
    pub hit: bool,
}

/// Memoized terminal verdicts and raw heuristic scores, keyed by board contents.
///
/// Keys hold the full grid rather than a hash of it, so distinct boards never
/// share an entry.
#[derive(Debug, Default)]
pub struct EvaluationCache {
    terminal: HashMap<BoardKey, Outcome>,
    heuristic: HashMap<(BoardKey, Heuristic), f64>,
    scans: u64,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminal verdict for `board`, scanning its lines only on a miss.
    pub fn terminal(&mut self, board: &Board) -> Lookup<Outcome> {
        match self.terminal.entry(board.key()) {
            Entry::Occupied(e) => Lookup {
                value: *e.get(),
                hit: true,
            },
            Entry::Vacant(e) => {
                self.scans += 1;
                let outcome = evaluate_terminal(board);
                e.insert(outcome);
                Lookup {
                    value: outcome,
                    hit: false,
                }
            }
        }
    }

    /// Stores a verdict without scanning. Later lookups return it as-is.
    pub fn insert_terminal(&mut self, key: BoardKey, outcome: Outcome) {
        self.terminal.insert(key, outcome);
    }

    /// Raw (unbounded) heuristic score of `board`.
    pub fn heuristic(
        &mut self,
        board: &Board,
        heuristic: Heuristic,
        config: &EngineConfig,
    ) -> Lookup<f64> {
        match self.heuristic.entry((board.key(), heuristic)) {
            Entry::Occupied(e) => Lookup {
                value: *e.get(),
                hit: true,
            },
            Entry::Vacant(e) => {
                let value = heuristic.raw_score(board, config);
                e.insert(value);
                Lookup { value, hit: false }
            }
        }
    }

    /// Line scans performed by the terminal detector since creation.
    pub const fn scans(&self) -> u64 {
        self.scans
    }

    pub fn len(&self) -> usize {
        self.terminal.len() + self.heuristic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminal.is_empty() && self.heuristic.is_empty()
    }

    pub fn clear(&mut self) {
        self.terminal.clear();
        self.heuristic.clear();
    }
}
