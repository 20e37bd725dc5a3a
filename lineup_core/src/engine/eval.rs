use crate::engine::config::{EngineConfig, Heuristic};
use crate::engine::Evaluator;
use crate::logic::board::{Board, Cell};
use crate::logic::lines::runs;

/// Scores runs of stones: each run of length `k` is worth `10^k`, positive for
/// O and negative for X. A symbol whose run touches a blocked cell on a line
/// concedes `block_penalty` for that line.
pub struct AggressiveEvaluator {
    block_penalty: f64,
}

impl AggressiveEvaluator {
    pub const fn new(block_penalty: f64) -> Self {
        Self { block_penalty }
    }
}

impl Evaluator for AggressiveEvaluator {
    fn evaluate(&self, board: &Board) -> f64 {
        let mut score = 0.0;
        for line in board.lines() {
            let mut x_capped = false;
            let mut o_capped = false;
            let mut prev = None;

            for (cell, len) in runs(board.line_cells(line)) {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let weight = 10f64.powi(len as i32);
                match cell {
                    Cell::O => score += weight,
                    Cell::X => score -= weight,
                    Cell::Empty | Cell::Blocked => {}
                }

                // Consecutive runs are adjacent on the line.
                match (prev, cell) {
                    (Some(Cell::Blocked), Cell::X) | (Some(Cell::X), Cell::Blocked) => {
                        x_capped = true;
                    }
                    (Some(Cell::Blocked), Cell::O) | (Some(Cell::O), Cell::Blocked) => {
                        o_capped = true;
                    }
                    _ => {}
                }
                prev = Some(cell);
            }

            if x_capped {
                score += self.block_penalty;
            }
            if o_capped {
                score -= self.block_penalty;
            }
        }
        score
    }
}

/// Scores adjacency along every line, walked in both directions.
///
/// With `unit = 10^-win_length`: two X in a row cost one unit, two O in a row
/// earn one unit, and every switch between X and O earns `block_weight` units.
pub struct DefensiveEvaluator {
    block_weight: f64,
}

impl DefensiveEvaluator {
    pub const fn new(block_weight: f64) -> Self {
        Self { block_weight }
    }

    fn scan(&self, cells: impl Iterator<Item = Cell>, unit: f64) -> f64 {
        let mut score = 0.0;
        let mut prev = None;
        for cell in cells {
            match (prev, cell) {
                (Some(Cell::X), Cell::X) => score -= unit,
                (Some(Cell::O), Cell::O) => score += unit,
                (Some(Cell::X), Cell::O) | (Some(Cell::O), Cell::X) => {
                    score += unit * self.block_weight;
                }
                _ => {}
            }
            prev = Some(cell);
        }
        score
    }
}

impl Evaluator for DefensiveEvaluator {
    fn evaluate(&self, board: &Board) -> f64 {
        let unit = 10f64.powi(-i32::from(board.win_length()));
        board
            .lines()
            .iter()
            .map(|line| {
                let forward = self.scan(board.line_cells(line), unit);
                let backward = self.scan(
                    line.indices().iter().rev().map(|&idx| board.cell_at(idx)),
                    unit,
                );
                forward + backward
            })
            .sum()
    }
}

impl Heuristic {
    /// Unbounded score of a non-terminal board. Depends only on the board.
    pub fn raw_score(self, board: &Board, config: &EngineConfig) -> f64 {
        match self {
            Self::Aggressive => AggressiveEvaluator::new(config.block_penalty).evaluate(board),
            Self::Defensive => DefensiveEvaluator::new(config.block_weight).evaluate(board),
        }
    }

    /// Maps a raw score into `[-bound, bound]`.
    ///
    /// The aggressive heuristic also rewards the side to move with the depth
    /// still available below the node, then normalizes by `10^win_length`.
    pub fn bounded_score(
        self,
        raw: f64,
        board: &Board,
        remaining_depth: u32,
        maximizing: bool,
        bound: f64,
    ) -> f64 {
        let value = match self {
            Self::Aggressive => {
                let bonus = f64::from(remaining_depth);
                let bonus = if maximizing { bonus } else { -bonus };
                (raw + bonus) / 10f64.powi(i32::from(board.win_length()))
            }
            Self::Defensive => raw,
        };
        value.clamp(-bound, bound)
    }
}
