use clap::ValueEnum;
use lineup_core::engine::config::{Algorithm, Heuristic, SearchConfig};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    #[value(alias = "h")]
    Human,
    #[value(alias = "a")]
    Ai,
}

#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub kind: PlayerKind,
    /// Drives AI moves, and recommendations when a human is to move.
    pub search: SearchConfig,
}

impl Player {
    pub const fn ai(search: SearchConfig) -> Self {
        Self {
            kind: PlayerKind::Ai,
            search,
        }
    }

    pub fn is_ai(&self) -> bool {
        self.kind == PlayerKind::Ai
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PlayerKind::Human => "HUMAN",
            PlayerKind::Ai => "AI",
        };
        let algorithm = match self.search.algorithm {
            Algorithm::Minimax => "minimax",
            Algorithm::AlphaBeta => "alphabeta",
        };
        let heuristic = match self.search.heuristic {
            Heuristic::Aggressive => "e1(aggressive)",
            Heuristic::Defensive => "e2(defensive)",
        };
        write!(f, "{kind} d=")?;
        match self.search.max_depth {
            Some(depth) => write!(f, "{depth}")?,
            None => f.write_str("full")?,
        }
        write!(
            f,
            " a={algorithm} {heuristic} t={}ms",
            self.search.time_budget_ms
        )
    }
}
