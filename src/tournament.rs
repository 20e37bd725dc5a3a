use crate::game_loop::play_game;
use crate::player::Player;
use anyhow::Result;
use lineup_core::engine::config::{Algorithm, Heuristic, SearchConfig};
use lineup_core::engine::search::SearchEngine;
use lineup_core::logic::board::{BoardParams, Pos, Symbol};
use lineup_core::logic::game::GameStatus;
use rand::Rng;
use std::io;
use tracing::info;

const SIZE: u8 = 4;
const WIN_LENGTH: u8 = 3;
const BLOCKS: usize = 4;
const TIME_BUDGET_MS: u64 = 5_000;

/// Results credited to heuristics rather than to the symbol they played.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub games: u32,
    pub aggressive_wins: u32,
    pub defensive_wins: u32,
    pub ties: u32,
}

impl Scoreboard {
    pub fn record(&mut self, status: GameStatus, x_heuristic: Heuristic) {
        self.games += 1;
        let Some(winner) = status.winner() else {
            self.ties += 1;
            return;
        };
        let heuristic = match (winner, x_heuristic) {
            (Symbol::X, h) => h,
            (Symbol::O, Heuristic::Aggressive) => Heuristic::Defensive,
            (Symbol::O, Heuristic::Defensive) => Heuristic::Aggressive,
        };
        match heuristic {
            Heuristic::Aggressive => self.aggressive_wins += 1,
            Heuristic::Defensive => self.defensive_wins += 1,
        }
    }

    /// Percentage of all games won by `heuristic`.
    pub fn win_rate(&self, heuristic: Heuristic) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        let wins = match heuristic {
            Heuristic::Aggressive => self.aggressive_wins,
            Heuristic::Defensive => self.defensive_wins,
        };
        f64::from(wins) / f64::from(self.games) * 100.0
    }

    pub fn log_summary(&self) {
        info!("--- SCOREBOARD SUMMARY ---");
        info!("total games played: {}", self.games);
        info!("e1 (aggressive) win rate: {:.1}%", self.win_rate(Heuristic::Aggressive));
        info!("e2 (defensive) win rate: {:.1}%", self.win_rate(Heuristic::Defensive));
        info!("number of ties: {}", self.ties);
    }
}

/// `count` distinct cells of a `size` x `size` board.
#[allow(clippy::cast_possible_truncation)]
pub fn random_blocks<R: Rng>(rng: &mut R, size: u8, count: usize) -> Vec<Pos> {
    let n = usize::from(size);
    rand::seq::index::sample(rng, n * n, count.min(n * n))
        .into_iter()
        .map(|idx| Pos::new((idx % n) as u8, (idx / n) as u8))
        .collect()
}

fn blocks_label(blocks: &[Pos]) -> String {
    blocks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Aggressive (depth 2) against defensive (depth 6) on a 4x4 board, `rounds`
/// games with the corners blocked and `rounds` games with random blocks.
/// Colours alternate every game.
pub fn run<R: Rng>(rounds: u32, engine: &mut SearchEngine, rng: &mut R) -> Result<Scoreboard> {
    let aggressive = Player::ai(SearchConfig {
        max_depth: Some(2),
        time_budget_ms: TIME_BUDGET_MS,
        heuristic: Heuristic::Aggressive,
        algorithm: Algorithm::AlphaBeta,
    });
    let defensive = Player::ai(SearchConfig {
        max_depth: Some(6),
        heuristic: Heuristic::Defensive,
        ..aggressive.search
    });

    let mut scoreboard = Scoreboard::default();
    let corners = [
        Pos::new(0, 0),
        Pos::new(0, SIZE - 1),
        Pos::new(SIZE - 1, 0),
        Pos::new(SIZE - 1, SIZE - 1),
    ];

    for (half, random) in [("FIRST HALF", false), ("SECOND HALF", true)] {
        info!("{half}");
        for round in 0..rounds {
            let blocks = if random {
                random_blocks(rng, SIZE, BLOCKS)
            } else {
                corners.to_vec()
            };
            info!("Game {}: blocks {}", scoreboard.games + 1, blocks_label(&blocks));

            let (x, o) = if round % 2 == 0 {
                (&aggressive, &defensive)
            } else {
                (&defensive, &aggressive)
            };
            let params = BoardParams::new(SIZE, WIN_LENGTH, blocks)?;
            let status = play_game(params, [x, o], engine, false, &mut io::empty())?;
            scoreboard.record(status, x.search.heuristic);
        }
    }

    scoreboard.log_summary();
    Ok(scoreboard)
}
