use crate::engine::config::{
    Algorithm, CacheLifetime, EngineConfig, Heuristic, SearchConfig, TimeoutPolicy,
};
use crate::engine::search::SearchEngine;
use crate::engine::Searcher;
use crate::error::LineupError;
use crate::logic::board::{Board, BoardParams, Pos, Symbol};
use crate::logic::rules::Outcome;
use std::sync::Arc;

use Symbol::{O, X};

fn engine(config: EngineConfig) -> SearchEngine {
    SearchEngine::with_seed(Arc::new(config), 42)
}

fn p(label: &str) -> Pos {
    Pos::parse(label).unwrap()
}

fn setup(size: u8, win_length: u8, blocked: &[&str], moves: &[(&str, Symbol)]) -> Board {
    let blocked = blocked.iter().map(|b| p(b));
    let mut board = Board::new(BoardParams::new(size, win_length, blocked).unwrap());
    for (label, symbol) in moves {
        board.place(p(label), *symbol).unwrap();
    }
    board
}

fn search(max_depth: Option<u32>, algorithm: Algorithm) -> SearchConfig {
    SearchConfig {
        max_depth,
        time_budget_ms: 60_000,
        heuristic: Heuristic::Aggressive,
        algorithm,
    }
}

const BOTH: [Algorithm; 2] = [Algorithm::Minimax, Algorithm::AlphaBeta];

#[test]
fn test_empty_board_is_a_draw() {
    let mut engine = engine(EngineConfig::default());
    let mut board = Board::default();

    let minimax = engine
        .find_move(&mut board, O, &search(None, Algorithm::Minimax))
        .unwrap();
    let alpha_beta = engine
        .find_move(&mut board, O, &search(None, Algorithm::AlphaBeta))
        .unwrap();

    assert!(minimax.score.abs() < f64::EPSILON);
    assert!(alpha_beta.score.abs() < f64::EPSILON);
    // Every partial game of tic-tac-toe, empty board included.
    assert_eq!(minimax.stats.nodes, 549_946);
    assert!(alpha_beta.stats.nodes < minimax.stats.nodes);
    assert_eq!(minimax.best_move, Some(p("A0")));
    assert_eq!(alpha_beta.best_move, Some(p("A0")));
    assert_eq!(minimax.stats.time_cutoffs + minimax.stats.depth_cutoffs, 0);
    assert_eq!(board, Board::default());
}

#[test]
fn test_takes_immediate_win_over_block() {
    // X threatens C0, but O wins first at C2.
    let board = setup(3, 3, &[], &[("A0", X), ("B0", X), ("A2", O), ("B2", O)]);
    for algorithm in BOTH {
        let mut engine = engine(EngineConfig::default());
        let mut copy = board.clone();
        let result = engine
            .find_move(&mut copy, O, &search(Some(2), algorithm))
            .unwrap();
        assert_eq!(result.best_move, Some(p("C2")), "{algorithm:?}");
        assert!((result.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(copy, board);
    }
}

#[test]
fn test_blocks_the_only_threat() {
    let board = setup(3, 3, &[], &[("A0", X), ("B0", X), ("B1", O)]);
    for algorithm in BOTH {
        let mut engine = engine(EngineConfig::default());
        let mut copy = board.clone();
        let result = engine
            .find_move(&mut copy, O, &search(None, algorithm))
            .unwrap();
        assert_eq!(result.best_move, Some(p("C0")), "{algorithm:?}");
        assert!(result.score.abs() < f64::EPSILON);
    }
}

#[test]
fn test_terminal_root_has_no_move() {
    let mut engine = engine(EngineConfig::default());
    let mut won = setup(3, 3, &[], &[("A0", X), ("B0", X), ("C0", X), ("A1", O), ("B1", O)]);
    let result = engine
        .find_move(&mut won, O, &search(Some(3), Algorithm::AlphaBeta))
        .unwrap();
    assert_eq!(result.best_move, None);
    assert!((result.score + 1.0).abs() < f64::EPSILON);
    assert_eq!(result.stats.nodes, 1);
    assert_eq!(result.stats.terminal_states, 1);
    assert_eq!(result.stats.evals_by_depth.get(&0), Some(&1));

    let mut tie = setup(
        3,
        3,
        &[],
        &[
            ("A0", X),
            ("B0", O),
            ("C0", X),
            ("A1", X),
            ("B1", O),
            ("C1", O),
            ("A2", O),
            ("B2", X),
            ("C2", X),
        ],
    );
    let result = engine
        .find_move(&mut tie, X, &search(None, Algorithm::Minimax))
        .unwrap();
    assert_eq!(result.best_move, None);
    assert!(result.score.abs() < f64::EPSILON);
}

#[test]
fn test_zero_budget_evaluates_root_children_only() {
    let mut engine = engine(EngineConfig::default());
    let mut board = Board::default();
    let config = SearchConfig {
        max_depth: Some(4),
        time_budget_ms: 0,
        heuristic: Heuristic::Aggressive,
        algorithm: Algorithm::AlphaBeta,
    };
    let result = engine.find_move(&mut board, X, &config).unwrap();

    assert!(!result.timed_out);
    assert!(result.best_move.is_some());
    assert_eq!(result.stats.nodes, 10);
    assert_eq!(result.stats.time_cutoffs, 9);
    assert_eq!(result.stats.depth_cutoffs, 0);
    assert_eq!(result.stats.max_depth, 1);
    assert_eq!(result.stats.evals_by_depth.get(&1), Some(&9));
    assert!(result.stats.time_ms < 1_000);
}

#[test]
fn test_time_cutoff_takes_priority_over_depth_cutoff() {
    // Root children are out of depth and past the soft limit at once.
    for algorithm in BOTH {
        let mut engine = engine(EngineConfig::default());
        let mut board = Board::default();
        let config = SearchConfig {
            max_depth: Some(1),
            time_budget_ms: 0,
            heuristic: Heuristic::Aggressive,
            algorithm,
        };
        let result = engine.find_move(&mut board, X, &config).unwrap();

        assert!(result.best_move.is_some());
        assert_eq!(result.stats.time_cutoffs, 9);
        assert_eq!(result.stats.depth_cutoffs, 0);
    }
}

#[test]
fn test_depth_one_prefers_the_centre() {
    // Raw aggressive scores for a single X: centre -40, corner -30, edge -20.
    for max_depth in [Some(0), Some(1)] {
        let mut engine = engine(EngineConfig::default());
        let mut board = Board::default();
        let result = engine
            .find_move(&mut board, X, &search(max_depth, Algorithm::Minimax))
            .unwrap();
        assert_eq!(result.best_move, Some(p("B1")));
        assert!((result.score + 0.04).abs() < 1e-12);
        assert_eq!(result.stats.depth_cutoffs, 9);
        assert_eq!(result.stats.time_cutoffs, 0);
        assert!((result.stats.avg_recursion_depth - 1.0).abs() < f64::EPSILON);
    }
}

#[test]
fn test_pruning_preserves_depth_limited_scores() {
    let board = setup(
        4,
        3,
        &["A0", "D3"],
        &[("B1", X), ("C2", O), ("B2", X)],
    );
    for heuristic in [Heuristic::Aggressive, Heuristic::Defensive] {
        for depth in 1..=3 {
            let mut engine = engine(EngineConfig::default());
            let mut copy = board.clone();
            let mut config = search(Some(depth), Algorithm::Minimax);
            config.heuristic = heuristic;
            let minimax = engine.find_move(&mut copy, O, &config).unwrap();
            config.algorithm = Algorithm::AlphaBeta;
            let alpha_beta = engine.find_move(&mut copy, O, &config).unwrap();

            assert!(
                (minimax.score - alpha_beta.score).abs() < 1e-12,
                "{heuristic:?} depth {depth}: {} vs {}",
                minimax.score,
                alpha_beta.score
            );
            assert!(alpha_beta.stats.nodes <= minimax.stats.nodes);
            assert!(minimax.stats.max_depth <= depth);
            assert!(minimax.score > -1.0 && minimax.score < 1.0);
            assert_eq!(copy, board);
        }
    }
}

#[test]
fn test_prewarmed_verdict_is_returned_without_scanning() {
    let mut engine = engine(EngineConfig::default());
    let mut board = setup(3, 3, &[], &[("B1", X)]);
    // Deliberately wrong: the position is still open.
    engine
        .cache_mut()
        .insert_terminal(board.key(), Outcome::Win(X));

    let result = engine
        .find_move(&mut board, O, &search(None, Algorithm::AlphaBeta))
        .unwrap();
    assert_eq!(result.best_move, None);
    assert!((result.score + 1.0).abs() < f64::EPSILON);
    assert_eq!(result.stats.line_scans, 0);
    assert_eq!(result.stats.terminal_cache_hits, 1);
}

#[test]
fn test_cache_lifetimes() {
    let board = setup(3, 3, &[], &[("B1", X)]);
    let config = search(None, Algorithm::AlphaBeta);

    let mut per_game = engine(EngineConfig::default());
    let first = per_game.find_move(&mut board.clone(), O, &config).unwrap();
    let second = per_game.find_move(&mut board.clone(), O, &config).unwrap();
    assert!(first.stats.line_scans > 0);
    assert_eq!(second.stats.line_scans, 0);
    assert!(second.stats.terminal_cache_hits > 0);
    assert_eq!(first.best_move, second.best_move);
    assert!(!per_game.cache().is_empty());
    per_game.new_game();
    assert!(per_game.cache().is_empty());

    let mut per_call = engine(EngineConfig {
        cache_lifetime: CacheLifetime::PerCall,
        ..EngineConfig::default()
    });
    let first = per_call.find_move(&mut board.clone(), O, &config).unwrap();
    assert!(per_call.cache().is_empty());
    let second = per_call.find_move(&mut board.clone(), O, &config).unwrap();
    assert_eq!(first.stats.line_scans, second.stats.line_scans);
    assert_eq!(first.stats.nodes, second.stats.nodes);
}

#[test]
fn test_cache_keeps_win_lengths_apart() {
    let mut engine = engine(EngineConfig::default());
    let config = search(Some(1), Algorithm::Minimax);

    // Same stones, different winning length: a win for O only when s = 3.
    let moves = [("A0", O), ("B0", O), ("C0", O), ("A1", X), ("B1", X)];
    let mut three = setup(4, 3, &[], &moves);
    let mut four = setup(4, 4, &[], &moves);

    let result = engine.find_move(&mut three, X, &config).unwrap();
    assert!((result.score - 1.0).abs() < f64::EPSILON);
    let result = engine.find_move(&mut four, X, &config).unwrap();
    assert!(result.best_move.is_some());
    assert!(result.score < 1.0);
    assert!(result.stats.line_scans > 0);

    // Both geometries stay cached side by side.
    let result = engine.find_move(&mut three, X, &config).unwrap();
    assert!((result.score - 1.0).abs() < f64::EPSILON);
    assert_eq!(result.stats.line_scans, 0);
    assert_eq!(result.stats.terminal_cache_hits, 1);
}

fn exhausting(on_timeout: TimeoutPolicy) -> (SearchEngine, SearchConfig) {
    let engine = engine(EngineConfig {
        leeway_ms: 0,
        on_timeout,
        ..EngineConfig::default()
    });
    let config = SearchConfig {
        max_depth: None,
        time_budget_ms: 20,
        heuristic: Heuristic::Defensive,
        algorithm: Algorithm::Minimax,
    };
    (engine, config)
}

#[test]
fn test_timeout_forfeits() {
    let (mut engine, config) = exhausting(TimeoutPolicy::Forfeit);
    let original = setup(4, 4, &[], &[]);
    let mut board = original.clone();

    match engine.find_move(&mut board, X, &config) {
        Err(LineupError::SearchTimeout { symbol, elapsed_ms }) => {
            assert_eq!(symbol, X);
            assert!(elapsed_ms >= 20);
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert!(engine.last_stats().nodes > 0);
    assert_eq!(board, original);
}

#[test]
fn test_timeout_plays_random_move() {
    let (mut engine, config) = exhausting(TimeoutPolicy::RandomMove);
    let original = setup(4, 4, &["A0"], &[("B1", O)]);
    let mut board = original.clone();

    let result = engine.find_move(&mut board, X, &config).unwrap();
    assert!(result.timed_out);
    let pos = result.best_move.unwrap();
    assert!(board.is_valid(pos));
    assert!(result.score > -1.0 && result.score < 1.0);
    assert_eq!(board, original);
}
