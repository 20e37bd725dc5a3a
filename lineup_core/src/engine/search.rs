use crate::engine::cache::EvaluationCache;
use crate::engine::config::{
    Algorithm, CacheLifetime, EngineConfig, Heuristic, SearchConfig, TimeoutPolicy,
};
use crate::engine::{SearchResult, SearchStats, Searcher};
use crate::error::{LineupError, Result};
use crate::logic::board::{Board, Cell, Symbol};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Strictly outside every reachable score.
const MAX_START: f64 = -2.0;
const MIN_START: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
struct NodeValue {
    score: f64,
    best: Option<usize>,
    /// Mean ply of the leaves below this node, averaged child by child.
    avg_depth: f64,
}

impl NodeValue {
    fn leaf(score: f64, ply: u32) -> Self {
        Self {
            score,
            best: None,
            avg_depth: f64::from(ply),
        }
    }
}

/// Depth- and time-limited minimax with optional alpha-beta pruning.
///
/// Time is checked twice. Once `budget - leeway` has elapsed, nodes below the
/// root stop expanding and return a heuristic score. If the whole budget runs
/// out anyway, the search unwinds immediately and the configured
/// [`TimeoutPolicy`] decides the result.
pub struct SearchEngine {
    config: Arc<EngineConfig>,
    cache: EvaluationCache,
    rng: StdRng,
    stats: SearchStats,
    heuristic: Heuristic,
    start: Instant,
    budget: Duration,
    soft_limit: Duration,
}

impl SearchEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Engine whose random fallback moves are reproducible.
    pub fn with_seed(config: Arc<EngineConfig>, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Arc<EngineConfig>, rng: StdRng) -> Self {
        Self {
            config,
            cache: EvaluationCache::new(),
            rng,
            stats: SearchStats::default(),
            heuristic: Heuristic::Aggressive,
            start: Instant::now(),
            budget: Duration::ZERO,
            soft_limit: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forgets every cached evaluation.
    pub fn new_game(&mut self) {
        self.drop_cache();
    }

    /// Statistics of the most recent [`Searcher::find_move`] call, including
    /// calls that ended in a timeout error.
    pub fn last_stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut EvaluationCache {
        &mut self.cache
    }

    fn begin(&mut self, config: &SearchConfig) {
        self.stats = SearchStats::default();
        self.heuristic = config.heuristic;
        self.budget = config.time_budget();
        self.soft_limit = self.budget.saturating_sub(self.config.leeway());
        self.start = Instant::now();
    }

    fn drop_cache(&mut self) {
        if !self.cache.is_empty() {
            log::trace!("dropping {} cached evaluations", self.cache.len());
        }
        self.cache.clear();
    }

    fn elapsed_ms(&self) -> u64 {
        #[allow(clippy::cast_possible_truncation)]
        let ms = self.start.elapsed().as_millis() as u64;
        ms
    }

    fn past_soft_limit(&self) -> bool {
        self.start.elapsed() >= self.soft_limit
    }

    fn out_of_time(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    /// Returns the score of `board` if it needs no expansion: a proven outcome,
    /// or a heuristic score when time or depth has run out below the root.
    fn static_value(
        &mut self,
        board: &Board,
        turn: Symbol,
        remaining: Option<u32>,
        ply: u32,
    ) -> Option<f64> {
        let lookup = self.cache.terminal(board);
        if let Some(score) = lookup.value.score() {
            self.stats.terminal_states += 1;
            if lookup.hit {
                self.stats.terminal_cache_hits += 1;
            }
            self.stats.record_leaf(ply);
            return Some(score);
        }

        // The root always expands its children.
        if ply == 0 {
            return None;
        }
        if self.past_soft_limit() {
            self.stats.time_cutoffs += 1;
        } else if remaining == Some(0) {
            self.stats.depth_cutoffs += 1;
        } else {
            return None;
        }
        Some(self.heuristic_value(board, turn, remaining.unwrap_or(0), ply))
    }

    fn heuristic_value(&mut self, board: &Board, turn: Symbol, remaining: u32, ply: u32) -> f64 {
        self.stats.heuristic_evals += 1;
        self.stats.record_leaf(ply);
        let lookup = self.cache.heuristic(board, self.heuristic, &self.config);
        if lookup.hit {
            self.stats.heuristic_cache_hits += 1;
        }
        self.heuristic.bounded_score(
            lookup.value,
            board,
            remaining,
            turn.is_maximizer(),
            self.config.heuristic_bound,
        )
    }

    fn enter(&mut self, ply: u32) {
        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(ply);
    }

    /// Plain minimax. `None` means the full budget ran out below the root.
    fn minimax(
        &mut self,
        board: &mut Board,
        turn: Symbol,
        remaining: Option<u32>,
        ply: u32,
    ) -> Option<NodeValue> {
        self.enter(ply);
        if let Some(score) = self.static_value(board, turn, remaining, ply) {
            return Some(NodeValue::leaf(score, ply));
        }

        let maximizing = turn.is_maximizer();
        let mut best = if maximizing { MAX_START } else { MIN_START };
        let mut best_idx = None;
        let mut depth_sum = 0.0;
        let mut children = 0u32;

        for idx in 0..board.cell_count() {
            if board.cell_at(idx) != Cell::Empty {
                continue;
            }
            board.place_index(idx, turn);
            let child = self.minimax(
                board,
                turn.opposite(),
                remaining.map(|d| d.saturating_sub(1)),
                ply + 1,
            );
            board.clear_index(idx);
            let child = child?;

            depth_sum += child.avg_depth;
            children += 1;
            if improves(maximizing, child.score, best) {
                best = child.score;
                best_idx = Some(idx);
            }

            if ply > 0 && self.out_of_time() {
                return None;
            }
        }

        Some(NodeValue {
            score: best,
            best: best_idx,
            avg_depth: depth_sum / f64::from(children.max(1)),
        })
    }

    /// Minimax with alpha-beta pruning. Same contract as [`Self::minimax`].
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        turn: Symbol,
        mut alpha: f64,
        mut beta: f64,
        remaining: Option<u32>,
        ply: u32,
    ) -> Option<NodeValue> {
        self.enter(ply);
        if let Some(score) = self.static_value(board, turn, remaining, ply) {
            return Some(NodeValue::leaf(score, ply));
        }

        let maximizing = turn.is_maximizer();
        let mut best = if maximizing { MAX_START } else { MIN_START };
        let mut best_idx = None;
        let mut depth_sum = 0.0;
        let mut children = 0u32;

        for idx in 0..board.cell_count() {
            if board.cell_at(idx) != Cell::Empty {
                continue;
            }
            board.place_index(idx, turn);
            let child = self.alpha_beta(
                board,
                turn.opposite(),
                alpha,
                beta,
                remaining.map(|d| d.saturating_sub(1)),
                ply + 1,
            );
            board.clear_index(idx);
            let child = child?;

            depth_sum += child.avg_depth;
            children += 1;
            if improves(maximizing, child.score, best) {
                best = child.score;
                best_idx = Some(idx);
            }

            if maximizing {
                if best >= beta {
                    break;
                }
                alpha = alpha.max(best);
            } else {
                if best <= alpha {
                    break;
                }
                beta = beta.min(best);
            }

            if ply > 0 && self.out_of_time() {
                return None;
            }
        }

        Some(NodeValue {
            score: best,
            best: best_idx,
            avg_depth: depth_sum / f64::from(children.max(1)),
        })
    }

    fn search(
        &mut self,
        board: &mut Board,
        turn: Symbol,
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        self.begin(config);
        let scans_before = self.cache.scans();

        // A depth limit of zero would leave nothing to choose from.
        let remaining = config.max_depth.map(|d| d.max(1));
        let value = match config.algorithm {
            Algorithm::Minimax => self.minimax(board, turn, remaining, 0),
            Algorithm::AlphaBeta => {
                self.alpha_beta(board, turn, MAX_START, MIN_START, remaining, 0)
            }
        };

        self.stats.time_ms = self.elapsed_ms();
        self.stats.line_scans = self.cache.scans() - scans_before;

        let Some(value) = value else {
            return self.timed_out(board, turn);
        };
        self.stats.avg_recursion_depth = value.avg_depth;

        let best_move = value.best.map(|idx| board.params().pos_of(idx));
        log::debug!(
            "{:?} search for {turn}: score {:.4}, move {}, {} nodes in {} ms",
            config.algorithm,
            value.score,
            best_move.map_or_else(|| "-".to_string(), |p| p.to_string()),
            self.stats.nodes,
            self.stats.time_ms
        );

        Ok(SearchResult {
            score: value.score,
            best_move,
            stats: self.stats.clone(),
            timed_out: false,
        })
    }

    fn timed_out(&mut self, board: &Board, turn: Symbol) -> Result<SearchResult> {
        let elapsed_ms = self.stats.time_ms;
        match self.config.on_timeout {
            TimeoutPolicy::Forfeit => {
                log::warn!(
                    "{turn} exceeded its {} ms budget after {elapsed_ms} ms",
                    self.budget.as_millis()
                );
                Err(LineupError::SearchTimeout {
                    symbol: turn,
                    elapsed_ms,
                })
            }
            TimeoutPolicy::RandomMove => {
                let best_move = board.empty_positions().choose(&mut self.rng);
                let score = self.heuristic_value(board, turn, 0, 0);
                log::warn!("{turn} ran out of time, playing random move {best_move:?}");
                Ok(SearchResult {
                    score,
                    best_move,
                    stats: self.stats.clone(),
                    timed_out: true,
                })
            }
        }
    }
}

fn improves(maximizing: bool, candidate: f64, best: f64) -> bool {
    if maximizing {
        candidate > best
    } else {
        candidate < best
    }
}

impl Searcher for SearchEngine {
    fn find_move(
        &mut self,
        board: &mut Board,
        turn: Symbol,
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        let result = self.search(board, turn, config);
        if self.config.cache_lifetime == CacheLifetime::PerCall {
            self.drop_cache();
        }
        result
    }
}
