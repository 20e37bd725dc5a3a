use lineup_core::engine::SearchStats;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Writes the per-turn statistics block to the game trace.
#[allow(clippy::cast_precision_loss)]
pub fn log_stats(stats: &SearchStats) {
    info!("i   Evaluation time: {:.3}s", stats.time_ms as f64 / 1000.0);
    info!(
        "ii  Heuristic evaluations: {} (cached: {}) + Endgames found: {} (cached: {})",
        stats.heuristic_evals,
        stats.heuristic_cache_hits,
        stats.terminal_states,
        stats.terminal_cache_hits
    );
    info!(
        "iii Evaluations by depth: {}",
        format_depths(&stats.evals_by_depth)
    );
    info!("iv  Average evaluation depth: {:.3}", stats.avg_eval_depth());
    info!("v   Average recursion depth: {:.3}", stats.avg_recursion_depth);
    info!(
        nodes = stats.nodes,
        line_scans = stats.line_scans,
        time_cutoffs = stats.time_cutoffs,
        depth_cutoffs = stats.depth_cutoffs,
        max_depth = stats.max_depth,
        "search counters"
    );
    if let Ok(json) = serde_json::to_string(stats) {
        debug!(target: "lineup::stats", "{json}");
    }
}

fn format_depths(evals: &BTreeMap<u32, u64>) -> String {
    let entries: Vec<String> = evals
        .iter()
        .map(|(depth, count)| format!("{depth}: {count}"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_depths() {
        assert_eq!(format_depths(&BTreeMap::new()), "{}");
        let evals = BTreeMap::from([(3, 12), (1, 4)]);
        assert_eq!(format_depths(&evals), "{1: 4, 3: 12}");
    }
}
