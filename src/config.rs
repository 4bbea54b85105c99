//! Tunable knobs for a search run, as a serializable record so a run can be
//! reproduced from a saved config file as easily as from the CLI.

use serde::{Deserialize, Serialize};

use crate::prediction::PenaltyFilter;
use crate::search::annealing::AnnealingParams;

/// Which search strategy to run per contestant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Always enumerate exhaustively, regardless of search-space size.
    Exhaustive,
    /// Always anneal, regardless of search-space size.
    Annealing,
    /// Enumerate exhaustively when the contestant's search space is at
    /// most `auto_threshold` arrangements, anneal otherwise.
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub strategy: Strategy,
    /// Above this many distinct (team order, pick-type arrangement) pairs
    /// — [`crate::contestant::Contestant::search_space_size`] —
    /// [`Strategy::Auto`] anneals instead of enumerating.
    pub auto_threshold: u128,
    pub annealing: AnnealingParams,
    /// Independent annealing chains to race per contestant.
    pub annealing_workers: u32,
    /// Size of the thread pool fanning contestants out for search — the
    /// degree of parallelism across contestants, distinct from
    /// `annealing_workers`'s parallelism within one contestant. Defaults to
    /// the available hardware threads.
    pub contestant_workers: u32,
    pub seed: u64,
    pub penalty_filter: PenaltyFilter,
    /// Overrides week inference when set, instead of deriving it from the
    /// contestants' remaining-team counts.
    pub upcoming_week_override: Option<usize>,
    /// Tolerance (in weeks) for contestants disagreeing on the inferred
    /// upcoming week before inference fails outright.
    pub week_inference_tolerance: usize,
    /// How many ranked alternative first-week picks to keep per contestant.
    pub top_n: usize,
    pub dry_run: bool,
    pub log_enabled: bool,
    pub log_file: String,
    pub histogram_file: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: Strategy::Auto,
            auto_threshold: 500_000,
            annealing: AnnealingParams::default(),
            annealing_workers: 4,
            contestant_workers: std::thread::available_parallelism().map(|n| n.get() as u32).unwrap_or(4),
            seed: 2026,
            penalty_filter: PenaltyFilter::default(),
            upcoming_week_override: None,
            week_inference_tolerance: 1,
            top_n: 5,
            dry_run: false,
            log_enabled: false,
            log_file: "streakgen.log".to_string(),
            histogram_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_json() {
        let config = SearchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.strategy, config.strategy);
        assert_eq!(back.seed, config.seed);
    }
}
