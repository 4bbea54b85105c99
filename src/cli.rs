use clap::Parser;
use std::path::PathBuf;

use crate::config::{SearchConfig, Strategy};

/// Command-line interface for streakgen.
#[derive(Parser, Debug)]
#[command(name = "streakgen", version, about = "Finds the highest-probability elimination-pool pick sequence per contestant")]
pub struct Cli {
    /// Path to the JSON fixture (ratings, schedule, contestant roster).
    #[arg(long = "input")]
    pub input: PathBuf,

    /// Where to write the JSON results. Prints to stdout when omitted.
    #[arg(long = "output")]
    pub output: Option<PathBuf>,

    /// Which search strategy to use.
    #[arg(long = "strategy", value_enum, default_value = "auto")]
    pub strategy: StrategyArg,

    /// Above this many distinct (team order, pick-type arrangement) pairs,
    /// `auto` anneals instead of enumerating exhaustively.
    #[arg(long = "auto-threshold", default_value_t = 500_000)]
    pub auto_threshold: u128,

    /// Independent annealing chains to race per contestant.
    #[arg(long = "annealing-workers", default_value_t = 4)]
    pub annealing_workers: u32,

    /// Contestants to search concurrently. Defaults to the available
    /// hardware threads.
    #[arg(long = "contestant-workers")]
    pub contestant_workers: Option<u32>,

    /// Iterations per annealing chain.
    #[arg(long = "annealing-iterations", default_value_t = 10_000)]
    pub annealing_iterations: u64,

    /// Random seed the search is reproducible from.
    #[arg(long = "seed", default_value_t = 2026)]
    pub seed: u64,

    /// Enables the optional probability penalty filter.
    #[arg(long = "penalty-filter", default_value_t = false)]
    pub penalty_filter: bool,

    /// Overrides week inference instead of deriving it from the
    /// contestants' remaining-team counts.
    #[arg(long = "upcoming-week")]
    pub upcoming_week: Option<usize>,

    /// How many ranked alternative first-week picks to keep per contestant.
    #[arg(long = "top-n", default_value_t = 5)]
    pub top_n: usize,

    /// Validates the fixture and reports search-space sizes without
    /// actually running the search.
    #[arg(long = "dry-run", default_value_t = false)]
    pub dry_run: bool,

    /// Enable or disable logging.
    #[arg(long = "log", default_value_t = false)]
    pub log_enabled: bool,

    #[arg(long = "log-file", default_value = "streakgen.log")]
    pub log_file: String,

    /// Writes a histogram PNG of the batch's best probabilities.
    #[arg(long = "histogram-file")]
    pub histogram_file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    Exhaustive,
    Annealing,
    Auto,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Exhaustive => Strategy::Exhaustive,
            StrategyArg::Annealing => Strategy::Annealing,
            StrategyArg::Auto => Strategy::Auto,
        }
    }
}

impl Cli {
    /// Builds the [`SearchConfig`] this invocation describes.
    pub fn search_config(&self) -> SearchConfig {
        let defaults = SearchConfig::default();
        SearchConfig {
            strategy: self.strategy.into(),
            auto_threshold: self.auto_threshold,
            annealing: crate::search::annealing::AnnealingParams {
                max_iterations: self.annealing_iterations,
                ..defaults.annealing
            },
            annealing_workers: self.annealing_workers,
            contestant_workers: self.contestant_workers.unwrap_or(defaults.contestant_workers),
            seed: self.seed,
            penalty_filter: crate::prediction::PenaltyFilter {
                enabled: self.penalty_filter,
                ..defaults.penalty_filter
            },
            upcoming_week_override: self.upcoming_week,
            week_inference_tolerance: defaults.week_inference_tolerance,
            top_n: self.top_n,
            dry_run: self.dry_run,
            log_enabled: self.log_enabled,
            log_file: self.log_file.clone(),
            histogram_file: self.histogram_file.clone(),
        }
    }
}
