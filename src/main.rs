use anyhow::Context;
use clap::Parser;
use log::info;

use streakgen::cancel::CancellationToken;
use streakgen::cli::Cli;
use streakgen::fixture::{self, Fixture};
use streakgen::inference::infer_upcoming_week;
use streakgen::logging;
use streakgen::orchestrator;
use streakgen::prediction::Predictions;
use streakgen::result::PlayerResults;
use streakgen::stats::Statistics;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.search_config();

    logging::init_logger(&config.log_file, config.log_enabled);
    info!("Logger initialized");

    info!("Loading fixture from {}", cli.input.display());
    let loaded = fixture::load(&cli.input).with_context(|| format!("loading fixture {}", cli.input.display()))?;
    let Fixture { registry, model, schedule, contestants } = loaded;

    let mut predictions = Predictions::build(&registry, &schedule, &model);
    predictions.apply_penalty(&config.penalty_filter);

    let upcoming_week = match config.upcoming_week_override {
        Some(w) => w,
        None => infer_upcoming_week(&contestants, schedule.num_weeks(), config.week_inference_tolerance)
            .context("inferring the upcoming week")?,
    };
    info!("Upcoming week resolved to {upcoming_week}");

    if config.dry_run {
        for c in &contestants {
            info!(
                "{}: search space {} (team orders {} x pick-type arrangements {})",
                c.name,
                c.search_space_size(),
                c.num_team_orders(),
                c.num_picks_per_week_orders()
            );
        }
        return Ok(());
    }

    let token = CancellationToken::new();
    info!("Running search over {} contestants", contestants.len());
    let results: Vec<PlayerResults> =
        orchestrator::run(&registry, &predictions, &contestants, upcoming_week, &config, &token)
            .context("running the search")?;

    let best_probabilities: Vec<f64> = results
        .iter()
        .filter_map(|r| r.best.as_ref().map(|b| b.cumulative_probability))
        .collect();
    Statistics::generate_statistics(&best_probabilities, config.histogram_file.as_deref());

    let json = serde_json::to_string_pretty(&results).context("serializing results")?;
    match cli.output {
        Some(path) => {
            std::fs::write(&path, &json).with_context(|| format!("writing results to {}", path.display()))?;
            info!("Wrote results to {}", path.display());
        }
        None => println!("{json}"),
    }

    info!("Run completed");
    Ok(())
}
