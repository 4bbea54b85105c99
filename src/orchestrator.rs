//! Wires the pieces together: dedupe contestants, fan a worker pool out
//! over the unique ones, and distribute each result back out to every
//! contestant that shares its search space.
//!
//! Three stages over bounded channels, mirroring the source pipeline this
//! is translated from: a feeder pushes unique contestants into a work
//! queue, a fixed pool of worker threads drains it and pushes results into
//! a second queue, and a single collector thread drains that into the
//! final map. Cancellation is cooperative: a [`CancellationToken`] flag is
//! checked inside every search loop, so a cancelled run exits at its next
//! checkpoint rather than being killed outright.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use crossbeam_channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cancel::CancellationToken;
use crate::config::{SearchConfig, Strategy};
use crate::contestant::{group_duplicates, Contestant};
use crate::errors::{CoreError, CoreResult};
use crate::prediction::Predictions;
use crate::result::PlayerResults;
use crate::search::{annealing, exhaustive, SearchOutcome};
use crate::team::TeamRegistry;

/// Runs a full search over every contestant and returns one [`PlayerResults`]
/// per contestant (duplicates included, each pointing at the same search).
pub fn run(
    registry: &TeamRegistry,
    predictions: &Predictions,
    contestants: &[Contestant],
    upcoming_week: usize,
    config: &SearchConfig,
    token: &CancellationToken,
) -> CoreResult<Vec<PlayerResults>> {
    let groups = group_duplicates(contestants);
    let by_name: HashMap<&str, &Contestant> = contestants.iter().map(|c| (c.name.as_str(), c)).collect();

    let representatives: Vec<&Contestant> = groups.keys().map(|name| by_name[name.as_str()]).collect();

    let outcomes = run_unique(registry, predictions, &representatives, upcoming_week, config, token)?;

    let mut results = Vec::with_capacity(contestants.len());
    for (representative, (started, ended, outcome)) in representatives.iter().zip(outcomes) {
        let members = &groups[&representative.name];
        for member_name in members {
            let member = by_name[member_name.as_str()];
            results.push(PlayerResults::new(
                member.name.clone(),
                upcoming_week,
                started,
                ended,
                registry,
                member.remaining_teams(),
                member.has_double_down_remaining(),
                member.external_ref.clone(),
                predictions,
                &outcome,
                config.top_n,
            ));
        }
    }
    Ok(results)
}

type TimedOutcome = (chrono::DateTime<Utc>, chrono::DateTime<Utc>, SearchOutcome);

/// Stage 2 of the pipeline: a bounded work queue feeds a fixed pool of
/// worker threads, each picking a strategy per contestant and running it;
/// a single collector thread drains their results queue in submission
/// order. Returns one outcome per entry of `contestants`, in the same
/// order.
fn run_unique(
    registry: &TeamRegistry,
    predictions: &Predictions,
    contestants: &[&Contestant],
    upcoming_week: usize,
    config: &SearchConfig,
    token: &CancellationToken,
) -> CoreResult<Vec<TimedOutcome>> {
    let _ = registry; // kept for symmetry with callers that need names mid-pipeline
    let workers = config.contestant_workers.max(1) as usize;
    let (work_tx, work_rx) = bounded::<(usize, Contestant)>(contestants.len().max(1));
    let (result_tx, result_rx) = bounded::<CoreResult<(usize, TimedOutcome)>>(contestants.len().max(1));

    for (i, c) in contestants.iter().enumerate() {
        work_tx
            .send((i, (*c).clone()))
            .expect("work queue outlives its producer");
    }
    drop(work_tx);

    let predictions = Arc::new(predictions.clone());
    let config = Arc::new(config.clone());

    thread::scope(|scope| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let predictions = Arc::clone(&predictions);
            let config = Arc::clone(&config);
            let token = token.clone();
            scope.spawn(move || {
                for (index, contestant) in work_rx {
                    if token.is_cancelled() {
                        let _ = result_tx.send(Err(CoreError::Cancelled));
                        continue;
                    }
                    let started = Utc::now();
                    let outcome = search_one(&contestant, &predictions, upcoming_week, &config, &token);
                    let ended = Utc::now();
                    let sent = outcome.map(|o| (index, (started, ended, o)));
                    if result_tx.send(sent).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let bar = ProgressBar::new(contestants.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(" [{elapsed_precise}] {bar:40.green/white} {pos}/{len} ({percent}%) | {msg}")
                .progress_chars("%>="),
        );

        let mut slots: Vec<Option<TimedOutcome>> = (0..contestants.len()).map(|_| None).collect();
        for received in result_rx {
            let (index, timed) = received?;
            slots[index] = Some(timed);
            bar.inc(1);
        }
        bar.finish_and_clear();
        Ok(slots.into_iter().map(|s| s.expect("every index is produced exactly once")).collect())
    })
}

fn search_one(
    contestant: &Contestant,
    predictions: &Predictions,
    upcoming_week: usize,
    config: &SearchConfig,
    token: &CancellationToken,
) -> CoreResult<SearchOutcome> {
    let space = contestant.search_space_size();
    let use_exhaustive = match config.strategy {
        Strategy::Exhaustive => true,
        Strategy::Annealing => false,
        Strategy::Auto => space <= config.auto_threshold,
    };

    if use_exhaustive {
        exhaustive::search(contestant, predictions, upcoming_week, token)
    } else {
        // Which remaining week absorbs a double-down is part of the search
        // space (exhaustive covers it via picks_per_week_order_iterator);
        // annealing must perturb it too, or it never explores that axis.
        let mut annealing_params = config.annealing;
        if contestant.has_double_down_remaining() {
            annealing_params.also_perturb_picks_per_week = true;
        }
        annealing::search_parallel(
            contestant,
            predictions,
            upcoming_week,
            &annealing_params,
            config.seed,
            config.annealing_workers,
            token,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::GaussianSpreadModel;
    use crate::schedule::Schedule;
    use crate::team::{RelativeLocation, TeamSlot};
    use std::collections::HashMap;

    fn fixture() -> (TeamRegistry, Predictions) {
        let mut reg = TeamRegistry::new();
        let a = reg.intern("A");
        let b = reg.intern("B");
        let mut ratings = HashMap::new();
        ratings.insert(a, 8.0);
        ratings.insert(b, -8.0);
        let model = GaussianSpreadModel::new(ratings, 10.0, 0.0, 0.0);
        let rows = vec![
            vec![(TeamSlot::Real(b), RelativeLocation::Home)],
            vec![(TeamSlot::Real(a), RelativeLocation::Away)],
        ];
        let schedule = Schedule::new(&reg, rows).unwrap();
        let predictions = Predictions::build(&reg, &schedule, &model);
        (reg, predictions)
    }

    #[test]
    fn runs_every_contestant_including_duplicates() {
        let (reg, predictions) = fixture();
        let a = reg.get("A").unwrap();
        let contestants = vec![
            Contestant::new("Alice", vec![a], vec![1], None).unwrap(),
            Contestant::new("Bob", vec![a], vec![1], None).unwrap(),
        ];
        let config = SearchConfig { strategy: Strategy::Exhaustive, ..Default::default() };
        let token = CancellationToken::new();

        let results = run(&reg, &predictions, &contestants, 0, &config, &token).unwrap();
        assert_eq!(results.len(), 2);
        let names: Vec<_> = results.iter().map(|r| r.player.clone()).collect();
        assert!(names.contains(&"Alice".to_string()));
        assert!(names.contains(&"Bob".to_string()));
        for r in &results {
            assert!(r.best.is_some());
        }
    }

    #[test]
    fn auto_strategy_thresholds_on_the_full_search_space_not_just_team_orders() {
        // 5 copies of one team (team-order space collapses to 1) across 10
        // weeks split 5 byes / 5 singles (pick-type arrangement space is
        // 10!/(5!5!) = 252). A threshold between 1 and 252 must route to
        // annealing -- thresholding on `num_team_orders` alone would wrongly
        // pick exhaustive here and enumerate the full 252-entry product.
        let mut reg = TeamRegistry::new();
        let t = reg.intern("T");
        let model = GaussianSpreadModel::new(HashMap::new(), 10.0, 0.0, 0.0);
        let rows = vec![vec![(TeamSlot::Unused, RelativeLocation::Neutral); 10]];
        let schedule = Schedule::new(&reg, rows).unwrap();
        let predictions = Predictions::build(&reg, &schedule, &model);

        let contestant = Contestant::new(
            "Solo",
            vec![t, t, t, t, t],
            vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1],
            None,
        )
        .unwrap();
        assert_eq!(contestant.num_team_orders(), 1);
        assert_eq!(contestant.search_space_size(), 252);

        let config = SearchConfig {
            strategy: Strategy::Auto,
            auto_threshold: 10,
            annealing: crate::search::annealing::AnnealingParams { max_iterations: 7, ..Default::default() },
            annealing_workers: 1,
            ..Default::default()
        };
        let token = CancellationToken::new();

        let outcome = search_one(&contestant, &predictions, 0, &config, &token).unwrap();
        assert_eq!(outcome.examined, 8); // 1 initial + 7 annealing iterations, not the full 252
    }

    #[test]
    fn cancellation_propagates_as_an_error() {
        let (reg, predictions) = fixture();
        let a = reg.get("A").unwrap();
        let contestants = vec![Contestant::new("Alice", vec![a], vec![1], None).unwrap()];
        let config = SearchConfig::default();
        let token = CancellationToken::new();
        token.cancel();

        let result = run(&reg, &predictions, &contestants, 0, &config, &token);
        assert!(result.is_err());
    }
}
