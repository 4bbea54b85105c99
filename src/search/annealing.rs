//! Simulated annealing: used once a contestant's remaining-team count makes
//! exhaustive enumeration impractical.
//!
//! The acceptance rule here is deliberately not the textbook
//! `exp(-delta/T) > u` — it compares against the best score seen so far
//! rather than the current one, and is linear in the temperature rather
//! than exponential in the score gap. Kept as specified rather than
//! "corrected" to the usual Metropolis criterion.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cancel::CancellationToken;
use crate::contestant::Contestant;
use crate::errors::CoreResult;
use crate::prediction::Predictions;

use super::{better, check_cancelled, score, streak_from_order, BestMap, SearchOutcome};

/// Tunable parameters of the annealing schedule.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct AnnealingParams {
    pub max_iterations: u64,
    /// Scales the temperature schedule; `T = (c * remaining_fraction)^e`.
    pub c: f64,
    /// Exponent of the temperature schedule.
    pub e: f64,
    /// Iterations without an improvement before the chain resets to the
    /// best streak seen so far, escaping a drift into worse territory.
    pub drift_limit: u64,
    /// Whether perturbation also shuffles the picks-per-week shape, not
    /// just the team order. Defaults to `false` since a contestant with no
    /// remaining double-downs has nothing to gain from it; the orchestrator
    /// overrides this to `true` per contestant when
    /// [`crate::contestant::Contestant::has_double_down_remaining`] holds,
    /// since which remaining week absorbs the double-down is then part of
    /// the space exhaustive search would otherwise cover.
    pub also_perturb_picks_per_week: bool,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        AnnealingParams {
            max_iterations: 10_000,
            c: 1.0,
            e: 3.0,
            drift_limit: 500,
            also_perturb_picks_per_week: false,
        }
    }
}

fn temperature(params: &AnnealingParams, iteration: u64) -> f64 {
    let remaining_fraction = (params.max_iterations - iteration) as f64 / params.max_iterations as f64;
    (params.c * remaining_fraction).powf(params.e)
}

/// Runs one annealing chain, seeded from `seed`, and returns the best
/// streak found per first-week team along the way.
pub fn search(
    contestant: &Contestant,
    predictions: &Predictions,
    week_offset: usize,
    params: &AnnealingParams,
    seed: u64,
    token: &CancellationToken,
) -> CoreResult<SearchOutcome> {
    let mut rng = StdRng::seed_from_u64(seed);

    // Initial state: input team order, with the first picks-per-week
    // arrangement the multiset permutor offers.
    let initial_picks_per_week = contestant
        .picks_per_week_order_iterator()
        .next()
        .map(|seq| contestant.expand_picks_per_week(&seq))
        .unwrap_or_else(|| contestant.picks_per_week().to_vec());

    let mut current = streak_from_order(contestant.remaining_teams(), &initial_picks_per_week);
    let mut current_score = score(&current, predictions, week_offset);

    let mut best = current.clone();
    let mut best_score = current_score;
    let mut best_map = BestMap::new();
    if current_score.0 > 0.0 {
        best_map.record(&current, current_score.0, current_score.1);
    }
    let mut drift: u64 = 0;
    let mut examined: u128 = 1;

    for iteration in 0..params.max_iterations {
        check_cancelled(token)?;

        let t = temperature(params, iteration);
        let candidate = current.perturbate(&mut rng, params.also_perturb_picks_per_week);
        let candidate_score = score(&candidate, predictions, week_offset);
        examined += 1;

        let accept = if better(candidate_score, current_score) {
            true
        } else {
            let u: f64 = rng.random();
            (best_score.0 - candidate_score.0) * t > u
        };

        if accept {
            current = candidate;
            current_score = candidate_score;
        }

        if better(current_score, best_score) {
            best = current.clone();
            best_score = current_score;
            drift = 0;
            if best_score.0 > 0.0 {
                best_map.record(&best, best_score.0, best_score.1);
            }
        } else {
            drift += 1;
            if drift >= params.drift_limit {
                current = best.clone();
                current_score = best_score;
                drift = 0;
            }
        }
    }

    Ok(SearchOutcome { best_map, examined })
}

/// Runs `workers` independent chains, each on its own thread with a
/// distinct seed derived from `base_seed`, and folds their best-maps
/// together.
pub fn search_parallel(
    contestant: &Contestant,
    predictions: &Predictions,
    week_offset: usize,
    params: &AnnealingParams,
    base_seed: u64,
    workers: u32,
    token: &CancellationToken,
) -> CoreResult<SearchOutcome> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers.max(1))
            .map(|w| {
                let seed = base_seed.wrapping_add(w as u64).wrapping_mul(0x9E3779B97F4A7C15);
                scope.spawn(move || search(contestant, predictions, week_offset, params, seed, token))
            })
            .collect();

        let mut best_map = BestMap::new();
        let mut examined: u128 = 0;
        for handle in handles {
            let outcome = handle.join().expect("annealing worker thread panicked")?;
            examined += outcome.examined;
            best_map.merge(outcome.best_map);
        }
        Ok(SearchOutcome { best_map, examined })
    })
}
