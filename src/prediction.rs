//! The prediction model (ratings + location bias -> win probability and
//! spread) and the dense per-(team, week) predictions table built from it.

use std::collections::HashMap;

use crate::errors::{CoreError, CoreResult};
use crate::schedule::Schedule;
use crate::team::{Game, RelativeLocation, TeamId, TeamRegistry, TeamSlot};

/// Something that can predict the outcome of a [`Game`].
pub trait PredictionModel {
    /// Returns `(probability, spread)` for the side of the game named by
    /// `game.team(0)`. Bye/unused sentinels are handled per the spec:
    /// either side `BYE` -> `(0, 0)`; either side `Unused` -> `(1, 0)`.
    fn predict(&self, game: &Game) -> (f64, f64);

    /// Returns the favoured team, its probability, and the unsigned spread.
    fn most_likely_outcome(&self, game: &Game) -> (TeamSlot, f64, f64) {
        if game.team(0) == TeamSlot::Bye || game.team(1) == TeamSlot::Bye {
            return (TeamSlot::Bye, 0.0, 0.0);
        }
        if game.team(0) == TeamSlot::Unused || game.team(1) == TeamSlot::Unused {
            return (TeamSlot::Unused, 1.0, 0.0);
        }
        let (prob, spread) = self.predict(game);
        if spread < 0.0 {
            (game.team(1), 1.0 - prob, -spread)
        } else {
            (game.team(0), prob, spread)
        }
    }
}

/// Standard-normal CDF via the Abramowitz & Stegun erf approximation
/// (accurate to ~1.5e-7, ample for this model's purposes).
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

/// A Gaussian-spread prediction model: probability of win is the normal
/// CDF of a rating-difference-plus-location-bias spread.
pub struct GaussianSpreadModel {
    ratings: HashMap<TeamId, f64>,
    std_dev: f64,
    home_bias: f64,
    close_bias: f64,
}

impl GaussianSpreadModel {
    pub fn new(ratings: HashMap<TeamId, f64>, std_dev: f64, home_bias: f64, close_bias: f64) -> Self {
        GaussianSpreadModel { ratings, std_dev, home_bias, close_bias }
    }

    fn rating(&self, registry: &TeamRegistry, team: TeamId) -> CoreResult<f64> {
        self.ratings.get(&team).copied().ok_or_else(|| {
            CoreError::InvalidInput(format!("missing rating for team \"{}\"", registry.name(team)))
        })
    }

    fn spread(&self, game: &Game) -> f64 {
        let a = game.team(0).team_id().expect("real team");
        let b = game.team(1).team_id().expect("real team");
        let mut diff = self.ratings[&a] - self.ratings[&b];
        diff += match game.location_relative_to(0) {
            RelativeLocation::Home => self.home_bias,
            RelativeLocation::Near => self.close_bias,
            RelativeLocation::Neutral => 0.0,
            RelativeLocation::Far => -self.close_bias,
            RelativeLocation::Away => -self.home_bias,
        };
        diff
    }

    /// Validates that every scheduled, non-sentinel team has a rating.
    pub fn validate(&self, registry: &TeamRegistry, schedule: &Schedule) -> CoreResult<()> {
        for team in registry.ids() {
            for week in 0..schedule.num_weeks() {
                let g = schedule.get(team, week);
                for side in 0..2 {
                    if let TeamSlot::Real(id) = g.team(side) {
                        self.rating(registry, id)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl PredictionModel for GaussianSpreadModel {
    fn predict(&self, game: &Game) -> (f64, f64) {
        if game.team(0) == TeamSlot::Bye || game.team(1) == TeamSlot::Bye {
            return (0.0, 0.0);
        }
        if game.team(0) == TeamSlot::Unused || game.team(1) == TeamSlot::Unused {
            return (1.0, 0.0);
        }
        let spread = self.spread(game);
        (normal_cdf(spread / self.std_dev), spread)
    }
}

/// An optional, off-by-default probability post-filter: a piecewise-linear
/// cap that compresses probabilities above `threshold` towards 1.
///
/// Left deliberately simple per the design notes' Open Question: the
/// historical penalty mechanism's exact shape is not reconstructed here,
/// only a configurable stand-in that defaults to the identity.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct PenaltyFilter {
    pub enabled: bool,
    pub threshold: f64,
    pub slope: f64,
}

impl Default for PenaltyFilter {
    fn default() -> Self {
        PenaltyFilter { enabled: false, threshold: 0.9, slope: 0.5 }
    }
}

impl PenaltyFilter {
    pub fn apply(&self, p: f64) -> f64 {
        if !self.enabled || p <= self.threshold {
            return p;
        }
        self.threshold + (p - self.threshold) * self.slope
    }
}

/// Dense (team, week) -> (probability, spread) lookup table.
#[derive(Debug, Clone)]
pub struct Predictions {
    probs: Vec<Vec<f64>>,
    spreads: Vec<Vec<f64>>,
    num_weeks: usize,
}

impl Predictions {
    pub fn build(registry: &TeamRegistry, schedule: &Schedule, model: &dyn PredictionModel) -> Self {
        let num_weeks = schedule.num_weeks();
        let mut probs = vec![vec![0.0; num_weeks]; registry.len()];
        let mut spreads = vec![vec![0.0; num_weeks]; registry.len()];
        for team in registry.ids() {
            for week in 0..num_weeks {
                let game = schedule.get(team, week);
                let (p, s) = model.predict(&game);
                probs[team.0 as usize][week] = p;
                spreads[team.0 as usize][week] = s;
            }
        }
        Predictions { probs, spreads, num_weeks }
    }

    /// Probability that `team` wins in `week`. `NONE` is certain (prob 1);
    /// `BYE` is certain loss (prob 0) because picking a team on its bye
    /// forces a streak probability of 0.
    pub fn get_probability(&self, team: TeamSlot, week: usize) -> f64 {
        match team {
            TeamSlot::Unused => 1.0,
            TeamSlot::Bye => 0.0,
            TeamSlot::Real(id) => self.probs[id.0 as usize][week],
        }
    }

    pub fn get_spread(&self, team: TeamSlot, week: usize) -> f64 {
        match team {
            TeamSlot::Unused | TeamSlot::Bye => 0.0,
            TeamSlot::Real(id) => self.spreads[id.0 as usize][week],
        }
    }

    pub fn num_weeks(&self) -> usize {
        self.num_weeks
    }

    /// Applies a [`PenaltyFilter`] to every probability in the table,
    /// in place. A no-op when the filter is disabled.
    pub fn apply_penalty(&mut self, filter: &PenaltyFilter) {
        if !filter.enabled {
            return;
        }
        for row in &mut self.probs {
            for p in row.iter_mut() {
                *p = filter.apply(*p);
            }
        }
    }

    /// Retains weeks `[k, W)`, mirroring [`Schedule::filter_weeks`].
    pub fn filter_weeks(&mut self, k: usize) -> CoreResult<()> {
        if k > self.num_weeks {
            return Err(CoreError::InvalidInput(format!(
                "week {k} out of range [0, {}]",
                self.num_weeks
            )));
        }
        for row in &mut self.probs {
            row.drain(0..k);
        }
        for row in &mut self.spreads {
            row.drain(0..k);
        }
        self.num_weeks -= k;
        Ok(())
    }
}
