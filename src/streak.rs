//! A candidate pick order: which team is picked in which week, with support
//! for "double-down" weeks that use more than one pick.

use rand::Rng;

use crate::errors::{CoreError, CoreResult};
use crate::prediction::Predictions;
use crate::team::TeamSlot;

/// One week's contribution to a streak's score.
#[derive(Debug, Clone)]
pub struct WeekScore {
    pub picks: Vec<TeamSlot>,
    pub probability: f64,
    pub spread: f64,
    pub cumulative_probability: f64,
    pub cumulative_spread: f64,
}

/// A full-season sequence of picks: `team_order` is flat, `picks_per_week`
/// says how many consecutive entries of `team_order` belong to each week
/// (normally 1, more for a double-down week).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streak {
    team_order: Vec<TeamSlot>,
    picks_per_week: Vec<usize>,
}

impl Streak {
    pub fn new(team_order: Vec<TeamSlot>, picks_per_week: Vec<usize>) -> CoreResult<Self> {
        let expected: usize = picks_per_week.iter().sum();
        if expected != team_order.len() {
            return Err(CoreError::InvalidInput(format!(
                "picks-per-week sums to {expected} but {} teams were given",
                team_order.len()
            )));
        }
        Ok(Streak { team_order, picks_per_week })
    }

    pub fn num_weeks(&self) -> usize {
        self.picks_per_week.len()
    }

    pub fn picks_per_week(&self) -> &[usize] {
        &self.picks_per_week
    }

    pub fn team_order(&self) -> &[TeamSlot] {
        &self.team_order
    }

    fn week_offset(&self, week: usize) -> usize {
        self.picks_per_week[..week].iter().sum()
    }

    /// The teams picked in a given week (usually one, more on a double-down
    /// week). A zero-pick week is a bye: it consumes no team, and this
    /// returns the singleton `[NONE]` rather than an empty slice.
    pub fn get_week(&self, week: usize) -> &[TeamSlot] {
        let len = self.picks_per_week[week];
        if len == 0 {
            return &[TeamSlot::Unused];
        }
        let start = self.week_offset(week);
        &self.team_order[start..start + len]
    }

    /// The position of `team` within `team_order`, if it appears.
    pub fn find_team(&self, team: TeamSlot) -> Option<usize> {
        self.team_order.iter().position(|&t| t == team)
    }

    /// Per-week probability, spread, and running cumulative totals.
    /// `week_offset` shifts the local week indices `0..num_weeks()` into the
    /// absolute weeks used by `predictions` — non-zero whenever the streak
    /// only covers the season's *remaining* weeks.
    pub fn accumulate(&self, predictions: &Predictions, week_offset: usize) -> Vec<WeekScore> {
        let mut cumulative_probability = 1.0;
        let mut cumulative_spread = 0.0;
        let mut out = Vec::with_capacity(self.picks_per_week.len());
        for week in 0..self.picks_per_week.len() {
            let picks = self.get_week(week).to_vec();
            let mut probability = 1.0;
            let mut spread = 0.0;
            for &team in &picks {
                probability *= predictions.get_probability(team, week_offset + week);
                spread += predictions.get_spread(team, week_offset + week);
            }
            cumulative_probability *= probability;
            cumulative_spread += spread;
            out.push(WeekScore {
                picks,
                probability,
                spread,
                cumulative_probability,
                cumulative_spread,
            });
        }
        out
    }

    /// The overall `(probability, spread)` for the whole streak — the last
    /// entry of [`Streak::accumulate`], or `(1.0, 0.0)` for an empty streak.
    pub fn summarize(&self, predictions: &Predictions, week_offset: usize) -> (f64, f64) {
        self.accumulate(predictions, week_offset)
            .last()
            .map(|w| (w.cumulative_probability, w.cumulative_spread))
            .unwrap_or((1.0, 0.0))
    }

    /// Returns a neighbor streak for simulated annealing: swaps two random
    /// positions in the pick order, and — when `also_picks_per_week` is set
    /// and there is more than one week — two random entries of the
    /// picks-per-week vector as well.
    pub fn perturbate(&self, rng: &mut impl Rng, also_picks_per_week: bool) -> Streak {
        let mut team_order = self.team_order.clone();
        if team_order.len() > 1 {
            let i = rng.random_range(0..team_order.len());
            let mut j = rng.random_range(0..team_order.len());
            while j == i {
                j = rng.random_range(0..team_order.len());
            }
            team_order.swap(i, j);
        }

        let mut picks_per_week = self.picks_per_week.clone();
        if also_picks_per_week && picks_per_week.len() > 1 {
            let i = rng.random_range(0..picks_per_week.len());
            let mut j = rng.random_range(0..picks_per_week.len());
            while j == i {
                j = rng.random_range(0..picks_per_week.len());
            }
            picks_per_week.swap(i, j);
        }

        Streak { team_order, picks_per_week }
    }
}
