//! Per-contestant search over pick orders: an exhaustive enumerator for
//! small remaining-team counts, and a simulated-annealing search for when
//! the factorial search space is too large to enumerate in full.
//!
//! Both strategies report not just a single winner but a [`BestMap`]: the
//! best streak found for each distinct team that could be the contestant's
//! upcoming-week pick, so the caller can show "if you'd rather pick X
//! instead, here's your best streak starting with X" alongside the
//! overall recommendation.

pub mod annealing;
pub mod exhaustive;

use std::collections::HashMap;

use crate::cancel::CancellationToken;
use crate::contestant::Contestant;
use crate::errors::CoreError;
use crate::prediction::Predictions;
use crate::streak::Streak;
use crate::team::TeamSlot;

/// Lexicographic order on `(probability, spread)`, both maximized — this is
/// the ordering every search strategy in this module optimizes for.
fn better(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0 > b.0 || (a.0 == b.0 && a.1 > b.1)
}

/// Best streak found so far for each distinct team that headlines week 0,
/// keyed by that team. Updates are monotone: a candidate only overwrites an
/// existing entry when it is lexicographically better by `(probability,
/// spread)`, so folding several of these together (one per search worker)
/// in any order yields the same final map.
#[derive(Debug, Clone, Default)]
pub struct BestMap {
    entries: HashMap<TeamSlot, (Streak, f64, f64)>,
}

impl BestMap {
    pub fn new() -> Self {
        BestMap::default()
    }

    /// Folds in every candidate in `streak`'s week 0 (more than one, on a
    /// double-down week 0) at the given `(probability, spread)`.
    pub(crate) fn record(&mut self, streak: &Streak, probability: f64, spread: f64) {
        for &team in streak.get_week(0) {
            self.update(team, streak.clone(), probability, spread);
        }
    }

    /// Inserts or overwrites the entry for `team` if `(probability,
    /// spread)` is strictly better than what's already there.
    pub fn update(&mut self, team: TeamSlot, streak: Streak, probability: f64, spread: f64) {
        let is_better = match self.entries.get(&team) {
            None => true,
            Some(&(_, p, s)) => better((probability, spread), (p, s)),
        };
        if is_better {
            self.entries.insert(team, (streak, probability, spread));
        }
    }

    /// Merges `other` into `self`, keeping the better entry at each key.
    pub fn merge(&mut self, other: BestMap) {
        for (team, (streak, probability, spread)) in other.entries {
            self.update(team, streak, probability, spread);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted descending by `(probability, spread)` — the
    /// contestant's full list of "possible picks" for the upcoming week.
    pub fn ranked(&self) -> Vec<(TeamSlot, &Streak, f64, f64)> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(&team, (streak, p, s))| (team, streak, *p, *s))
            .collect();
        out.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap()
                .then_with(|| b.3.partial_cmp(&a.3).unwrap())
        });
        out
    }

    /// The single best entry, i.e. `ranked().first()`.
    pub fn best(&self) -> Option<(TeamSlot, &Streak, f64, f64)> {
        self.ranked().into_iter().next()
    }
}

/// The result of searching one contestant: the best streak found per
/// possible first-week team, plus how much of the search space was
/// actually examined.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_map: BestMap,
    pub examined: u128,
}

impl SearchOutcome {
    /// `true` when no positive-probability streak was found at all — the
    /// contestant is infeasible for the upcoming week, not a search
    /// failure.
    pub fn is_infeasible(&self) -> bool {
        self.best_map.is_empty()
    }
}

pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), CoreError> {
    if token.is_cancelled() {
        Err(CoreError::Cancelled)
    } else {
        Ok(())
    }
}

fn streak_from_order(order: &[crate::team::TeamId], picks_per_week: &[usize]) -> Streak {
    let team_order = order.iter().copied().map(TeamSlot::Real).collect();
    Streak::new(team_order, picks_per_week.to_vec())
        .expect("order and picks-per-week are drawn from the same contestant shape")
}

pub(crate) fn score(streak: &Streak, predictions: &Predictions, week_offset: usize) -> (f64, f64) {
    streak.summarize(predictions, week_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::TeamId;

    fn team(n: u32) -> TeamSlot {
        TeamSlot::Real(TeamId(n))
    }

    fn dummy_streak() -> Streak {
        Streak::new(vec![team(0)], vec![1]).unwrap()
    }

    #[test]
    fn update_keeps_the_lex_better_entry() {
        let mut map = BestMap::new();
        map.update(team(0), dummy_streak(), 0.5, 1.0);
        map.update(team(0), dummy_streak(), 0.4, 99.0);
        assert_eq!(map.best().unwrap().2, 0.5);

        map.update(team(0), dummy_streak(), 0.5, 2.0);
        assert_eq!(map.best().unwrap().3, 2.0);
    }

    #[test]
    fn merge_is_commutative_under_lex_order() {
        let mut a = BestMap::new();
        a.update(team(0), dummy_streak(), 0.9, 1.0);
        a.update(team(1), dummy_streak(), 0.3, 1.0);

        let mut b = BestMap::new();
        b.update(team(0), dummy_streak(), 0.6, 1.0);
        b.update(team(1), dummy_streak(), 0.7, 1.0);

        let mut merged_ab = a.clone();
        merged_ab.merge(b.clone());
        let mut merged_ba = b;
        merged_ba.merge(a);

        let ranked_ab = merged_ab.ranked();
        let ranked_ba = merged_ba.ranked();
        assert_eq!(ranked_ab.len(), ranked_ba.len());
        for (x, y) in ranked_ab.iter().zip(ranked_ba.iter()) {
            assert_eq!(x.0, y.0);
            assert_eq!(x.2, y.2);
        }
    }

    #[test]
    fn ranked_is_sorted_descending() {
        let mut map = BestMap::new();
        map.update(team(0), dummy_streak(), 0.2, 0.0);
        map.update(team(1), dummy_streak(), 0.9, 0.0);
        map.update(team(2), dummy_streak(), 0.5, 0.0);
        let ranked = map.ranked();
        assert_eq!(ranked[0].0, team(1));
        assert_eq!(ranked[1].0, team(2));
        assert_eq!(ranked[2].0, team(0));
    }
}
