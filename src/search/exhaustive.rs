//! Exhaustive search: try every distinct arrangement of a contestant's
//! remaining teams *and* every distinct arrangement of their remaining
//! pick-type budget across the remaining weeks, keeping the best streak
//! found per possible upcoming-week pick.

use crate::cancel::CancellationToken;
use crate::contestant::Contestant;
use crate::errors::CoreResult;
use crate::prediction::Predictions;

use super::{check_cancelled, score, streak_from_order, BestMap, SearchOutcome};

/// Enumerates every distinct (team order, picks-per-week arrangement) pair
/// for `contestant` and records the best streak per first-week team. Cost
/// is `O(contestant.search_space_size())` — fine for the small
/// remaining-week counts typical late in a season, prohibitive early on
/// (see [`super::annealing`] for that regime).
pub fn search(
    contestant: &Contestant,
    predictions: &Predictions,
    week_offset: usize,
    token: &CancellationToken,
) -> CoreResult<SearchOutcome> {
    let mut best_map = BestMap::new();
    let mut examined: u128 = 0;

    for week_type_sequence in contestant.picks_per_week_order_iterator() {
        let picks_per_week = contestant.expand_picks_per_week(&week_type_sequence);
        for team_type_sequence in contestant.team_order_iterator() {
            check_cancelled(token)?;
            let order = contestant.expand_team_order(&team_type_sequence);
            let streak = streak_from_order(&order, &picks_per_week);
            let (probability, spread) = score(&streak, predictions, week_offset);
            examined += 1;
            if probability > 0.0 {
                best_map.record(&streak, probability, spread);
            }
        }
    }

    Ok(SearchOutcome { best_map, examined })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::{GaussianSpreadModel, Predictions};
    use crate::schedule::Schedule;
    use crate::team::{RelativeLocation, TeamRegistry, TeamSlot};
    use std::collections::HashMap;

    fn three_team_fixture() -> (TeamRegistry, Predictions) {
        let mut reg = TeamRegistry::new();
        let a = reg.intern("A");
        let b = reg.intern("B");
        let c = reg.intern("C");
        let mut ratings = HashMap::new();
        ratings.insert(a, 20.0);
        ratings.insert(b, 5.0);
        ratings.insert(c, -10.0);
        let model = GaussianSpreadModel::new(ratings, 10.0, 0.0, 0.0);

        // Each team plays a weak, unused-team game every week so every
        // pick is feasible regardless of order.
        let rows = vec![
            vec![(TeamSlot::Unused, RelativeLocation::Neutral); 2],
            vec![(TeamSlot::Unused, RelativeLocation::Neutral); 2],
            vec![(TeamSlot::Unused, RelativeLocation::Neutral); 2],
        ];
        let schedule = Schedule::new(&reg, rows).unwrap();
        let predictions = Predictions::build(&reg, &schedule, &model);
        (reg, predictions)
    }

    #[test]
    fn finds_best_order_by_trying_them_all() {
        let (reg, predictions) = three_team_fixture();
        let a = reg.get("A").unwrap();
        let b = reg.get("B").unwrap();
        let c = reg.get("C").unwrap();
        let contestant = Contestant::new("Solo", vec![a, b, c], vec![1, 1, 1], None).unwrap();

        let outcome = search(&contestant, &predictions, 0, &CancellationToken::new()).unwrap();
        // All three picks-per-week entries are equal (single-pick weeks),
        // so only the 3! team orders are distinct.
        assert_eq!(outcome.examined, 6);
        assert!(!outcome.is_infeasible());
        // Against unused opponents every week, order doesn't change the
        // cumulative probability (each pick is a certain win either way).
        let (_, _, probability, _) = outcome.best_map.best().unwrap();
        assert!((probability - 1.0).abs() < 1e-9);
    }

    #[test]
    fn infeasible_when_every_pick_is_a_bye() {
        let mut reg = TeamRegistry::new();
        let a = reg.intern("A");
        let model = GaussianSpreadModel::new(HashMap::new(), 10.0, 0.0, 0.0);
        let rows = vec![vec![(crate::team::TeamSlot::Bye, RelativeLocation::Neutral)]];
        let schedule = Schedule::new(&reg, rows).unwrap();
        let predictions = Predictions::build(&reg, &schedule, &model);
        let contestant = Contestant::new("Solo", vec![a], vec![1], None).unwrap();

        let outcome = search(&contestant, &predictions, 0, &CancellationToken::new()).unwrap();
        assert!(outcome.is_infeasible());
    }

    #[test]
    fn explores_both_team_orders_and_pick_type_arrangements() {
        // A double-down week (pick two of {A, B, C}) vs a single-pick week
        // (pick the remaining team alone): the search must try all three
        // choices of who sits out the double-down, not just the team order
        // within a single fixed week shape.
        let mut reg = TeamRegistry::new();
        let a = reg.intern("A");
        let b = reg.intern("B");
        let c = reg.intern("C");
        let mut ratings = HashMap::new();
        ratings.insert(a, 10.0);
        ratings.insert(b, 9.0);
        ratings.insert(c, -50.0);
        let model = GaussianSpreadModel::new(ratings, 10.0, 0.0, 0.0);
        let rows = vec![
            vec![(TeamSlot::Unused, RelativeLocation::Neutral); 2],
            vec![(TeamSlot::Unused, RelativeLocation::Neutral); 2],
        ];
        let schedule = Schedule::new(&reg, rows).unwrap();
        let predictions = Predictions::build(&reg, &schedule, &model);
        // picks_per_week [1, 2] means: one single-pick week, one
        // double-down week, but *which* remaining week is which is part
        // of the search space.
        let contestant = Contestant::new("Solo", vec![a, b, c], vec![1, 2], None).unwrap();
        assert_eq!(contestant.num_picks_per_week_orders(), 2);

        let outcome = search(&contestant, &predictions, 0, &CancellationToken::new()).unwrap();
        assert_eq!(outcome.examined, contestant.search_space_size());
        assert!(!outcome.is_infeasible());
    }
}
