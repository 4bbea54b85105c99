//! Serializable result types: the shape a completed search run is reported
//! in, independent of how it was computed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prediction::Predictions;
use crate::search::SearchOutcome;
use crate::streak::Streak;
use crate::team::{TeamRegistry, TeamSlot};

fn slot_name(registry: &TeamRegistry, slot: TeamSlot) -> String {
    match slot {
        TeamSlot::Real(id) => registry.name(id).to_string(),
        TeamSlot::Bye => "BYE".to_string(),
        TeamSlot::Unused => "NONE".to_string(),
    }
}

/// One team's pick in one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pick {
    pub selected: String,
    pub probability: f64,
    pub spread: f64,
}

/// A single week's picks, with the running cumulative totals through that
/// week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    pub season_week: usize,
    pub picks: Vec<Pick>,
    pub probability: f64,
    pub spread: f64,
    pub cumulative_probability: f64,
    pub cumulative_spread: f64,
}

/// A complete pick order for the rest of the season, with its overall
/// score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakOption {
    pub weeks: Vec<Week>,
    pub cumulative_probability: f64,
    pub cumulative_spread: f64,
}

fn streak_option(
    registry: &TeamRegistry,
    streak: &Streak,
    predictions: &Predictions,
    week_offset: usize,
) -> StreakOption {
    let scores = streak.accumulate(predictions, week_offset);
    let weeks = scores
        .iter()
        .enumerate()
        .map(|(i, w)| Week {
            season_week: week_offset + i,
            picks: w
                .picks
                .iter()
                .map(|&slot| Pick {
                    selected: slot_name(registry, slot),
                    probability: predictions.get_probability(slot, week_offset + i),
                    spread: predictions.get_spread(slot, week_offset + i),
                })
                .collect(),
            probability: w.probability,
            spread: w.spread,
            cumulative_probability: w.cumulative_probability,
            cumulative_spread: w.cumulative_spread,
        })
        .collect();
    let (cumulative_probability, cumulative_spread) = scores
        .last()
        .map(|w| (w.cumulative_probability, w.cumulative_spread))
        .unwrap_or((1.0, 0.0));
    StreakOption { weeks, cumulative_probability, cumulative_spread }
}

/// Everything reported back for one contestant after a search run: the
/// recommended pick for the upcoming week, the full ranked list of
/// alternative first-week picks (each with its own best complete streak),
/// and an echo of the inputs that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResults {
    pub player: String,
    pub starting_week: usize,
    pub calculation_start: DateTime<Utc>,
    pub calculation_end: DateTime<Utc>,
    pub remaining_teams: Vec<String>,
    pub has_double_down_remaining: bool,
    pub external_ref: Option<String>,
    /// The single best streak found, i.e. `possible_picks.first()`.
    pub best: Option<StreakOption>,
    /// Up to `top_n` ranked alternatives, one per distinct team that could
    /// headline the upcoming week, best first.
    pub possible_picks: Vec<StreakOption>,
    pub examined: u128,
}

impl PlayerResults {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        player: String,
        starting_week: usize,
        calculation_start: DateTime<Utc>,
        calculation_end: DateTime<Utc>,
        registry: &TeamRegistry,
        remaining_teams: &[crate::team::TeamId],
        has_double_down_remaining: bool,
        external_ref: Option<String>,
        predictions: &Predictions,
        outcome: &SearchOutcome,
        top_n: usize,
    ) -> Self {
        let ranked = outcome.best_map.ranked();
        let possible_picks: Vec<StreakOption> = ranked
            .into_iter()
            .take(top_n.max(1))
            .map(|(_, streak, _, _)| streak_option(registry, streak, predictions, starting_week))
            .collect();

        PlayerResults {
            player,
            starting_week,
            calculation_start,
            calculation_end,
            remaining_teams: remaining_teams.iter().map(|&id| registry.name(id).to_string()).collect(),
            has_double_down_remaining,
            external_ref,
            best: possible_picks.first().cloned(),
            possible_picks,
            examined: outcome.examined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contestant::Contestant;
    use crate::prediction::GaussianSpreadModel;
    use crate::schedule::Schedule;
    use crate::search::exhaustive;
    use crate::team::{RelativeLocation, TeamRegistry};
    use std::collections::HashMap;

    #[test]
    fn serializes_a_found_streak() {
        let mut reg = TeamRegistry::new();
        let a = reg.intern("A");
        let b = reg.intern("B");
        let mut ratings = HashMap::new();
        ratings.insert(a, 10.0);
        ratings.insert(b, -10.0);
        let model = GaussianSpreadModel::new(ratings, 10.0, 0.0, 0.0);
        let rows = vec![
            vec![(TeamSlot::Real(b), RelativeLocation::Home)],
            vec![(TeamSlot::Real(a), RelativeLocation::Away)],
        ];
        let schedule = Schedule::new(&reg, rows).unwrap();
        let predictions = Predictions::build(&reg, &schedule, &model);
        let contestant = Contestant::new("Alice", vec![a], vec![1], Some("ext-1".to_string())).unwrap();
        let outcome = exhaustive::search(&contestant, &predictions, 0, &crate::cancel::CancellationToken::new()).unwrap();

        let now = Utc::now();
        let results = PlayerResults::new(
            "Alice".to_string(),
            0,
            now,
            now,
            &reg,
            contestant.remaining_teams(),
            contestant.has_double_down_remaining(),
            contestant.external_ref.clone(),
            &predictions,
            &outcome,
            5,
        );

        assert_eq!(results.player, "Alice");
        assert!(results.best.is_some());
        assert_eq!(results.possible_picks.len(), 1);
        let json = serde_json::to_string(&results).unwrap();
        assert!(json.contains("\"player\":\"Alice\""));
    }
}
