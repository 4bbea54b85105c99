//! Team identifiers, the bye/unused sentinels, and the relative-location
//! vocabulary used to describe a matchup.

use std::collections::HashMap;
use std::fmt;

/// A compact integer handle for a team, indexing into the parallel arrays
/// kept by [`crate::schedule::Schedule`] and [`crate::prediction::Predictions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct TeamId(pub u32);

/// A team slot in a streak or a game: either a real team, the `BYE`
/// sentinel (a real bye week in the schedule, no opponent), or `NONE` (a
/// deliberately unused pick slot, treated as a certain loss unless the
/// slot itself is a bye week).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TeamSlot {
    Real(TeamId),
    Bye,
    Unused,
}

impl TeamSlot {
    pub fn is_real(&self) -> bool {
        matches!(self, TeamSlot::Real(_))
    }

    pub fn team_id(&self) -> Option<TeamId> {
        match self {
            TeamSlot::Real(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for TeamSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSlot::Real(id) => write!(f, "T{}", id.0),
            TeamSlot::Bye => write!(f, "BYE"),
            TeamSlot::Unused => write!(f, "----"),
        }
    }
}

/// Bidirectional lookup between team names and their compact [`TeamId`]s.
///
/// This is the arena referenced throughout the design notes: schedule rows,
/// rating lookups, and prediction-table rows are all indexed by `TeamId`
/// rather than by name, and this registry is the only place that knows the
/// name<->id mapping.
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    names: Vec<String>,
    by_name: HashMap<String, TeamId>,
}

impl TeamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a team by name, interning a new id if it hasn't been seen.
    pub fn intern(&mut self, name: &str) -> TeamId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = TeamId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<TeamId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: TeamId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        (0..self.names.len()).map(|i| TeamId(i as u32))
    }
}

/// Where a [`Game`] is being played, relative to one named side of it.
///
/// `Home` for team A is always `Away` for team B, and `Near`/`Far` are
/// likewise mirror images of one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RelativeLocation {
    Away,
    Far,
    Neutral,
    Near,
    Home,
}

impl RelativeLocation {
    /// The location as seen from the other side of the same game.
    pub fn negate(self) -> RelativeLocation {
        match self {
            RelativeLocation::Home => RelativeLocation::Away,
            RelativeLocation::Near => RelativeLocation::Far,
            RelativeLocation::Neutral => RelativeLocation::Neutral,
            RelativeLocation::Far => RelativeLocation::Near,
            RelativeLocation::Away => RelativeLocation::Home,
        }
    }
}

/// A matchup between two team slots, with the location recorded relative
/// to `team_a`.
///
/// Invariant: the location relative to `team_b` is always
/// `location.negate()` — there is no independent field for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    team_a: TeamSlot,
    team_b: TeamSlot,
    location: RelativeLocation,
}

impl Game {
    pub fn new(team_a: TeamSlot, team_b: TeamSlot, location_rel_a: RelativeLocation) -> Self {
        Game { team_a, team_b, location: location_rel_a }
    }

    pub fn bye(team: TeamSlot) -> Self {
        Game { team_a: team, team_b: TeamSlot::Bye, location: RelativeLocation::Neutral }
    }

    /// `side` 0 returns team A, `side` 1 returns team B.
    pub fn team(&self, side: usize) -> TeamSlot {
        match side {
            0 => self.team_a,
            1 => self.team_b,
            _ => panic!("side {side} is not a valid side of a game"),
        }
    }

    pub fn location_relative_to(&self, side: usize) -> RelativeLocation {
        match side {
            0 => self.location,
            1 => self.location.negate(),
            _ => panic!("side {side} is not a valid side of a game"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negate_is_involutive() {
        for loc in [
            RelativeLocation::Away,
            RelativeLocation::Far,
            RelativeLocation::Neutral,
            RelativeLocation::Near,
            RelativeLocation::Home,
        ] {
            assert_eq!(loc.negate().negate(), loc);
        }
    }

    #[test]
    fn home_negates_to_away() {
        assert_eq!(RelativeLocation::Home.negate(), RelativeLocation::Away);
        assert_eq!(RelativeLocation::Near.negate(), RelativeLocation::Far);
    }

    #[test]
    fn game_location_is_mirrored_across_sides() {
        let g = Game::new(TeamSlot::Unused, TeamSlot::Unused, RelativeLocation::Home);
        assert_eq!(g.location_relative_to(0), RelativeLocation::Home);
        assert_eq!(g.location_relative_to(1), RelativeLocation::Away);
    }

    #[test]
    fn registry_interns_consistently() {
        let mut reg = TeamRegistry::new();
        let a = reg.intern("Ohio State");
        let b = reg.intern("Michigan");
        let a2 = reg.intern("Ohio State");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(reg.name(a), "Ohio State");
        assert_eq!(reg.len(), 2);
    }
}
