//! Per-team schedules: a length-W sequence of games, plus the external
//! cell grammar used to describe one team's week against another.

use crate::errors::{CoreError, CoreResult};
use crate::team::{Game, RelativeLocation, TeamId, TeamRegistry, TeamSlot};

/// A team's schedule for the season: `rows[team.0][week]` is that team's
/// game in that week, with the location already resolved relative to the
/// team whose row it is.
#[derive(Debug, Clone)]
pub struct Schedule {
    rows: Vec<Vec<Game>>,
    num_weeks: usize,
}

impl Schedule {
    /// Builds a schedule from, for each team, a row of `(opponent, location
    /// relative to this team)` pairs — already resolved team slots, not the
    /// external string grammar. Every row must have the same length.
    pub fn new(registry: &TeamRegistry, rows: Vec<Vec<(TeamSlot, RelativeLocation)>>) -> CoreResult<Self> {
        let num_weeks = rows.first().map(|r| r.len()).unwrap_or(0);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != num_weeks {
                return Err(CoreError::InvalidInput(format!(
                    "schedule row for team {} has length {}, expected {}",
                    registry.name(TeamId(i as u32)),
                    row.len(),
                    num_weeks
                )));
            }
        }
        let games = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let me = TeamSlot::Real(TeamId(i as u32));
                row.into_iter()
                    .map(|(opp, loc)| Game::new(me, opp, loc))
                    .collect()
            })
            .collect();
        Ok(Schedule { rows: games, num_weeks })
    }

    /// Parses one external schedule cell using the `@X`/`>X`/`<X`/`!X`/`X`/
    /// `BYE` grammar (location encoded relative to the row's own team).
    /// An empty string or the literal `BYE` denotes a bye week.
    pub fn parse_cell(registry: &mut TeamRegistry, cell: &str) -> (TeamSlot, RelativeLocation) {
        if cell.is_empty() || cell == "BYE" {
            return (TeamSlot::Bye, RelativeLocation::Neutral);
        }
        let (loc, rest) = match cell.as_bytes()[0] {
            b'@' => (RelativeLocation::Away, &cell[1..]),
            b'>' => (RelativeLocation::Far, &cell[1..]),
            b'<' => (RelativeLocation::Near, &cell[1..]),
            b'!' => (RelativeLocation::Neutral, &cell[1..]),
            _ => (RelativeLocation::Home, &cell[..]),
        };
        (TeamSlot::Real(registry.intern(rest)), loc)
    }

    pub fn get(&self, team: TeamId, week: usize) -> Game {
        self.rows[team.0 as usize][week]
    }

    pub fn num_weeks(&self) -> usize {
        self.num_weeks
    }

    pub fn num_teams(&self) -> usize {
        self.rows.len()
    }

    /// Retains weeks `[k, W)`, mutating in place. Idempotent for repeated
    /// calls with the same `k` relative to the *original* width only in the
    /// sense that applying it once is the contract; callers must apply the
    /// same filter to the matching predictions table so indices stay
    /// aligned (see [`crate::prediction::Predictions::filter_weeks`]).
    pub fn filter_weeks(&mut self, k: usize) -> CoreResult<()> {
        if k > self.num_weeks {
            return Err(CoreError::InvalidInput(format!(
                "week {k} out of range [0, {}]",
                self.num_weeks
            )));
        }
        for row in &mut self.rows {
            row.drain(0..k);
        }
        self.num_weeks -= k;
        Ok(())
    }
}
