//! Loads a season fixture (ratings, schedule, contestants) from a JSON file
//! at the program boundary, translating the external shape into the core
//! types the search engine actually works with.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::contestant::Contestant;
use crate::errors::{CoreError, CoreResult};
use crate::prediction::GaussianSpreadModel;
use crate::schedule::Schedule;
use crate::team::TeamRegistry;

#[derive(Debug, Deserialize)]
struct FixtureFile {
    teams: HashMap<String, f64>,
    std_dev: f64,
    #[serde(default)]
    home_bias: f64,
    #[serde(default)]
    close_bias: f64,
    /// Team name -> one cell per week, in the `@X`/`>X`/`<X`/`!X`/`X`/`BYE`
    /// grammar (see [`Schedule::parse_cell`]).
    schedule: HashMap<String, Vec<String>>,
    contestants: Vec<ContestantFixture>,
}

#[derive(Debug, Deserialize)]
struct ContestantFixture {
    name: String,
    remaining_teams: Vec<String>,
    picks_per_week: Vec<usize>,
    #[serde(default)]
    external_ref: Option<String>,
}

/// Everything a run needs to start searching: the team arena, the
/// prediction model, the resolved schedule, and the contestant roster.
pub struct Fixture {
    pub registry: TeamRegistry,
    pub model: GaussianSpreadModel,
    pub schedule: Schedule,
    pub contestants: Vec<Contestant>,
}

/// Reads and parses a fixture file from `path`.
pub fn load(path: &Path) -> CoreResult<Fixture> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CoreError::InvalidInput(format!("reading fixture {}: {e}", path.display())))?;
    let raw: FixtureFile = serde_json::from_str(&text)
        .map_err(|e| CoreError::InvalidInput(format!("parsing fixture {}: {e}", path.display())))?;
    build(raw)
}

fn build(raw: FixtureFile) -> CoreResult<Fixture> {
    let mut registry = TeamRegistry::new();
    let mut ratings = HashMap::new();
    for (name, rating) in &raw.teams {
        let id = registry.intern(name);
        ratings.insert(id, *rating);
    }

    let num_teams = registry.len();
    let mut rows: Vec<Option<Vec<(crate::team::TeamSlot, crate::team::RelativeLocation)>>> =
        (0..num_teams).map(|_| None).collect();
    for (name, cells) in &raw.schedule {
        let id = registry.get(name).ok_or_else(|| {
            CoreError::InvalidInput(format!("schedule entry for unknown team \"{name}\""))
        })?;
        let row = cells.iter().map(|cell| Schedule::parse_cell(&mut registry, cell)).collect();
        rows[id.0 as usize] = Some(row);
    }
    // `registry` may have grown (opponents named only in schedule cells),
    // so pad with empty rows before the final length check catches it as a
    // missing rating instead of a panic.
    while rows.len() < registry.len() {
        rows.push(None);
    }
    let rows: Vec<_> = rows
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            r.ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "team \"{}\" has no schedule entry",
                    registry.name(crate::team::TeamId(i as u32))
                ))
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let schedule = Schedule::new(&registry, rows)?;
    let model = GaussianSpreadModel::new(ratings, raw.std_dev, raw.home_bias, raw.close_bias);
    model.validate(&registry, &schedule)?;

    let mut contestants = Vec::with_capacity(raw.contestants.len());
    for c in raw.contestants {
        let team_ids = c
            .remaining_teams
            .iter()
            .map(|name| {
                registry
                    .get(name)
                    .ok_or_else(|| CoreError::InvalidInput(format!("contestant \"{}\" references unknown team \"{name}\"", c.name)))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        contestants.push(Contestant::new(c.name, team_ids, c.picks_per_week, c.external_ref)?);
    }

    Ok(Fixture { registry, model, schedule, contestants })
}
