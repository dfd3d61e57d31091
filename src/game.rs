use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use rand::{Rng, RngCore};
use serde::{Serialize, Deserialize};
use crate::error::ConfigError;

const BUNDLED_TEAMS: &str = include_str!("../data/teams.json");

/// The games the bot knows how to organise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Game {
    Kart,
    Fifa,
    Smash,
}

impl Game {
    pub const ALL: [Game; 3] = [Game::Kart, Game::Fifa, Game::Smash];

    /// Whether a session for this game gets a fixture drawn at creation.
    pub fn has_fixture(self) -> bool {
        matches!(self, Game::Fifa)
    }
}

impl FromStr for Game {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kart" => Ok(Game::Kart),
            "fifa" => Ok(Game::Fifa),
            "smash" => Ok(Game::Smash),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Game::Kart => write!(f, "Kart"),
            Game::Fifa => write!(f, "Fifa"),
            Game::Smash => write!(f, "Smash"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTeam {
    pub league: String,
    pub team: String,
}

/// Home and away sides for a Fifa session. The two draws are independent and
/// may land on the same league or even the same team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: LeagueTeam,
    pub away: LeagueTeam,
}

impl Fixture {
    pub fn announcements(&self) -> Vec<String> {
        vec![
            format!("The leagues are: {} and {}", self.home.league, self.away.league),
            format!("The teams are: {} vs. {}", self.home.team, self.away.team),
        ]
    }
}

/// Source of random fixtures for the Fifa variant.
pub trait FixtureProvider: Send + Sync {
    fn random_fixture(&self, rng: &mut dyn RngCore) -> Fixture;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TeamEntry {
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct League {
    name: String,
    teams: Vec<TeamEntry>,
}

/// Static league/team table, read from JSON shaped like
/// `{ "leagues": [ { "name": "...", "teams": [ { "name": "..." } ] } ] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamTable {
    leagues: Vec<League>,
}

impl TeamTable {
    /// The table shipped with the crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json(BUNDLED_TEAMS)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::TeamsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let table: TeamTable = serde_json::from_str(raw)?;
        if table.leagues.is_empty() {
            return Err(ConfigError::EmptyTeamTable);
        }
        if let Some(league) = table.leagues.iter().find(|l| l.teams.is_empty()) {
            return Err(ConfigError::EmptyLeague(league.name.clone()));
        }
        Ok(table)
    }

    pub fn league_count(&self) -> usize {
        self.leagues.len()
    }

    fn draw(&self, rng: &mut dyn RngCore) -> LeagueTeam {
        // from_json guarantees at least one league with at least one team
        let league = &self.leagues[rng.gen_range(0..self.leagues.len())];
        let team = &league.teams[rng.gen_range(0..league.teams.len())];
        LeagueTeam { league: league.name.clone(), team: team.name.clone() }
    }
}

impl FixtureProvider for TeamTable {
    fn random_fixture(&self, rng: &mut dyn RngCore) -> Fixture {
        let home = self.draw(rng);
        let away = self.draw(rng);
        Fixture { home, away }
    }
}
