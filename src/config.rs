use std::net::SocketAddr;
use std::path::PathBuf;
use clap::{ArgAction, Parser};
use crate::error::ConfigError;
use crate::game::TeamTable;
use crate::matchmaking::{MatchmakingEngine, DEFAULT_CAPACITY};
use crate::member::MemberId;

/// Process-wide settings, fixed at startup.
#[derive(Parser, Debug, Clone)]
#[command(name = "kartbot", version, about = "Challenge your channel to games and keep score")]
pub struct Config {
    /// Most players a challenge can hold, challenger included.
    #[arg(long, default_value_t = DEFAULT_CAPACITY, env = "KARTBOT_CAPACITY")]
    pub capacity: usize,

    /// The bot's own chat name; never challenged or substituted in.
    #[arg(long, default_value = "kartbot", env = "KARTBOT_BOT_NAME")]
    pub bot_name: String,

    /// League/team table for Fifa challenges. The bundled table is used when omitted.
    #[arg(long, env = "KARTBOT_TEAMS")]
    pub teams: Option<PathBuf>,

    /// Seed for every random draw, for reproducible runs.
    #[arg(long, env = "KARTBOT_SEED")]
    pub seed: Option<u64>,

    /// SQLite database for the stats counters (server only). In-memory when omitted.
    #[arg(long, env = "KARTBOT_DB")]
    pub db: Option<PathBuf>,

    /// Listen address (server only).
    #[arg(long, default_value = "0.0.0.0:3000", env = "KARTBOT_BIND")]
    pub bind: SocketAddr,

    /// Comma-separated roster of the console channel.
    #[arg(long, value_delimiter = ',', env = "KARTBOT_MEMBERS")]
    pub members: Vec<String>,

    /// Name of the console channel.
    #[arg(long, default_value = "general")]
    pub channel: String,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < 2 {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }
        if self.bot_name.trim().is_empty() {
            return Err(ConfigError::EmptyBotName);
        }
        Ok(())
    }

    pub fn bot(&self) -> MemberId {
        MemberId::new(&self.bot_name)
    }

    pub fn engine(&self) -> Result<MatchmakingEngine, ConfigError> {
        self.validate()?;
        MatchmakingEngine::new(self.capacity, self.bot())
    }

    pub fn team_table(&self) -> Result<TeamTable, ConfigError> {
        match &self.teams {
            Some(path) => TeamTable::from_path(path),
            None => TeamTable::bundled(),
        }
    }

    /// Console roster, blanks dropped.
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members
            .iter()
            .filter_map(|m| m.parse::<MemberId>().ok())
            .collect()
    }
}
