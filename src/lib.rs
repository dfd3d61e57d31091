//! A chat bot that challenges channel members to games (Mario Kart, Fifa, Smash),
//! tracks who is in the current game, and settles `!roll` duels with a
//! persistent scoreboard.
//! ## Example usage
//! ```
//! use std::sync::Arc;
//! use kartbot::{
//!     ChannelContext, Coordinator, InboundMessage, MatchmakingEngine, MemberId,
//!     MemoryStatsStore, StaticDirectory, TeamTable,
//! };
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(async {
//!     let members = ["mario", "luigi", "peach"].iter().map(|n| MemberId::new(n)).collect();
//!     let coordinator = Coordinator::new(
//!         MatchmakingEngine::new(4, MemberId::new("kartbot")).unwrap(),
//!         Arc::new(StaticDirectory::with_channel("general", members)),
//!         Arc::new(TeamTable::bundled().unwrap()),
//!         Arc::new(MemoryStatsStore::new()),
//!         Some(1),
//!     );
//!
//!     let replies = coordinator.handle(&InboundMessage {
//!         channel: ChannelContext::Channel("general".to_string()),
//!         author: MemberId::new("mario"),
//!         author_is_bot: false,
//!         text: "!kart luigi".to_string(),
//!     }).await;
//!     assert_eq!(
//!         replies[0],
//!         "Kart time! Mario has challenged Luigi to a game of Kart! Room for 2 more!"
//!     );
//! });
//! ```

pub mod member;
pub mod game;
pub mod session;
pub mod error;
pub mod matchmaking;
pub mod duel;
pub mod stats;
pub mod directory;
pub mod command;
pub mod coordinator;
pub mod config;
pub mod logging;

#[cfg(feature = "server")]
pub mod sqlite_store;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use config::Config;
pub use coordinator::{Coordinator, InboundMessage};
pub use directory::{ChannelContext, MemberDirectory, StaticDirectory};
pub use duel::{Duel, DuelOutcome};
pub use error::{ConfigError, KartbotError, Rejection, StoreError};
pub use game::{Fixture, FixtureProvider, Game, LeagueTeam, TeamTable};
pub use matchmaking::{Dropout, MatchmakingEngine, Outcome};
pub use member::MemberId;
pub use session::{ChallengeSession, SessionState};
pub use stats::{MemberStats, MemoryStatsStore, StatsKey, StatsLedger, StatsStore};
