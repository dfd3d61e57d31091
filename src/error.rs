use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use crate::game::Game;
use crate::member::{roster, MemberId};

/// A command that cannot be carried out in the current state. These are
/// answered in chat and leave the session untouched; `Display` is the exact
/// message the channel receives.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    DirectMessage,
    TargetedBot,
    MemberNotFound { actor: MemberId, game: Game, target: String },
    TooManyTargets { actor: MemberId, game: Game, capacity: usize },
    NoActiveChallenge { actor: MemberId },
    GameFull { actor: MemberId, participants: Vec<MemberId> },
    AlreadyJoined { actor: MemberId },
    NotInvited { actor: MemberId },
    NoSubstitute { actor: MemberId },
    DuelInDirectMessage,
    DuelTargetMissing { actor: MemberId, attempted: String },
}

impl Rejection {
    pub fn notification(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::DirectMessage | Rejection::TargetedBot => {
                write!(f, "Thanks, but I don't want to play right now.")
            }
            Rejection::MemberNotFound { actor, game, target } => write!(
                f,
                "{} wants a game of {}, but I can't find '{}' in this channel!",
                actor.display_name(), game, target
            ),
            Rejection::TooManyTargets { actor, game, capacity } => write!(
                f,
                "{} wants a game of {}, but only {} can play at once!",
                actor.display_name(), game, capacity
            ),
            Rejection::NoActiveChallenge { actor } => write!(
                f,
                "Sorry {}, nobody has been challenged yet!",
                actor.display_name()
            ),
            Rejection::GameFull { actor, participants } => write!(
                f,
                "Sorry {}, the game is full! Ask one of {} to drop out.",
                actor.display_name(), roster(participants)
            ),
            Rejection::AlreadyJoined { actor } => {
                write!(f, "{} is already in the game!", actor.display_name())
            }
            Rejection::NotInvited { actor } => write!(
                f,
                "{} has tried to drop out, but they weren't invited to play! Jerk!",
                actor.display_name()
            ),
            Rejection::NoSubstitute { actor } => write!(
                f,
                "{} wants to drop out, but there's nobody left to take their place!",
                actor.display_name()
            ),
            Rejection::DuelInDirectMessage => write!(f, "No thanks, that seems a bit pointless."),
            Rejection::DuelTargetMissing { actor, attempted } => write!(
                f,
                "Sorry {}, but {} is in another castle.",
                actor.display_name(), attempted
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// Failures talking to the counter store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter store backend failed: {0}")]
    Backend(String),

    #[error("counter store lock poisoned")]
    LockPoisoned,

    #[error("counter store does not support atomic increment")]
    Unsupported,
}

#[cfg(feature = "server")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("capacity must be at least 2, got {0}")]
    InvalidCapacity(usize),

    #[error("bot name must not be empty")]
    EmptyBotName,

    #[error("failed to read team table {}: {source}", path.display())]
    TeamsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid team table: {0}")]
    TeamsParse(#[from] serde_json::Error),

    #[error("team table has no leagues")]
    EmptyTeamTable,

    #[error("league '{0}' has no teams")]
    EmptyLeague(String),
}

/// Top-level error for the binaries.
#[derive(Debug, Error)]
pub enum KartbotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_display() {
        let mario = MemberId::new("mario");
        assert_eq!(
            Rejection::DirectMessage.to_string(),
            "Thanks, but I don't want to play right now."
        );
        assert_eq!(Rejection::TargetedBot.to_string(), Rejection::DirectMessage.to_string());
        assert_eq!(
            Rejection::MemberNotFound { actor: mario.clone(), game: Game::Kart, target: "waluigi".to_string() }.to_string(),
            "Mario wants a game of Kart, but I can't find 'waluigi' in this channel!"
        );
        assert_eq!(
            Rejection::GameFull {
                actor: mario.clone(),
                participants: vec![MemberId::new("luigi"), MemberId::new("peach")],
            }.to_string(),
            "Sorry Mario, the game is full! Ask one of Luigi, Peach to drop out."
        );
        assert_eq!(
            Rejection::NotInvited { actor: mario.clone() }.to_string(),
            "Mario has tried to drop out, but they weren't invited to play! Jerk!"
        );
        assert_eq!(
            Rejection::DuelTargetMissing { actor: mario, attempted: "the princess".to_string() }.to_string(),
            "Sorry Mario, but the princess is in another castle."
        );
        assert_eq!(
            Rejection::DuelInDirectMessage.notification(),
            "No thanks, that seems a bit pointless."
        );
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(ConfigError::InvalidCapacity(1).to_string(), "capacity must be at least 2, got 1");
        assert_eq!(ConfigError::EmptyLeague("MLS".to_string()).to_string(), "league 'MLS' has no teams");
    }
}
