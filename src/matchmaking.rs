use std::collections::HashSet;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};
use crate::error::{ConfigError, Rejection};
use crate::game::{FixtureProvider, Game};
use crate::member::{roster, MemberId};
use crate::session::ChallengeSession;

pub const DEFAULT_CAPACITY: usize = 4;

/// Result of a command that went through: the value it produced plus the
/// messages to post back to the channel, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub notifications: Vec<String>,
}

impl<T> Outcome<T> {
    fn new(value: T, notifications: Vec<String>) -> Self {
        Outcome { value, notifications }
    }
}

/// How a successful drop-out was settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Dropout {
    /// The challenger left and took the whole session with them.
    Cancelled { challenger: MemberId },
    Substituted { leaving: MemberId, replacement: MemberId },
}

/// Builds and mutates challenge sessions. Holds only the process-wide
/// settings; the session itself is owned by the caller.
#[derive(Debug, Clone)]
pub struct MatchmakingEngine {
    capacity: usize,
    bot: MemberId,
}

impl MatchmakingEngine {
    pub fn new(capacity: usize, bot: MemberId) -> Result<Self, ConfigError> {
        if capacity < 2 {
            return Err(ConfigError::InvalidCapacity(capacity));
        }
        if bot.as_str().is_empty() {
            return Err(ConfigError::EmptyBotName);
        }
        Ok(MatchmakingEngine { capacity, bot })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bot(&self) -> &MemberId {
        &self.bot
    }

    /// Start a new session, challenging either the named `targets` or, when
    /// none are named, a uniformly random subset of the channel.
    ///
    /// `channel_members` is `None` for direct messages. The returned session
    /// replaces whatever the caller held before.
    pub fn challenge<R: Rng>(
        &self,
        channel_members: Option<&[MemberId]>,
        actor: &MemberId,
        game: Game,
        targets: &[MemberId],
        fixtures: &dyn FixtureProvider,
        rng: &mut R,
    ) -> Result<Outcome<ChallengeSession>, Rejection> {
        let members = match channel_members {
            Some(m) if !m.is_empty() => m,
            _ => return Err(Rejection::DirectMessage),
        };
        if targets.contains(&self.bot) {
            return Err(Rejection::TargetedBot);
        }
        if let Some(missing) = targets.iter().find(|t| !members.contains(t)) {
            return Err(Rejection::MemberNotFound {
                actor: actor.clone(),
                game,
                target: missing.as_str().to_string(),
            });
        }

        let explicit = !targets.is_empty();
        let source = if explicit { targets } else { members };
        let mut pool: Vec<MemberId> = dedup(source)
            .into_iter()
            .filter(|m| m != actor && m != &self.bot)
            .collect();

        let slots = self.capacity - 1;
        if explicit {
            if pool.len() > slots {
                return Err(Rejection::TooManyTargets {
                    actor: actor.clone(),
                    game,
                    capacity: self.capacity,
                });
            }
        } else {
            // Dropping uniformly random entries until `slots` remain leaves a
            // uniformly random subset of that size.
            while pool.len() > slots {
                let idx = rng.gen_range(0..pool.len());
                pool.remove(idx);
            }
        }

        let fixture = if game.has_fixture() {
            Some(fixtures.random_fixture(rng))
        } else {
            None
        };

        let session = ChallengeSession::new(game, actor.clone(), pool, self.capacity, fixture);
        let challenged = &session.participants()[..session.len() - 1];

        let mut announcement = if challenged.is_empty() {
            format!("{} time! {} wants a game of {}!", game, actor.display_name(), game)
        } else {
            format!(
                "{} time! {} has challenged {} to a game of {}!",
                game, actor.display_name(), roster(challenged), game
            )
        };
        if session.room_left() > 0 {
            announcement.push_str(&format!(" Room for {} more!", session.room_left()));
        }

        let mut notifications = vec![announcement];
        if let Some(fixture) = session.fixture() {
            notifications.extend(fixture.announcements());
        }

        info!(
            game = %game,
            challenger = %actor,
            participants = session.len(),
            explicit,
            "challenge session created"
        );
        Ok(Outcome::new(session, notifications))
    }

    /// Add `actor` to the running session.
    pub fn join(
        &self,
        session: Option<&mut ChallengeSession>,
        actor: &MemberId,
    ) -> Result<Outcome<()>, Rejection> {
        let session = session.ok_or_else(|| Rejection::NoActiveChallenge { actor: actor.clone() })?;

        if session.is_full() {
            return Err(Rejection::GameFull {
                actor: actor.clone(),
                participants: session.participants().to_vec(),
            });
        }
        if session.contains(actor) {
            return Err(Rejection::AlreadyJoined { actor: actor.clone() });
        }

        session.push(actor.clone());
        debug!(member = %actor, participants = session.len(), "member joined session");

        Ok(Outcome::new((), vec![
            format!("{} has joined the game of {}!", actor.display_name(), session.game()),
            current_players(session),
        ]))
    }

    /// Describe who is currently challenged.
    pub fn list(&self, session: Option<&ChallengeSession>) -> Vec<String> {
        match session {
            Some(s) if !s.is_empty() => {
                vec![format!("{} are currently challenged!", roster(s.participants()))]
            }
            _ => vec![format!(
                "No challengers have challenged challengees! This makes {} sad :(",
                self.bot.as_str()
            )],
        }
    }

    /// Drop `actor` out of the session. The challenger leaving cancels the
    /// session (it is set to `None`); anyone else is replaced in place by a
    /// random channel member who is not already playing.
    pub fn reject<R: Rng>(
        &self,
        session: &mut Option<ChallengeSession>,
        channel_members: Option<&[MemberId]>,
        actor: &MemberId,
        rng: &mut R,
    ) -> Result<Outcome<Dropout>, Rejection> {
        let current = match session.as_mut() {
            Some(s) if s.contains(actor) => s,
            _ => return Err(Rejection::NotInvited { actor: actor.clone() }),
        };

        if current.is_challenger(actor) {
            *session = None;
            info!(challenger = %actor, "challenge session cancelled");
            return Ok(Outcome::new(
                Dropout::Cancelled { challenger: actor.clone() },
                vec![format!("{} dropped out, challenge has been cancelled!", actor.display_name())],
            ));
        }

        // Computed once so an exhausted channel is reported instead of redrawn forever.
        let eligible: Vec<MemberId> = dedup(channel_members.unwrap_or_default())
            .into_iter()
            .filter(|m| m != &self.bot && m != actor && !current.contains(m))
            .collect();

        let replacement = match eligible.choose(rng) {
            Some(r) => r.clone(),
            None => return Err(Rejection::NoSubstitute { actor: actor.clone() }),
        };

        current.substitute(actor, replacement.clone());
        info!(leaving = %actor, replacement = %replacement, "participant substituted");

        Ok(Outcome::new(
            Dropout::Substituted { leaving: actor.clone(), replacement: replacement.clone() },
            vec![
                format!(
                    "{} has dropped out! {} has been challenged in their place!",
                    actor.display_name(), replacement.display_name()
                ),
                current_players(current),
            ],
        ))
    }
}

fn current_players(session: &ChallengeSession) -> String {
    format!("Current players: {}", roster(session.participants()))
}

/// First occurrence wins.
fn dedup(members: &[MemberId]) -> Vec<MemberId> {
    let mut seen = HashSet::new();
    members
        .iter()
        .filter(|m| seen.insert(*m))
        .cloned()
        .collect()
}
