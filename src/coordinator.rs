use std::sync::{Arc, Mutex};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};
use crate::command::{greeting, help, Command};
use crate::directory::{ChannelContext, MemberDirectory};
use crate::duel;
use crate::game::FixtureProvider;
use crate::matchmaking::MatchmakingEngine;
use crate::member::MemberId;
use crate::session::ChallengeSession;
use crate::stats::{StatsLedger, StatsStore};

/// A chat message as delivered by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub channel: ChannelContext,
    pub author: MemberId,
    #[serde(default)]
    pub author_is_bot: bool,
    pub text: String,
}

/// Owns the one live challenge session and runs commands against it one at
/// a time. The session lock is held for the whole command, stats write
/// included, so no two commands interleave.
pub struct Coordinator {
    engine: MatchmakingEngine,
    directory: Arc<dyn MemberDirectory>,
    fixtures: Arc<dyn FixtureProvider>,
    ledger: StatsLedger,
    session: tokio::sync::Mutex<Option<ChallengeSession>>,
    rng: Mutex<StdRng>,
}

impl Coordinator {
    pub fn new(
        engine: MatchmakingEngine,
        directory: Arc<dyn MemberDirectory>,
        fixtures: Arc<dyn FixtureProvider>,
        store: Arc<dyn StatsStore>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Coordinator {
            engine,
            directory,
            fixtures,
            ledger: StatsLedger::new(store),
            session: tokio::sync::Mutex::new(None),
            rng: Mutex::new(rng),
        }
    }

    pub fn engine(&self) -> &MatchmakingEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &StatsLedger {
        &self.ledger
    }

    /// Copy of the live session, if any.
    pub async fn session(&self) -> Option<ChallengeSession> {
        self.session.lock().await.clone()
    }

    /// Parse and run one message. Messages from bots and chatter that is not
    /// a command produce nothing.
    pub async fn handle(&self, message: &InboundMessage) -> Vec<String> {
        if message.author_is_bot {
            return Vec::new();
        }
        match Command::parse(&message.text, self.engine.bot()) {
            Some(command) => self.dispatch(&message.channel, &message.author, command).await,
            None => Vec::new(),
        }
    }

    pub async fn dispatch(
        &self,
        channel: &ChannelContext,
        actor: &MemberId,
        command: Command,
    ) -> Vec<String> {
        let mut session = self.session.lock().await;
        debug!(command = command.name(), actor = %actor, channel = %channel, "dispatching command");

        let members = self.directory.list_eligible_members(channel);
        let members = members.as_deref();

        match command {
            Command::Greeting => vec![self.with_rng(|rng| greeting(actor, rng))],
            Command::Help => help(actor),
            Command::List => self.engine.list(session.as_ref()),
            Command::Challenge { game, targets } => {
                let result = self.with_rng(|rng| {
                    self.engine.challenge(members, actor, game, &targets, self.fixtures.as_ref(), rng)
                });
                match result {
                    Ok(outcome) => {
                        *session = Some(outcome.value);
                        outcome.notifications
                    }
                    Err(rejection) => {
                        debug!(?rejection, "challenge rejected");
                        vec![rejection.notification()]
                    }
                }
            }
            Command::Join => match self.engine.join(session.as_mut(), actor) {
                Ok(outcome) => outcome.notifications,
                Err(rejection) => {
                    debug!(?rejection, "join rejected");
                    vec![rejection.notification()]
                }
            },
            Command::Reject => {
                let result = self.with_rng(|rng| self.engine.reject(&mut *session, members, actor, rng));
                match result {
                    Ok(outcome) => outcome.notifications,
                    Err(rejection) => {
                        debug!(?rejection, "drop out rejected");
                        vec![rejection.notification()]
                    }
                }
            }
            Command::Roll { args } => {
                let result = self.with_rng(|rng| duel::roll(members, actor, &args, rng));
                match result {
                    Ok(resolved) => {
                        let notifications = vec![resolved.announcement()];
                        if let Some(outcome) = resolved.outcome() {
                            // The duel has already been announced; a failed
                            // write only costs the scoreboard.
                            if let Err(err) = self.ledger.record_duel(&outcome).await {
                                warn!(error = %err, initiator = %outcome.initiator, winner = %outcome.winner, "failed to record duel");
                            }
                        }
                        notifications
                    }
                    Err(rejection) => vec![rejection.notification()],
                }
            }
            Command::Stats { target } => {
                let member = target.unwrap_or_else(|| actor.clone());
                match self.ledger.get_stats(&member).await {
                    Ok(stats) => vec![stats.summary(&member)],
                    Err(err) => {
                        warn!(error = %err, member = %member, "failed to read stats");
                        vec!["I can't reach the scoreboard right now, try again later.".to_string()]
                    }
                }
            }
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic mid-draw leaves the generator usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}
