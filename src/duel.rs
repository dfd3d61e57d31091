use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::info;
use crate::error::Rejection;
use crate::member::MemberId;

pub const MAX_ROLL: u8 = 100;

const DUMB_THING: &str = "that dumb thing you just tried";

/// What the stats ledger needs to know about a finished duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelOutcome {
    pub initiator: MemberId,
    pub winner: MemberId,
}

/// A resolved `!roll`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Duel {
    /// Rolling against yourself is an automatic loss. Nothing is drawn and
    /// nothing is recorded.
    SelfChallenge { actor: MemberId },
    Contest {
        initiator: MemberId,
        opponent: MemberId,
        initiator_roll: u8,
        opponent_roll: u8,
    },
}

impl Duel {
    pub fn winner(&self) -> Option<&MemberId> {
        match self {
            Duel::SelfChallenge { .. } => None,
            Duel::Contest { initiator, opponent, initiator_roll, opponent_roll } => {
                if initiator_roll > opponent_roll {
                    Some(initiator)
                } else {
                    Some(opponent)
                }
            }
        }
    }

    /// Only genuine contests count towards stats.
    pub fn outcome(&self) -> Option<DuelOutcome> {
        match self {
            Duel::SelfChallenge { .. } => None,
            Duel::Contest { initiator, .. } => self.winner().map(|winner| DuelOutcome {
                initiator: initiator.clone(),
                winner: winner.clone(),
            }),
        }
    }

    pub fn announcement(&self) -> String {
        match self {
            Duel::SelfChallenge { actor } => format!(
                "{} tried to roll against themselves. _They lost._",
                actor.display_name()
            ),
            Duel::Contest { initiator, opponent, initiator_roll, opponent_roll } => {
                let c = initiator.display_name();
                let o = opponent.display_name();
                let winner = self.winner().map(MemberId::display_name).unwrap_or_default();
                format!(
                    "{c} fancies their chances against {o}!\n{c} rolls: {initiator_roll}\n{o} rolls: {opponent_roll}\n\n*{winner} is the winner!*"
                )
            }
        }
    }
}

/// Resolve `actor` rolling against the member named by the first of `args`.
/// Each side draws uniformly from `0..=100`; on a tie only the opponent redraws.
pub fn roll<R: Rng + ?Sized>(
    channel_members: Option<&[MemberId]>,
    actor: &MemberId,
    args: &[String],
    rng: &mut R,
) -> Result<Duel, Rejection> {
    roll_with(channel_members, actor, args, || rng.gen_range(0..=MAX_ROLL))
}

pub(crate) fn roll_with<F: FnMut() -> u8>(
    channel_members: Option<&[MemberId]>,
    actor: &MemberId,
    args: &[String],
    mut draw: F,
) -> Result<Duel, Rejection> {
    let members = channel_members.ok_or(Rejection::DuelInDirectMessage)?;

    let target = args
        .first()
        .map(|a| MemberId::new(a))
        .filter(|t| members.contains(t));

    let opponent = match target {
        Some(t) => t,
        None => {
            let joined = args.join(" ");
            let attempted = if args.len() > 1 || joined.is_empty() {
                DUMB_THING.to_string()
            } else {
                joined
            };
            return Err(Rejection::DuelTargetMissing { actor: actor.clone(), attempted });
        }
    };

    if &opponent == actor {
        info!(member = %actor, "self duel forfeited");
        return Ok(Duel::SelfChallenge { actor: opponent });
    }

    let initiator_roll = draw();
    let mut opponent_roll = draw();
    while opponent_roll == initiator_roll {
        opponent_roll = draw();
    }

    let duel = Duel::Contest {
        initiator: actor.clone(),
        opponent,
        initiator_roll,
        opponent_roll,
    };
    if let Some(winner) = duel.winner() {
        info!(initiator = %actor, winner = %winner, initiator_roll, opponent_roll, "duel resolved");
    }
    Ok(duel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(names: &[&str]) -> Vec<MemberId> {
        names.iter().map(|n| MemberId::new(n)).collect()
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tie_redraws_only_opponent() {
        let channel = members(&["mario", "luigi"]);
        let mut script = vec![50u8, 50, 50, 20].into_iter();
        let duel = roll_with(Some(&channel), &MemberId::new("mario"), &args(&["luigi"]), || {
            script.next().expect("script exhausted")
        }).unwrap();

        assert_eq!(duel, Duel::Contest {
            initiator: MemberId::new("mario"),
            opponent: MemberId::new("luigi"),
            initiator_roll: 50,
            opponent_roll: 20,
        });
        assert_eq!(duel.winner(), Some(&MemberId::new("mario")));
    }

    #[test]
    fn test_higher_opponent_roll_wins() {
        let channel = members(&["mario", "luigi"]);
        let mut script = vec![10u8, 99].into_iter();
        let duel = roll_with(Some(&channel), &MemberId::new("mario"), &args(&["luigi"]), || {
            script.next().expect("script exhausted")
        }).unwrap();
        assert_eq!(duel.outcome(), Some(DuelOutcome {
            initiator: MemberId::new("mario"),
            winner: MemberId::new("luigi"),
        }));
        assert_eq!(
            duel.announcement(),
            "Mario fancies their chances against Luigi!\nMario rolls: 10\nLuigi rolls: 99\n\n*Luigi is the winner!*"
        );
    }

    #[test]
    fn test_self_challenge_draws_nothing() {
        let channel = members(&["mario", "luigi"]);
        let duel = roll_with(Some(&channel), &MemberId::new("mario"), &args(&["Mario"]), || {
            panic!("no roll expected for a self challenge")
        }).unwrap();
        assert_eq!(duel, Duel::SelfChallenge { actor: MemberId::new("mario") });
        assert!(duel.outcome().is_none());
        assert!(duel.winner().is_none());
        assert_eq!(duel.announcement(), "Mario tried to roll against themselves. _They lost._");
    }
}
