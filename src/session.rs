use serde::{Serialize, Deserialize};
use crate::game::{Fixture, Game};
use crate::member::MemberId;

/// Where the coordinator's single session currently stands. Never stored:
/// always derived from the held `Option<ChallengeSession>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    Open,
    Full,
    /// Reported once, when the challenger drops out. The session is gone afterwards.
    Cancelled,
}

impl SessionState {
    pub fn of(session: Option<&ChallengeSession>) -> SessionState {
        match session {
            None => SessionState::Empty,
            Some(s) if s.is_full() => SessionState::Full,
            Some(_) => SessionState::Open,
        }
    }
}

/// The group of members currently challenged to a game.
///
/// Participants are unique. Right after creation the challenger is the last
/// participant; members who `join` later are appended after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSession {
    game: Game,
    challenger: MemberId,
    participants: Vec<MemberId>,
    capacity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixture: Option<Fixture>,
}

impl ChallengeSession {
    /// `challenged` must already be free of duplicates and of the challenger.
    pub(crate) fn new(
        game: Game,
        challenger: MemberId,
        challenged: Vec<MemberId>,
        capacity: usize,
        fixture: Option<Fixture>,
    ) -> Self {
        let mut participants = challenged;
        participants.push(challenger.clone());
        ChallengeSession {
            game,
            challenger,
            participants,
            capacity,
            fixture,
        }
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn challenger(&self) -> &MemberId {
        &self.challenger
    }

    pub fn participants(&self) -> &[MemberId] {
        &self.participants
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn fixture(&self) -> Option<&Fixture> {
        self.fixture.as_ref()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.capacity
    }

    pub fn room_left(&self) -> usize {
        self.capacity.saturating_sub(self.participants.len())
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.participants.contains(member)
    }

    pub fn is_challenger(&self, member: &MemberId) -> bool {
        &self.challenger == member
    }

    pub fn state(&self) -> SessionState {
        SessionState::of(Some(self))
    }

    pub(crate) fn push(&mut self, member: MemberId) {
        self.participants.push(member);
    }

    /// Swap `leaving` for `replacement` in place. Returns false if `leaving`
    /// is not a participant.
    pub(crate) fn substitute(&mut self, leaving: &MemberId, replacement: MemberId) -> bool {
        match self.participants.iter().position(|p| p == leaving) {
            Some(idx) => {
                self.participants[idx] = replacement;
                true
            }
            None => false,
        }
    }
}
