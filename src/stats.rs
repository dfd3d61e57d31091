use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use tracing::debug;
use crate::duel::DuelOutcome;
use crate::error::StoreError;
use crate::member::MemberId;

/// Value a missing counter is treated as before it is incremented, so the
/// first recorded event stores 2. Kept for compatibility with existing
/// scoreboards.
pub const ABSENT_COUNTER_BASE: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    Challenges,
    Wins,
}

impl CounterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CounterKind::Challenges => "challenges",
            CounterKind::Wins => "wins",
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatsKey {
    pub member: MemberId,
    pub kind: CounterKind,
}

impl StatsKey {
    pub fn challenges(member: &MemberId) -> Self {
        StatsKey { member: member.clone(), kind: CounterKind::Challenges }
    }

    pub fn wins(member: &MemberId) -> Self {
        StatsKey { member: member.clone(), kind: CounterKind::Wins }
    }
}

/// Persistent per-member counters.
///
/// `get_counter`/`set_counter` are the minimum contract. Stores that can add
/// one atomically should also override `supports_atomic_increment` and
/// `increment`; the ledger prefers that path because a separate read and
/// write can lose updates when two duels land on the same key.
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn get_counter(&self, key: &StatsKey) -> Result<Option<u64>, StoreError>;

    async fn set_counter(&self, key: &StatsKey, value: u64) -> Result<(), StoreError>;

    fn supports_atomic_increment(&self) -> bool {
        false
    }

    /// Add one to the counter, treating a missing counter as `absent_base`.
    /// Returns the stored value.
    async fn increment(&self, _key: &StatsKey, _absent_base: u64) -> Result<u64, StoreError> {
        Err(StoreError::Unsupported)
    }
}

/// In-process counters. Built with or without atomic increment so both
/// ledger paths can run against it.
#[derive(Debug)]
pub struct MemoryStatsStore {
    counters: Mutex<HashMap<StatsKey, u64>>,
    atomic: bool,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        MemoryStatsStore {
            counters: Mutex::new(HashMap::new()),
            atomic: true,
        }
    }

    /// A store that only offers get/set, like a plain key-value service.
    pub fn without_atomic_increment() -> Self {
        MemoryStatsStore {
            counters: Mutex::new(HashMap::new()),
            atomic: false,
        }
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn get_counter(&self, key: &StatsKey) -> Result<Option<u64>, StoreError> {
        let counters = self.counters.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(counters.get(key).copied())
    }

    async fn set_counter(&self, key: &StatsKey, value: u64) -> Result<(), StoreError> {
        let mut counters = self.counters.lock().map_err(|_| StoreError::LockPoisoned)?;
        counters.insert(key.clone(), value);
        Ok(())
    }

    fn supports_atomic_increment(&self) -> bool {
        self.atomic
    }

    async fn increment(&self, key: &StatsKey, absent_base: u64) -> Result<u64, StoreError> {
        if !self.atomic {
            return Err(StoreError::Unsupported);
        }
        let mut counters = self.counters.lock().map_err(|_| StoreError::LockPoisoned)?;
        let value = counters.entry(key.clone()).or_insert(absent_base);
        *value += 1;
        Ok(*value)
    }
}

impl Default for MemoryStatsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Both counters for one member, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemberStats {
    pub challenges: Option<u64>,
    pub wins: Option<u64>,
}

impl MemberStats {
    pub fn summary(&self, member: &MemberId) -> String {
        fn count(value: Option<u64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_else(|| "no".to_string())
        }
        format!(
            "{} has {} challenges and {} wins on record.",
            member.display_name(), count(self.challenges), count(self.wins)
        )
    }
}

/// Turns duel outcomes into counter updates.
#[derive(Clone)]
pub struct StatsLedger {
    store: Arc<dyn StatsStore>,
}

impl StatsLedger {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        StatsLedger { store }
    }

    /// Bump the initiator's challenge count and the winner's win count.
    /// The two updates are independent: a failure on the first does not stop
    /// the second, and nothing is rolled back. The first error is returned.
    pub async fn record_duel(&self, outcome: &DuelOutcome) -> Result<(), StoreError> {
        let challenges = self.bump(&StatsKey::challenges(&outcome.initiator)).await;
        let wins = self.bump(&StatsKey::wins(&outcome.winner)).await;
        challenges.and(wins).map(|_| ())
    }

    pub async fn get_stats(&self, member: &MemberId) -> Result<MemberStats, StoreError> {
        Ok(MemberStats {
            challenges: self.store.get_counter(&StatsKey::challenges(member)).await?,
            wins: self.store.get_counter(&StatsKey::wins(member)).await?,
        })
    }

    async fn bump(&self, key: &StatsKey) -> Result<u64, StoreError> {
        if self.store.supports_atomic_increment() {
            let value = self.store.increment(key, ABSENT_COUNTER_BASE).await?;
            debug!(member = %key.member, kind = %key.kind, value, "counter incremented");
            return Ok(value);
        }

        // Read-then-write: a concurrent bump of the same key between these two
        // calls is overwritten.
        let current = self.store.get_counter(key).await?.unwrap_or(ABSENT_COUNTER_BASE);
        let value = current + 1;
        self.store.set_counter(key, value).await?;
        debug!(member = %key.member, kind = %key.kind, value, "counter written");
        Ok(value)
    }
}
