use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use serde::{Serialize, Deserialize};
use tracing::debug;
use crate::member::MemberId;

/// Where a message came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ChannelContext {
    Channel(String),
    Direct,
}

impl fmt::Display for ChannelContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChannelContext::Channel(id) => write!(f, "#{}", id),
            ChannelContext::Direct => write!(f, "direct message"),
        }
    }
}

/// Who can be challenged in a channel. Returns `None` for direct messages,
/// which have no member list.
pub trait MemberDirectory: Send + Sync {
    fn list_eligible_members(&self, channel: &ChannelContext) -> Option<Vec<MemberId>>;
}

/// Rosters kept in memory, filled in by whatever transport knows the channel.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    rosters: RwLock<HashMap<String, Vec<MemberId>>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        StaticDirectory::default()
    }

    pub fn with_channel(channel: &str, members: Vec<MemberId>) -> Self {
        let directory = StaticDirectory::new();
        directory.set_members(channel, members);
        directory
    }

    pub fn set_members(&self, channel: &str, members: Vec<MemberId>) {
        debug!(channel, members = members.len(), "channel roster updated");
        // A poisoned lock still holds a usable map.
        let mut rosters = self.rosters.write().unwrap_or_else(|e| e.into_inner());
        rosters.insert(channel.to_string(), members);
    }

    pub fn channels(&self) -> Vec<String> {
        let rosters = self.rosters.read().unwrap_or_else(|e| e.into_inner());
        let mut channels: Vec<String> = rosters.keys().cloned().collect();
        channels.sort();
        channels
    }
}

impl MemberDirectory for StaticDirectory {
    fn list_eligible_members(&self, channel: &ChannelContext) -> Option<Vec<MemberId>> {
        match channel {
            ChannelContext::Direct => None,
            ChannelContext::Channel(id) => {
                let rosters = self.rosters.read().unwrap_or_else(|e| e.into_inner());
                Some(rosters.get(id).cloned().unwrap_or_default())
            }
        }
    }
}
