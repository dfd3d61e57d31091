use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

/// A chat participant. Names are stored lower-cased, which is the form every
/// comparison in the bot works with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    pub fn new(name: &str) -> Self {
        MemberId(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name as shown in chat: first letter capitalised, the rest untouched.
    pub fn display_name(&self) -> String {
        capitalize(&self.0)
    }
}

impl FromStr for MemberId {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(());
        }
        Ok(MemberId::new(s))
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(name: &str) -> Self {
        MemberId::new(name)
    }
}

impl From<String> for MemberId {
    fn from(name: String) -> Self {
        MemberId::new(&name)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Comma-joined display names, e.g. `Alice, Bob`.
pub fn roster(members: &[MemberId]) -> String {
    members
        .iter()
        .map(MemberId::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}
