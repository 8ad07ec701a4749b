use core::fmt;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Stable identity of a player for the lifetime of a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ParticipantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ParticipantId;
    use std::collections::BTreeMap;

    #[test]
    fn borrows_as_str_for_lookups() {
        let mut map = BTreeMap::new();
        map.insert(ParticipantId::from("alice"), 1u8);
        assert_eq!(map.get("alice"), Some(&1));
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&ParticipantId::new("bob")).expect("serialize");
        assert_eq!(json, "\"bob\"");
    }
}
