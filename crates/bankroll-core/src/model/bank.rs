use crate::model::Chips;
use crate::model::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of the engine's per-turn bank report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRecord {
    pub participant: ParticipantId,
    pub balance: Chips,
}

impl BankRecord {
    pub fn new(participant: impl Into<ParticipantId>, balance: Chips) -> Self {
        Self {
            participant: participant.into(),
            balance,
        }
    }
}

/// Consolidated participant → balance view for a single turn.
///
/// Ordered by identity so that anything iterating it (and drawing random numbers per entry)
/// behaves the same across runs with the same seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSnapshot {
    balances: BTreeMap<ParticipantId, Chips>,
}

impl BankSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten the engine's report. A repeated identity keeps its last balance.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a BankRecord>,
    {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(record.participant.clone(), record.balance);
        }
        snapshot
    }

    pub fn insert(&mut self, participant: ParticipantId, balance: Chips) {
        self.balances.insert(participant, balance);
    }

    pub fn balance(&self, participant: &str) -> Option<Chips> {
        self.balances.get(participant).copied()
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.balances.contains_key(participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Chips)> {
        self.balances.iter().map(|(id, balance)| (id, *balance))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Signed chip movement since `previous`: positive when the balance shrank.
    ///
    /// A participant missing from `previous` is treated as unchanged. Movements beyond the
    /// `i64` range saturate, keeping their sign.
    pub fn delta_since(&self, previous: &BankSnapshot, participant: &str) -> Option<i64> {
        let current = self.balance(participant)?;
        let before = previous.balance(participant).unwrap_or(current);
        let delta = if before >= current {
            i64::try_from(before - current).unwrap_or(i64::MAX)
        } else {
            i64::try_from(current - before).map_or(i64::MIN, |gain| -gain)
        };
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_records_into_one_mapping() {
        let records = vec![BankRecord::new("alice", 100), BankRecord::new("bob", 80)];
        let snapshot = BankSnapshot::from_records(&records);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.balance("alice"), Some(100));
        assert_eq!(snapshot.balance("bob"), Some(80));
        assert_eq!(snapshot.balance("carol"), None);
    }

    #[test]
    fn later_records_overwrite_earlier_ones() {
        let records = vec![
            BankRecord::new("alice", 100),
            BankRecord::new("bob", 80),
            BankRecord::new("alice", 40),
        ];
        let snapshot = BankSnapshot::from_records(&records);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.balance("alice"), Some(40));
    }

    #[test]
    fn delta_keeps_its_sign_near_the_top_of_the_range() {
        let mut previous = BankSnapshot::new();
        let mut current = BankSnapshot::new();

        previous.insert("grew".into(), 0);
        current.insert("grew".into(), Chips::MAX);
        previous.insert("spent".into(), 1 << 63);
        current.insert("spent".into(), 1);
        previous.insert("emptied".into(), Chips::MAX);
        current.insert("emptied".into(), 0);
        previous.insert("edge".into(), Chips::MAX);
        current.insert("edge".into(), Chips::MAX - 5);

        assert_eq!(current.delta_since(&previous, "grew"), Some(i64::MIN));
        assert_eq!(current.delta_since(&previous, "spent"), Some(i64::MAX));
        assert_eq!(current.delta_since(&previous, "emptied"), Some(i64::MAX));
        assert_eq!(current.delta_since(&previous, "edge"), Some(5));
    }

    #[test]
    fn empty_report_yields_empty_snapshot() {
        let snapshot = BankSnapshot::from_records(&Vec::new());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn iterates_in_identity_order() {
        let records = vec![
            BankRecord::new("zed", 1),
            BankRecord::new("amy", 2),
            BankRecord::new("max", 3),
        ];
        let snapshot = BankSnapshot::from_records(&records);
        let names: Vec<&str> = snapshot.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(names, vec!["amy", "max", "zed"]);
    }

    #[test]
    fn delta_is_signed_and_defaults_to_zero_on_first_sighting() {
        let previous = BankSnapshot::from_records(&[
            BankRecord::new("alice", 100),
            BankRecord::new("bob", 50),
        ]);
        let current = BankSnapshot::from_records(&[
            BankRecord::new("alice", 70),
            BankRecord::new("bob", 90),
            BankRecord::new("carol", 10),
        ]);
        assert_eq!(current.delta_since(&previous, "alice"), Some(30));
        assert_eq!(current.delta_since(&previous, "bob"), Some(-40));
        assert_eq!(current.delta_since(&previous, "carol"), Some(0));
        assert_eq!(current.delta_since(&previous, "dave"), None);
    }
}
