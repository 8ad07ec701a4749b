use bankroll_core::model::action::Action;
use bankroll_core::model::participant::ParticipantId;
use std::collections::BTreeMap;

/// Append-only log of the actions inferred for each opponent.
///
/// Entries are created lazily on the first recorded action and never removed or rewritten.
#[derive(Debug, Clone, Default)]
pub struct OpponentHistory {
    entries: BTreeMap<ParticipantId, Vec<Action>>,
}

impl OpponentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, opponent: &ParticipantId, action: Action) {
        if let Some(actions) = self.entries.get_mut(opponent.as_str()) {
            actions.push(action);
            return;
        }
        self.entries.insert(opponent.clone(), vec![action]);
    }

    pub fn actions(&self, opponent: &str) -> &[Action] {
        self.entries
            .get(opponent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, opponent: &str, action: Action) -> bool {
        self.actions(opponent).contains(&action)
    }

    pub fn count(&self, opponent: &str, action: Action) -> usize {
        self.actions(opponent)
            .iter()
            .filter(|&&entry| entry == action)
            .count()
    }

    /// Share of the opponent's entries that are raises; `None` without any entries.
    pub fn raise_ratio(&self, opponent: &str) -> Option<f64> {
        let total = self.actions(opponent).len();
        if total == 0 {
            return None;
        }
        Some(self.count(opponent, Action::Raise) as f64 / total as f64)
    }

    pub fn is_aggressive(&self, opponent: &str, threshold: f64) -> bool {
        self.raise_ratio(opponent)
            .is_some_and(|ratio| ratio > threshold)
    }

    pub fn aggressive_opponents(&self, threshold: f64) -> impl Iterator<Item = &ParticipantId> {
        self.entries
            .keys()
            .filter(move |id| self.is_aggressive(id.as_str(), threshold))
    }

    pub fn any_aggressive(&self, threshold: f64) -> bool {
        self.aggressive_opponents(threshold).next().is_some()
    }

    /// Whether any opponent has been read as folding at least once.
    pub fn any_folded(&self) -> bool {
        self.entries
            .values()
            .flatten()
            .any(|&action| action == Action::Fold)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &[Action])> {
        self.entries
            .iter()
            .map(|(id, actions)| (id, actions.as_slice()))
    }

    pub fn tracks(&self, opponent: &str) -> bool {
        self.entries.contains_key(opponent)
    }

    pub fn opponent_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total_entries(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
