use crate::bot::{ActionInference, BotFeatures, BotParams, Observation, OpponentHistory};
use crate::policy::{Decision, GuardedPolicy, Play, Policy, PolicyContext};
use bankroll_core::model::bank::BankSnapshot;
use bankroll_core::model::participant::ParticipantId;
use bankroll_core::table::{ActionExecutor, TableView};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};

/// A seat that models its opponents from bank movements and plays the guarded policy.
///
/// All state lives here and only changes inside [`BankrollAgent::take_turn`] (or an explicit
/// [`BankrollAgent::observe`]).
#[derive(Debug)]
pub struct BankrollAgent<R = SmallRng> {
    id: ParticipantId,
    params: BotParams,
    features: BotFeatures,
    inference: ActionInference,
    policy: GuardedPolicy,
    rng: R,
}

impl BankrollAgent<SmallRng> {
    /// Agent seeded from OS entropy with features read from the environment.
    pub fn new(id: impl Into<ParticipantId>) -> Self {
        Self::with_rng(
            id,
            BotParams::default(),
            BotFeatures::from_env(),
            SmallRng::from_entropy(),
        )
    }

    pub fn seeded(id: impl Into<ParticipantId>, seed: u64) -> Self {
        Self::with_rng(
            id,
            BotParams::default(),
            BotFeatures::default(),
            SmallRng::seed_from_u64(seed),
        )
    }
}

impl<R: Rng> BankrollAgent<R> {
    pub fn with_rng(
        id: impl Into<ParticipantId>,
        params: BotParams,
        features: BotFeatures,
        rng: R,
    ) -> Self {
        Self {
            id: id.into(),
            params,
            features,
            inference: ActionInference::new(),
            policy: GuardedPolicy::new(),
            rng,
        }
    }

    pub fn with_params(mut self, params: BotParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_features(mut self, features: BotFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }

    pub fn history(&self) -> &OpponentHistory {
        self.inference.history()
    }

    pub fn previous_snapshot(&self) -> &BankSnapshot {
        self.inference.previous_snapshot()
    }

    /// Update opponent history from the engine's current bank report.
    pub fn observe<V>(&mut self, view: &V) -> Vec<Observation>
    where
        V: TableView + ?Sized,
    {
        let report = view.player_banks();
        let strength = view.hand_rank().strength();
        self.inference.observe(
            &self.id,
            report.as_deref(),
            strength,
            &self.params,
            self.features,
            &mut self.rng,
        )
    }

    /// Pick a play from the current state and recorded history without touching the table.
    pub fn decide<V>(&self, view: &V) -> Decision
    where
        V: TableView + ?Sized,
    {
        let ctx = PolicyContext::from_view(
            &self.id,
            view,
            self.inference.history(),
            &self.params,
            self.features,
        );
        self.policy.decide(&ctx)
    }

    /// Observe, decide and send the chosen command to the table.
    pub fn take_turn<E>(&mut self, seat: &mut E) -> Decision
    where
        E: ActionExecutor + ?Sized,
    {
        let observations = self.observe(&*seat);
        event!(
            target: "bankroll_bot::turn",
            Level::DEBUG,
            seat = %self.id,
            observed = observations.len(),
            inferred = observations.iter().filter(|o| o.inferred.is_some()).count(),
            tracked = self.history().opponent_count()
        );

        let decision = self.decide(&*seat);
        match decision.play {
            Play::Fold => seat.fold(),
            Play::Check => seat.check(),
            Play::Call => seat.call(),
            Play::Raise(amount) => seat.raise(amount),
            Play::AllIn => seat.all_in(),
            Play::Idle => {}
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankroll_core::model::Chips;
    use bankroll_core::model::bank::BankRecord;
    use bankroll_core::model::hand_rank::HandRank;

    struct StaticTable {
        banks: Option<Vec<BankRecord>>,
        bet: Chips,
        bank: Chips,
        rank: HandRank,
    }

    impl TableView for StaticTable {
        fn player_banks(&self) -> Option<Vec<BankRecord>> {
            self.banks.clone()
        }
        fn table_bet(&self) -> Chips {
            self.bet
        }
        fn table_min_bet(&self) -> Chips {
            10
        }
        fn round_stage(&self) -> u32 {
            2
        }
        fn bank(&self) -> Chips {
            self.bank
        }
        fn hand_rank(&self) -> HandRank {
            self.rank
        }
    }

    #[test]
    fn decide_does_not_touch_history() {
        let agent = BankrollAgent::seeded("me", 7);
        let table = StaticTable {
            banks: Some(vec![BankRecord::new("alice", 100)]),
            bet: 0,
            bank: 100,
            rank: HandRank::OnePair,
        };
        let decision = agent.decide(&table);
        assert_eq!(decision.play, Play::Check);
        assert_eq!(agent.history().total_entries(), 0);
    }

    #[test]
    fn observe_uses_own_identity_for_exclusion() {
        let mut agent = BankrollAgent::seeded("me", 7);
        let table = StaticTable {
            banks: Some(vec![BankRecord::new("alice", 100), BankRecord::new("me", 90)]),
            bet: 0,
            bank: 90,
            rank: HandRank::OnePair,
        };
        let observations = agent.observe(&table);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].opponent.as_str(), "alice");
        assert!(!agent.history().tracks("me"));
        assert_eq!(agent.previous_snapshot().balance("me"), Some(90));
    }

    #[test]
    fn params_override_changes_sizing() {
        let params = BotParams {
            stage_multipliers: [5, 6, 7],
            ..BotParams::default()
        };
        let agent = BankrollAgent::seeded("me", 7).with_params(params);
        let table = StaticTable {
            banks: None,
            bet: 15,
            bank: 100,
            rank: HandRank::RoyalFlush,
        };
        assert_eq!(agent.decide(&table).play, Play::Raise(60));
    }
}
