use crate::bot::{BotFeatures, BotParams, OpponentHistory};
use bankroll_core::model::action::Action;
use bankroll_core::model::bank::{BankRecord, BankSnapshot};
use bankroll_core::model::participant::ParticipantId;
use rand::Rng;
use tracing::{Level, event};

const AFTER_CALL: [Action; 3] = [Action::Call, Action::Raise, Action::Fold];
const UNKNOWN_OPPONENT: [Action; 3] = [Action::Check, Action::Raise, Action::Fold];

/// One opponent's bank movement and the label inferred from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub opponent: ParticipantId,
    /// Previous minus current balance; positive when chips were committed.
    pub delta: i64,
    pub inferred: Option<Action>,
}

/// Turns bank deltas into guessed opponent actions and owns the state that requires.
///
/// The history and previous snapshot are written only here; the policy reads them.
#[derive(Debug, Clone, Default)]
pub struct ActionInference {
    history: OpponentHistory,
    previous: BankSnapshot,
}

impl ActionInference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &OpponentHistory {
        &self.history
    }

    pub fn previous_snapshot(&self) -> &BankSnapshot {
        &self.previous
    }

    /// Run one observation cycle.
    ///
    /// `report` is `None` when the engine has no state to offer; the cycle is then skipped
    /// entirely and the previous snapshot is kept.
    pub fn observe<R>(
        &mut self,
        me: &ParticipantId,
        report: Option<&[BankRecord]>,
        own_strength: f64,
        params: &BotParams,
        features: BotFeatures,
        rng: &mut R,
    ) -> Vec<Observation>
    where
        R: Rng + ?Sized,
    {
        let Some(records) = report else {
            event!(
                target: "bankroll_bot::observe",
                Level::DEBUG,
                seat = %me,
                "bank report unavailable; skipping observation"
            );
            return Vec::new();
        };

        let current = BankSnapshot::from_records(records);
        let mut observations = Vec::with_capacity(current.len());

        for (opponent, _) in current.iter() {
            if opponent == me {
                continue;
            }
            let Some(delta) = current.delta_since(&self.previous, opponent.as_str()) else {
                continue;
            };

            let inferred = if delta > 0 {
                Some(infer_committed(
                    self.history.actions(opponent.as_str()),
                    own_strength,
                    params,
                    rng,
                ))
            } else if delta == 0 && features.zero_delta_inference() {
                Some(infer_unchanged(rng))
            } else {
                None
            };

            if let Some(action) = inferred {
                self.history.record(opponent, action);
            }

            event!(
                target: "bankroll_bot::observe",
                Level::DEBUG,
                seat = %me,
                opponent = %opponent,
                delta,
                inferred = ?inferred,
                recorded = self.history.actions(opponent.as_str()).len()
            );

            observations.push(Observation {
                opponent: opponent.clone(),
                delta,
                inferred,
            });
        }

        self.previous = current;
        observations
    }
}

/// Guess the action of an opponent whose balance went down, biased by what they did before.
pub fn infer_committed<R>(
    history: &[Action],
    own_strength: f64,
    params: &BotParams,
    rng: &mut R,
) -> Action
where
    R: Rng + ?Sized,
{
    if history.contains(&Action::Fold) {
        return Action::Fold;
    }

    if history.contains(&Action::Raise) {
        if rng.r#gen::<f64>() < params.raiser_call_probability {
            return Action::Call;
        }
        return if own_strength > params.counter_raise_strength {
            Action::Raise
        } else {
            Action::Fold
        };
    }

    if history.contains(&Action::Call) {
        return pick(&AFTER_CALL, rng);
    }

    pick(&UNKNOWN_OPPONENT, rng)
}

/// Guess for an unchanged balance: a check and a free fold look identical, so any label
/// may come out. Recorded labels are noisy as a result.
pub fn infer_unchanged<R>(rng: &mut R) -> Action
where
    R: Rng + ?Sized,
{
    pick(&Action::ALL, rng)
}

fn pick<R>(choices: &[Action], rng: &mut R) -> Action
where
    R: Rng + ?Sized,
{
    choices[rng.gen_range(0..choices.len())]
}
