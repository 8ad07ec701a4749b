mod guarded;

pub use guarded::GuardedPolicy;

use crate::bot::{BotFeatures, BotParams, OpponentHistory};
use bankroll_core::model::Chips;
use bankroll_core::model::action::Action;
use bankroll_core::model::hand_rank::HandRank;
use bankroll_core::model::participant::ParticipantId;
use bankroll_core::table::TableView;
use core::fmt;

/// Context provided to policies for decision-making
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub seat: &'a ParticipantId,
    pub table_bet: Chips,
    pub min_bet: Chips,
    pub round_stage: u32,
    pub bank: Chips,
    pub bet_active: bool,
    pub hand_rank: HandRank,
    pub history: &'a OpponentHistory,
    pub params: &'a BotParams,
    pub features: BotFeatures,
}

impl<'a> PolicyContext<'a> {
    pub fn from_view<V>(
        seat: &'a ParticipantId,
        view: &V,
        history: &'a OpponentHistory,
        params: &'a BotParams,
        features: BotFeatures,
    ) -> Self
    where
        V: TableView + ?Sized,
    {
        Self {
            seat,
            table_bet: view.table_bet(),
            min_bet: view.table_min_bet(),
            round_stage: view.round_stage(),
            bank: view.bank(),
            bet_active: view.is_bet_active(),
            hand_rank: view.hand_rank(),
            history,
            params,
            features,
        }
    }

    pub fn strength(&self) -> f64 {
        self.hand_rank.strength()
    }

    /// Whether the outstanding bet is more than `fraction` of the own bank.
    pub fn bet_exceeds(&self, fraction: f64) -> bool {
        self.table_bet as f64 > self.bank as f64 * fraction
    }

    pub fn bet_below(&self, fraction: f64) -> bool {
        (self.table_bet as f64) < self.bank as f64 * fraction
    }

    pub fn opponents_aggressive(&self) -> bool {
        self.history.any_aggressive(self.params.aggression_ratio)
    }

    /// Some opponent has been read as folding, which makes a shove look profitable.
    pub fn bluff_opportunity(&self) -> bool {
        self.history.any_folded()
    }
}

/// The rule that produced a decision, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Fold,
    Check,
    Call,
    DefendStrongHand,
    Raise,
    AllIn,
}

impl Guard {
    pub const ORDERED: [Guard; 6] = [
        Guard::Fold,
        Guard::Check,
        Guard::Call,
        Guard::DefendStrongHand,
        Guard::Raise,
        Guard::AllIn,
    ];
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Guard::Fold => "fold",
            Guard::Check => "check",
            Guard::Call => "call",
            Guard::DefendStrongHand => "defend_strong_hand",
            Guard::Raise => "raise",
            Guard::AllIn => "all_in",
        };
        f.write_str(label)
    }
}

/// Command chosen for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Play {
    Fold,
    Check,
    Call,
    Raise(Chips),
    AllIn,
    /// No guard fired; nothing is sent to the table.
    Idle,
}

impl Play {
    pub const fn action(self) -> Option<Action> {
        match self {
            Play::Fold => Some(Action::Fold),
            Play::Check => Some(Action::Check),
            Play::Call => Some(Action::Call),
            Play::Raise(_) => Some(Action::Raise),
            Play::AllIn => Some(Action::AllIn),
            Play::Idle => None,
        }
    }

    pub const fn raise_amount(self) -> Option<Chips> {
        match self {
            Play::Raise(amount) => Some(amount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub guard: Option<Guard>,
    pub play: Play,
}

impl Decision {
    pub const fn new(guard: Guard, play: Play) -> Self {
        Self {
            guard: Some(guard),
            play,
        }
    }

    pub const fn idle() -> Self {
        Self {
            guard: None,
            play: Play::Idle,
        }
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self.play, Play::Idle)
    }
}

/// Unified interface for turn policies
pub trait Policy: Send {
    fn decide(&self, ctx: &PolicyContext) -> Decision;
}
