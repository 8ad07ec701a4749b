//! Boundary between a betting agent and the engine that hosts it.
//!
//! The engine owns rules, pot accounting and hand evaluation. An agent only reads the
//! current betting state through [`TableView`] and answers through [`ActionExecutor`].

use crate::model::Chips;
use crate::model::bank::BankRecord;
use crate::model::hand_rank::HandRank;

/// Read-only betting state for the seat whose turn it is.
pub trait TableView {
    /// Per-participant balances, one record each. `None` when the engine has no state to report.
    fn player_banks(&self) -> Option<Vec<BankRecord>>;

    /// Outstanding amount this seat must match to stay in the round.
    fn table_bet(&self) -> Chips;

    fn table_min_bet(&self) -> Chips;

    /// Betting round ordinal, starting at 1.
    fn round_stage(&self) -> u32;

    /// This seat's own balance.
    fn bank(&self) -> Chips;

    fn hand_rank(&self) -> HandRank;

    fn is_bet_active(&self) -> bool {
        self.table_bet() > 0
    }
}

/// Commands an agent issues on its turn. At most one is invoked per turn.
pub trait ActionExecutor: TableView {
    fn fold(&mut self);
    fn check(&mut self);
    fn call(&mut self);
    fn raise(&mut self, amount: Chips);
    fn all_in(&mut self);
}
