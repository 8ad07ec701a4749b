pub mod action;
pub mod bank;
pub mod hand_rank;
pub mod participant;

/// Chip amounts: banks, bets and raise sizes.
pub type Chips = u64;
