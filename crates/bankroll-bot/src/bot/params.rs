use serde::Deserialize;

/// Tunable thresholds for opponent inference and the turn policy.
///
/// Bet thresholds are fractions of the agent's own bank; strength thresholds compare
/// against normalized hand strength in `[0, 1]`. The defaults are the stock agent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BotParams {
    // === Turn policy ===
    /// Fold when the bet exceeds this share of the bank (default: 0.25)
    pub fold_bank_fraction: f64,

    /// Fold at this lower share when some opponent is consistently aggressive (default: 0.10)
    pub aggressive_fold_bank_fraction: f64,

    /// Call when the bet is below this share of the bank (default: 0.10)
    pub call_bank_fraction: f64,

    /// Defend two pair or better once the bet exceeds this share (default: 0.20)
    pub defend_bank_fraction: f64,

    /// Raise above this strength (default: 0.7)
    pub raise_strength: f64,

    /// Raise above this strength against an aggressive table (default: 0.6)
    pub aggressive_raise_strength: f64,

    /// Go all-in above this strength (default: 0.85)
    pub all_in_strength: f64,

    /// Raise entries above this share of a history mark the opponent aggressive (default: 0.5)
    pub aggression_ratio: f64,

    // === Inference ===
    /// Chance a known raiser who committed chips is read as calling (default: 0.7)
    pub raiser_call_probability: f64,

    /// Own strength above which a known raiser is read as re-raising, not folding (default: 0.6)
    pub counter_raise_strength: f64,

    // === Raise sizing ===
    /// Min-bet multipliers for stages 1, 2 and 3 (default: [2, 3, 4])
    pub stage_multipliers: [u64; 3],

    /// Multiplier for any other stage (default: 2)
    pub default_multiplier: u64,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            fold_bank_fraction: 0.25,
            aggressive_fold_bank_fraction: 0.10,
            call_bank_fraction: 0.10,
            defend_bank_fraction: 0.20,
            raise_strength: 0.7,
            aggressive_raise_strength: 0.6,
            all_in_strength: 0.85,
            aggression_ratio: 0.5,
            raiser_call_probability: 0.7,
            counter_raise_strength: 0.6,
            stage_multipliers: [2, 3, 4],
            default_multiplier: 2,
        }
    }
}
