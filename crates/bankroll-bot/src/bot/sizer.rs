use crate::bot::BotParams;
use bankroll_core::model::Chips;

/// Raise amount for the given minimum bet and round stage.
///
/// Stages 1 to 3 scale the minimum bet by their own multiplier; any other stage value falls
/// back to the default multiplier.
pub fn raise_amount(params: &BotParams, min_bet: Chips, stage: u32) -> Chips {
    let multiplier = match stage {
        1 => params.stage_multipliers[0],
        2 => params.stage_multipliers[1],
        3 => params.stage_multipliers[2],
        _ => params.default_multiplier,
    };
    min_bet.saturating_mul(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_grows_with_stage() {
        let params = BotParams::default();
        assert_eq!(raise_amount(&params, 10, 1), 20);
        assert_eq!(raise_amount(&params, 10, 2), 30);
        assert_eq!(raise_amount(&params, 10, 3), 40);
    }

    #[test]
    fn unknown_stage_uses_default_multiplier() {
        let params = BotParams::default();
        assert_eq!(raise_amount(&params, 10, 99), 20);
        assert_eq!(raise_amount(&params, 10, 0), 20);
        assert_eq!(raise_amount(&params, 10, 4), 20);
    }

    #[test]
    fn huge_min_bet_saturates() {
        let params = BotParams::default();
        assert_eq!(raise_amount(&params, Chips::MAX, 3), Chips::MAX);
    }
}
