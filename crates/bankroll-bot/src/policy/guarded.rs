use super::{Decision, Guard, Play, Policy, PolicyContext};
use crate::bot::raise_amount;
use bankroll_core::model::hand_rank::HandRank;
use tracing::{Level, event};

/// Priority-ordered guard list; the first guard that holds picks the play.
///
/// Stateless: every input comes from the [`PolicyContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardedPolicy;

impl GuardedPolicy {
    pub fn new() -> Self {
        Self
    }

    fn evaluate(ctx: &PolicyContext) -> Decision {
        let params = ctx.params;

        if should_fold(ctx) {
            return Decision::new(Guard::Fold, Play::Fold);
        }

        if !ctx.bet_active {
            return Decision::new(Guard::Check, Play::Check);
        }

        if ctx.bet_below(params.call_bank_fraction) {
            return Decision::new(Guard::Call, Play::Call);
        }

        if ctx.hand_rank >= HandRank::TwoPair && ctx.bet_exceeds(params.defend_bank_fraction) {
            let play = if should_raise(ctx) {
                raise_play(ctx)
            } else {
                Play::Call
            };
            return Decision::new(Guard::DefendStrongHand, play);
        }

        if should_raise(ctx) {
            return Decision::new(Guard::Raise, raise_play(ctx));
        }

        if ctx.strength() > params.all_in_strength || ctx.bluff_opportunity() {
            return Decision::new(Guard::AllIn, Play::AllIn);
        }

        Decision::idle()
    }
}

impl Policy for GuardedPolicy {
    fn decide(&self, ctx: &PolicyContext) -> Decision {
        let decision = Self::evaluate(ctx);
        log_decision(ctx, &decision);
        decision
    }
}

fn should_fold(ctx: &PolicyContext) -> bool {
    let params = ctx.params;
    if ctx.opponents_aggressive() && ctx.bet_exceeds(params.aggressive_fold_bank_fraction) {
        return true;
    }
    ctx.bet_exceeds(params.fold_bank_fraction)
}

fn should_raise(ctx: &PolicyContext) -> bool {
    let params = ctx.params;
    let strength = ctx.strength();
    if ctx.opponents_aggressive() && strength > params.aggressive_raise_strength {
        return true;
    }
    strength > params.raise_strength
}

fn raise_play(ctx: &PolicyContext) -> Play {
    Play::Raise(raise_amount(ctx.params, ctx.min_bet, ctx.round_stage))
}

fn log_decision(ctx: &PolicyContext, decision: &Decision) {
    if decision.is_idle() {
        event!(
            target: "bankroll_bot::decide",
            Level::WARN,
            seat = %ctx.seat,
            table_bet = ctx.table_bet,
            bank = ctx.bank,
            hand_rank = %ctx.hand_rank,
            "no guard fired; turn is idle"
        );
    }

    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let guard = decision
        .guard
        .map(|guard| guard.to_string())
        .unwrap_or_else(|| "none".to_string());
    let action = decision
        .play
        .action()
        .map(|action| action.to_string())
        .unwrap_or_else(|| "IDLE".to_string());

    event!(
        target: "bankroll_bot::decide",
        Level::INFO,
        seat = %ctx.seat,
        guard = %guard,
        action = %action,
        raise = ?decision.play.raise_amount(),
        table_bet = ctx.table_bet,
        bank = ctx.bank,
        stage = ctx.round_stage,
        strength = ctx.strength(),
        aggressive = ctx.opponents_aggressive(),
        bluff = ctx.bluff_opportunity()
    );

    if ctx.features.decision_details() {
        for (opponent, actions) in ctx.history.iter() {
            let preview = actions
                .iter()
                .map(|action| action.to_string())
                .collect::<Vec<_>>()
                .join(",");
            event!(
                target: "bankroll_bot::decide",
                Level::INFO,
                seat = %ctx.seat,
                opponent = %opponent,
                raise_ratio = ?ctx.history.raise_ratio(opponent.as_str()),
                history = %preview
            );
        }
    }
}
