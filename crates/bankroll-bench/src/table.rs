use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bankroll_bot::{BotFeatures, Play};
use bankroll_core::model::Chips;
use bankroll_core::model::action::Action;
use bankroll_core::model::bank::BankRecord;
use bankroll_core::model::hand_rank::HandRank;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SeatKind, SimulationConfig, TableConfig};
use crate::seats::{SeatBlueprint, SeatError, SeatPlayer, TurnSeat};

/// Primary entry point for running a configured simulation.
pub struct TableRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
    seats: Vec<SeatBlueprint>,
    logging_enabled: bool,
    bot_features: BotFeatures,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub hands_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub final_banks: Vec<BankRecord>,
}

impl TableRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let seats = SeatBlueprint::from_configs(&config.seats)?;
        let mut bot_features = BotFeatures::from_env();
        if config.logging.decision_details {
            bot_features = bot_features.with_decision_details(true);
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            seats,
            bot_features,
        })
    }

    /// Play the configured hands, streaming one JSONL row per hand to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut table = Table::new(&self.config.table, &self.seats, self.bot_features);
        let mut rows_written = 0usize;

        for _ in 0..self.config.table.hands {
            let Some(row) = table.play_hand() else {
                event!(
                    target: "bankroll_bench::table",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    hands_played = table.hands_played() as u64,
                    "fewer than two seats hold chips; stopping early"
                );
                break;
            };

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "bankroll_bench::hand",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    hand_index = row.hand_index as u64,
                    pot = row.pot,
                    winners = %row.winners.join(",")
                );
            }

            serde_json::to_writer(&mut writer, &HandLogRow::new(&self.config.run_id, &row))?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }

        writer.flush()?;

        Ok(RunSummary {
            hands_played: table.hands_played(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            telemetry_path: self
                .logging_enabled
                .then(|| self.outputs.telemetry.clone()),
            final_banks: table.banks(),
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Seated players, their banks and the dealing RNG for one run.
pub struct Table {
    rules: TableConfig,
    names: Vec<String>,
    kinds: Vec<SeatKind>,
    players: Vec<SeatPlayer>,
    banks: Vec<Chips>,
    rng: StdRng,
    hands_played: usize,
}

impl Table {
    pub fn new(rules: &TableConfig, seats: &[SeatBlueprint], features: BotFeatures) -> Self {
        let mut rng = StdRng::seed_from_u64(rules.seed.unwrap_or(0));
        let players = seats
            .iter()
            .map(|seat| seat.spawn(rng.next_u64(), features))
            .collect();

        Self {
            rules: rules.clone(),
            names: seats.iter().map(|seat| seat.name.clone()).collect(),
            kinds: seats.iter().map(|seat| seat.kind).collect(),
            players,
            banks: vec![rules.starting_bank; seats.len()],
            rng,
            hands_played: 0,
        }
    }

    pub fn hands_played(&self) -> usize {
        self.hands_played
    }

    pub fn banks(&self) -> Vec<BankRecord> {
        self.names
            .iter()
            .zip(&self.banks)
            .map(|(name, bank)| BankRecord::new(name.as_str(), *bank))
            .collect()
    }

    pub fn seats_with_chips(&self) -> usize {
        self.banks.iter().filter(|bank| **bank > 0).count()
    }

    /// Deal and play one hand. `None` once fewer than two seats can be dealt in.
    pub fn play_hand(&mut self) -> Option<HandRow> {
        if self.seats_with_chips() < 2 {
            return None;
        }

        let seat_count = self.players.len();
        let mut ranks = Vec::with_capacity(seat_count);
        for bank in &self.banks {
            ranks.push((*bank > 0).then(|| deal_rank(&mut self.rng)));
        }

        let mut in_hand: Vec<bool> = ranks.iter().map(Option::is_some).collect();
        let mut paid = vec![0 as Chips; seat_count];
        let mut turns: Vec<Vec<TurnRecord>> = vec![Vec::new(); seat_count];
        let mut pot: Chips = 0;

        'stages: for stage in 1..=self.rules.stages {
            let mut stage_bet: Chips = 0;
            let mut stage_paid = vec![0 as Chips; seat_count];

            for seat in 0..seat_count {
                if live_seats(&in_hand) < 2 {
                    break 'stages;
                }
                let Some(rank) = ranks[seat] else {
                    continue;
                };
                if !in_hand[seat] || self.banks[seat] == 0 {
                    continue;
                }

                let owed = stage_bet.saturating_sub(stage_paid[seat]);
                let mut turn = TurnSeat::new(
                    self.banks(),
                    owed,
                    self.rules.min_bet,
                    stage,
                    self.banks[seat],
                    rank,
                );
                self.players[seat].act(&mut turn);
                let play = turn.play();

                let cost = match play {
                    Play::Fold => {
                        in_hand[seat] = false;
                        0
                    }
                    Play::Check | Play::Idle => {
                        if owed > 0 {
                            in_hand[seat] = false;
                        }
                        0
                    }
                    Play::Call => owed.min(self.banks[seat]),
                    Play::Raise(amount) => owed.saturating_add(amount).min(self.banks[seat]),
                    Play::AllIn => self.banks[seat],
                };

                self.banks[seat] -= cost;
                stage_paid[seat] += cost;
                paid[seat] += cost;
                pot += cost;
                stage_bet = stage_bet.max(stage_paid[seat]);

                turns[seat].push(TurnRecord {
                    stage,
                    action: play.action(),
                    raise: play.raise_amount(),
                    owed,
                    paid: cost,
                });
            }
        }

        let winners = showdown(&ranks, &in_hand);
        let won = split_pot(pot, &winners, seat_count);
        for (bank, amount) in self.banks.iter_mut().zip(&won) {
            *bank += amount;
        }

        let hand_index = self.hands_played;
        self.hands_played += 1;

        let seats = (0..seat_count)
            .map(|seat| SeatRow {
                seat: self.names[seat].clone(),
                kind: self.kinds[seat],
                rank: ranks[seat],
                folded: ranks[seat].is_some() && !in_hand[seat],
                paid: paid[seat],
                won: won[seat],
                bank: self.banks[seat],
                turns: std::mem::take(&mut turns[seat]),
            })
            .collect();

        Some(HandRow {
            hand_index,
            pot,
            winners: winners.iter().map(|&seat| self.names[seat].clone()).collect(),
            seats,
        })
    }
}

fn deal_rank<R: Rng>(rng: &mut R) -> HandRank {
    HandRank::ORDERED[rng.gen_range(0..HandRank::ORDERED.len())]
}

fn live_seats(in_hand: &[bool]) -> usize {
    in_hand.iter().filter(|live| **live).count()
}

/// Seats holding the best rank among those still in the hand, in seat order.
fn showdown(ranks: &[Option<HandRank>], in_hand: &[bool]) -> Vec<usize> {
    let best = ranks
        .iter()
        .zip(in_hand)
        .filter_map(|(rank, live)| rank.filter(|_| *live))
        .max();

    match best {
        Some(best) => ranks
            .iter()
            .zip(in_hand)
            .enumerate()
            .filter(|(_, (rank, live))| **live && **rank == Some(best))
            .map(|(seat, _)| seat)
            .collect(),
        None => Vec::new(),
    }
}

/// Even shares per winner, with the odd chips going to the earliest winning seat.
fn split_pot(pot: Chips, winners: &[usize], seat_count: usize) -> Vec<Chips> {
    let mut won = vec![0 as Chips; seat_count];
    if let Some((&first, _)) = winners.split_first() {
        let share = pot / winners.len() as Chips;
        let remainder = pot % winners.len() as Chips;
        for &seat in winners {
            won[seat] += share;
        }
        won[first] += remainder;
    }
    won
}

/// Outcome of one hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandRow {
    pub hand_index: usize,
    pub pot: Chips,
    pub winners: Vec<String>,
    pub seats: Vec<SeatRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatRow {
    pub seat: String,
    pub kind: SeatKind,
    /// `None` for a seat that had no chips to be dealt in.
    pub rank: Option<HandRank>,
    pub folded: bool,
    pub paid: Chips,
    pub won: Chips,
    pub bank: Chips,
    pub turns: Vec<TurnRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnRecord {
    pub stage: u32,
    /// `None` when the seat stayed idle.
    pub action: Option<Action>,
    pub raise: Option<Chips>,
    pub owed: Chips,
    pub paid: Chips,
}

#[derive(Serialize)]
struct HandLogRow<'a> {
    run_id: &'a str,
    #[serde(flatten)]
    hand: &'a HandRow,
}

impl<'a> HandLogRow<'a> {
    fn new(run_id: &'a str, hand: &'a HandRow) -> Self {
        Self { run_id, hand }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Seat(#[from] SeatError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeatConfig;

    fn rules(seed: u64) -> TableConfig {
        TableConfig {
            seed: Some(seed),
            hands: 50,
            starting_bank: 1_000,
            min_bet: 10,
            stages: 4,
        }
    }

    fn blueprints(kinds: &[(&str, SeatKind)]) -> Vec<SeatBlueprint> {
        let configs: Vec<SeatConfig> = kinds
            .iter()
            .map(|(name, kind)| SeatConfig {
                name: name.to_string(),
                kind: *kind,
                params: serde_yaml::Value::Null,
            })
            .collect();
        SeatBlueprint::from_configs(&configs).expect("blueprints")
    }

    fn table(seed: u64, kinds: &[(&str, SeatKind)]) -> Table {
        Table::new(&rules(seed), &blueprints(kinds), BotFeatures::default())
    }

    fn total(table: &Table) -> Chips {
        table.banks().iter().map(|record| record.balance).sum()
    }

    #[test]
    fn shove_into_nit_returns_the_pot() {
        let mut table = table(1, &[("shover", SeatKind::Shover), ("nit", SeatKind::Nit)]);
        let row = table.play_hand().expect("hand played");

        assert_eq!(row.pot, 1_000);
        assert_eq!(row.winners, vec!["shover".to_string()]);
        assert!(row.seats[1].folded);
        assert_eq!(row.seats[1].paid, 0);
        assert_eq!(row.seats[1].turns.len(), 1);
        assert_eq!(row.seats[1].turns[0].owed, 1_000);
        assert_eq!(row.seats[1].turns[0].action, Some(Action::Fold));
        assert_eq!(
            table.banks(),
            vec![BankRecord::new("shover", 1_000), BankRecord::new("nit", 1_000)]
        );
    }

    #[test]
    fn raises_do_not_reopen_action() {
        let mut table = table(2, &[("nit", SeatKind::Nit), ("shover", SeatKind::Shover)]);
        let row = table.play_hand().expect("hand played");

        // The nit checked before the shove and is never asked again in stage one.
        let nit_turns = &row.seats[0].turns;
        assert_eq!(nit_turns.len(), 4);
        assert!(nit_turns.iter().all(|turn| turn.action == Some(Action::Check)));
        assert!(nit_turns.iter().all(|turn| turn.owed == 0));
        assert!(!row.seats[0].folded);
        assert_eq!(row.seats[1].turns.len(), 1);
        assert_eq!(row.pot, 1_000);
    }

    #[test]
    fn call_matches_the_outstanding_bet() {
        let mut table = table(
            3,
            &[("shover", SeatKind::Shover), ("station", SeatKind::CallingStation)],
        );
        let row = table.play_hand().expect("hand played");

        assert_eq!(row.pot, 2_000);
        assert_eq!(row.seats[1].turns[0].action, Some(Action::Call));
        assert_eq!(row.seats[1].turns[0].paid, 1_000);
        assert_eq!(total(&table), 2_000);
        let won: Chips = row.seats.iter().map(|seat| seat.won).sum();
        assert_eq!(won, 2_000);
    }

    #[test]
    fn checked_down_hands_move_no_chips() {
        let mut table = table(
            4,
            &[
                ("a", SeatKind::CallingStation),
                ("b", SeatKind::Nit),
                ("c", SeatKind::CallingStation),
            ],
        );
        for _ in 0..20 {
            let row = table.play_hand().expect("hand played");
            assert_eq!(row.pot, 0);
            assert!(!row.winners.is_empty());
        }
        assert!(table.banks().iter().all(|record| record.balance == 1_000));
    }

    #[test]
    fn chips_are_conserved_across_a_mixed_table() {
        let mut table = table(
            5,
            &[
                ("modeler", SeatKind::Bankroll),
                ("station", SeatKind::CallingStation),
                ("nit", SeatKind::Nit),
                ("rival", SeatKind::Bankroll),
            ],
        );
        for _ in 0..200 {
            if table.play_hand().is_none() {
                break;
            }
            assert_eq!(total(&table), 4_000);
        }
        assert!(table.hands_played() > 0);
    }

    #[test]
    fn busted_tables_stop_dealing() {
        let mut table = table(
            6,
            &[("shover", SeatKind::Shover), ("station", SeatKind::CallingStation)],
        );
        let mut played = 0;
        while table.play_hand().is_some() {
            played += 1;
            assert!(played < 10_000, "table never busted");
        }
        assert_eq!(table.seats_with_chips(), 1);
        assert_eq!(table.hands_played(), played);
    }

    #[test]
    fn same_seed_same_hands() {
        let seats = [
            ("modeler", SeatKind::Bankroll),
            ("rival", SeatKind::Bankroll),
            ("station", SeatKind::CallingStation),
        ];
        let play = |seed| {
            let mut table = table(seed, &seats);
            (0..30).map_while(|_| table.play_hand()).collect::<Vec<_>>()
        };
        assert_eq!(play(99), play(99));
    }

    #[test]
    fn showdown_splits_ties_in_seat_order() {
        let ranks = [
            Some(HandRank::Flush),
            Some(HandRank::Straight),
            Some(HandRank::Flush),
            None,
        ];
        assert_eq!(showdown(&ranks, &[true, true, true, false]), vec![0, 2]);
        assert_eq!(showdown(&ranks, &[false, true, true, false]), vec![2]);
        assert!(showdown(&ranks, &[false, false, false, false]).is_empty());
    }

    #[test]
    fn odd_pot_remainder_goes_to_first_winner() {
        assert_eq!(split_pot(7, &[1, 3], 4), vec![0, 4, 0, 3]);
        assert_eq!(split_pot(9, &[0, 1, 2], 3), vec![3, 3, 3]);
        assert_eq!(split_pot(5, &[], 2), vec![0, 0]);
    }
}
