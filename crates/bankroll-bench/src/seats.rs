use bankroll_bot::{BankrollAgent, BotFeatures, BotParams, Play};
use bankroll_core::model::Chips;
use bankroll_core::model::bank::BankRecord;
use bankroll_core::model::hand_rank::HandRank;
use bankroll_core::table::{ActionExecutor, TableView};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use thiserror::Error;

use crate::config::{SeatConfig, SeatKind};

/// Validated seat definition, ready to spawn a player for a run.
#[derive(Debug, Clone)]
pub struct SeatBlueprint {
    pub name: String,
    pub kind: SeatKind,
    params: BotParams,
}

impl SeatBlueprint {
    pub fn from_configs(configs: &[SeatConfig]) -> Result<Vec<Self>, SeatError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &SeatConfig) -> Result<Self, SeatError> {
        let params = match config.kind {
            SeatKind::Bankroll => bot_params(&config.name, &config.params)?,
            _ if has_entries(&config.params) => {
                return Err(SeatError::UnexpectedParams {
                    name: config.name.clone(),
                    kind: config.kind,
                });
            }
            _ => BotParams::default(),
        };

        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            params,
        })
    }

    pub fn spawn(&self, seed: u64, features: BotFeatures) -> SeatPlayer {
        match self.kind {
            SeatKind::Bankroll => SeatPlayer::Bankroll(Box::new(BankrollAgent::with_rng(
                self.name.as_str(),
                self.params,
                features,
                SmallRng::seed_from_u64(seed),
            ))),
            SeatKind::CallingStation => SeatPlayer::CallingStation,
            SeatKind::Nit => SeatPlayer::Nit,
            SeatKind::Shover => SeatPlayer::Shover,
        }
    }
}

fn has_entries(params: &serde_yaml::Value) -> bool {
    params.as_mapping().is_some_and(|mapping| !mapping.is_empty())
}

fn bot_params(name: &str, params: &serde_yaml::Value) -> Result<BotParams, SeatError> {
    if params.is_null() {
        return Ok(BotParams::default());
    }
    serde_yaml::from_value(params.clone()).map_err(|source| SeatError::InvalidParams {
        name: name.to_string(),
        source,
    })
}

/// A seated participant for the duration of one run.
#[derive(Debug)]
pub enum SeatPlayer {
    Bankroll(Box<BankrollAgent>),
    CallingStation,
    Nit,
    Shover,
}

impl SeatPlayer {
    /// Let the participant answer one turn; the chosen command lands in `turn`.
    pub fn act(&mut self, turn: &mut TurnSeat) {
        match self {
            SeatPlayer::Bankroll(agent) => {
                agent.take_turn(turn);
            }
            SeatPlayer::CallingStation => {
                if turn.is_bet_active() {
                    turn.call();
                } else {
                    turn.check();
                }
            }
            SeatPlayer::Nit => {
                if turn.is_bet_active() {
                    turn.fold();
                } else {
                    turn.check();
                }
            }
            SeatPlayer::Shover => turn.all_in(),
        }
    }
}

/// Table state handed to the acting seat, collecting the one command it sends back.
#[derive(Debug, Clone)]
pub struct TurnSeat {
    pub banks: Vec<BankRecord>,
    pub table_bet: Chips,
    pub min_bet: Chips,
    pub stage: u32,
    pub bank: Chips,
    pub hand_rank: HandRank,
    play: Option<Play>,
}

impl TurnSeat {
    pub fn new(
        banks: Vec<BankRecord>,
        table_bet: Chips,
        min_bet: Chips,
        stage: u32,
        bank: Chips,
        hand_rank: HandRank,
    ) -> Self {
        Self {
            banks,
            table_bet,
            min_bet,
            stage,
            bank,
            hand_rank,
            play: None,
        }
    }

    /// The command sent this turn; [`Play::Idle`] when the seat stayed silent.
    pub fn play(&self) -> Play {
        self.play.unwrap_or(Play::Idle)
    }

    fn submit(&mut self, play: Play) {
        // A second command in the same turn would be an engine rule violation; first one wins.
        if self.play.is_none() {
            self.play = Some(play);
        }
    }
}

impl TableView for TurnSeat {
    fn player_banks(&self) -> Option<Vec<BankRecord>> {
        Some(self.banks.clone())
    }

    fn table_bet(&self) -> Chips {
        self.table_bet
    }

    fn table_min_bet(&self) -> Chips {
        self.min_bet
    }

    fn round_stage(&self) -> u32 {
        self.stage
    }

    fn bank(&self) -> Chips {
        self.bank
    }

    fn hand_rank(&self) -> HandRank {
        self.hand_rank
    }
}

impl ActionExecutor for TurnSeat {
    fn fold(&mut self) {
        self.submit(Play::Fold);
    }

    fn check(&mut self) {
        self.submit(Play::Check);
    }

    fn call(&mut self) {
        self.submit(Play::Call);
    }

    fn raise(&mut self, amount: Chips) {
        self.submit(Play::Raise(amount));
    }

    fn all_in(&mut self) {
        self.submit(Play::AllIn);
    }
}

#[derive(Debug, Error)]
pub enum SeatError {
    #[error("invalid bankroll parameters for seat '{name}': {source}")]
    InvalidParams {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("seat '{name}' of kind {kind:?} takes no parameters")]
    UnexpectedParams { name: String, kind: SeatKind },
}
