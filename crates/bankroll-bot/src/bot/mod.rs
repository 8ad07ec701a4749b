mod history;
mod inference;
mod params;
mod sizer;

pub use history::OpponentHistory;
pub use inference::{ActionInference, Observation, infer_committed, infer_unchanged};
pub use params::BotParams;
pub use sizer::raise_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotFeatures {
    decision_details: bool,
    zero_delta_inference: bool,
}

impl BotFeatures {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    /// Log every opponent's history alongside each decision.
    pub const fn decision_details(self) -> bool {
        self.decision_details
    }

    /// Guess a label for opponents whose balance did not move.
    pub const fn zero_delta_inference(self) -> bool {
        self.zero_delta_inference
    }

    pub fn with_decision_details(mut self, enabled: bool) -> Self {
        self.decision_details = enabled;
        self
    }

    pub fn with_zero_delta_inference(mut self, enabled: bool) -> Self {
        self.zero_delta_inference = enabled;
        self
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let decision_details = read("BKR_DECISION_DETAILS")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(defaults.decision_details);

        let zero_delta_inference = read("BKR_INFER_ZERO_DELTA")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(defaults.zero_delta_inference);

        Self {
            decision_details,
            zero_delta_inference,
        }
    }
}

impl Default for BotFeatures {
    fn default() -> Self {
        Self {
            decision_details: false,
            zero_delta_inference: true,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON")
}
