pub mod agent;
pub mod bot;
pub mod policy;

pub use agent::BankrollAgent;
pub use bot::{ActionInference, BotFeatures, BotParams, Observation, OpponentHistory};
pub use policy::{Decision, Guard, GuardedPolicy, Play, Policy, PolicyContext};
