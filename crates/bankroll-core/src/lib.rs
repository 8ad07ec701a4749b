#![deny(warnings)]
//! Data model and engine boundary shared by the bankroll agent and its harness.

pub mod model;
pub mod table;
