pub mod config;
pub mod logging;
pub mod seats;
pub mod table;
