pub mod card;
pub mod cli;
pub mod data;
pub mod state;
pub mod units;
