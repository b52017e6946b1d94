pub mod assigner;
pub mod config;
pub mod day_type;
pub mod engine;
pub mod error;
pub mod generator;
pub mod io;
pub mod manning;
pub mod model;
pub mod paths;
pub mod roster;
pub mod rotation;
pub mod seniority;
pub mod store;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use error::{Result, RosterError};
