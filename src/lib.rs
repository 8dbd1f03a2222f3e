//! weighttable - concurrent weighted random selection
//!
//! A [`WeightTable`] maps string keys to payloads carrying positive integer
//! weights and draws entries with probability proportional to weight.
//! Useful for weighted load distribution, feature sampling, and
//! probabilistic routing.

pub mod cli;
pub mod config;
pub mod error;
pub mod table;
pub mod telemetry;

pub use error::{AddError, AppError, AppResult};
pub use table::{Teardown, WeightTable};
