//! txcycle - testnet transaction cycler
//!
//! Runs a fixed sequence of wrap, swap, transfer, deploy and stake calls
//! for a configured number of cycles, with randomized amounts and pacing,
//! and streams the run's status to a web dashboard.

pub mod chain;
pub mod config;
pub mod daemon;
pub mod domain;
pub mod error;
pub mod ops;
pub mod runner;
pub mod sampling;
pub mod wallet;

pub use error::{CycleError, Result};
