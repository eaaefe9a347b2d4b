//! Cycle runner module - the orchestrator behind every run.
//!
//! This module provides the core run logic, including:
//! - CycleRunner for executing the configured cycles
//! - Randomized pacing between steps and cycles
//! - Cooperative cancellation at every suspension point

mod cycle_runner;

pub use cycle_runner::CycleRunner;
