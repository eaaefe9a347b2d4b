//! Domain types for txcycle
//!
//! This module contains the core domain types:
//! - RunState: the process-wide snapshot with status, progress and log
//! - Outcome: result of one adapter call
//! - CycleStep: the fixed per-cycle operation template

pub mod outcome;
pub mod run_state;
pub mod step;

pub use outcome::{Outcome, OutcomeKind};
pub use run_state::{CycleProgress, LOG_CAPACITY, RunLog, RunState, RunStatus, ServiceEntry, stamp};
pub use step::{CYCLE_TEMPLATE, CycleStep};
