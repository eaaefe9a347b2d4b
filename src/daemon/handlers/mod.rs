//! Request handlers for the dashboard server
//!
//! Each submodule handles a category of routes:
//! - run: run control (start, stop)
//! - status: status feed (events, status)

pub mod run;
pub mod status;

pub use run::*;
pub use status::*;
