//! CLI module for txcycle - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for serving the dashboard
//! and for talking to a server that is already running.

pub mod client;
pub mod commands;

pub use commands::Cli;
