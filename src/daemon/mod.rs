//! Daemon Core - run control, status publishing, and the HTTP surface
//!
//! The daemon is the long-running process that:
//! - Owns the single RunState and starts runs against it
//! - Publishes snapshots to any number of observers
//! - Serves the dashboard, the control routes, and the SSE feed

pub mod context;
pub mod handlers;
pub mod messages;
pub mod publisher;
pub mod server;

pub use context::AppContext;
pub use messages::ControlReply;
pub use publisher::StatusPublisher;
pub use server::{router, serve};
