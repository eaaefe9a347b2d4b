//! Run control handlers.
//!
//! Both reply immediately; run failures surface only on the status feed.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::daemon::context::AppContext;
use crate::daemon::messages::ControlReply;

/// `POST /start`
pub async fn start(State(ctx): State<Arc<AppContext>>) -> Json<ControlReply> {
    Json(ctx.start_run().into())
}

/// `POST /stop`
pub async fn stop(State(ctx): State<Arc<AppContext>>) -> Json<ControlReply> {
    Json(ctx.stop_run().into())
}
