//! Status feed handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use crate::daemon::context::AppContext;
use crate::domain::RunState;

/// `GET /events` - one snapshot immediately, then on every tick and change
pub async fn events(State(ctx): State<Arc<AppContext>>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    log::debug!("Status subscriber attached");
    let stream = ctx.publisher().subscribe().map(|snapshot| Ok(snapshot_event(&snapshot)));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// `GET /status` - the current snapshot as JSON
pub async fn status(State(ctx): State<Arc<AppContext>>) -> Json<RunState> {
    Json(ctx.snapshot())
}

fn snapshot_event(snapshot: &RunState) -> Event {
    match Event::default().json_data(snapshot) {
        Ok(event) => event,
        Err(e) => {
            log::warn!("Failed to encode snapshot: {e}");
            Event::default().comment("snapshot unavailable")
        }
    }
}

