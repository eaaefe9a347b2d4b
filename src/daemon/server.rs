//! Dashboard HTTP server.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::context::AppContext;
use super::handlers;
use crate::error::Result;

/// Routes for run control and the status feed; anything else is served
/// from the static directory (`/` maps to its `index.html`).
pub fn router(ctx: Arc<AppContext>) -> Router {
    let static_dir = ctx.config().paths.static_dir.clone();

    Router::new()
        .route("/start", post(handlers::start))
        .route("/stop", post(handlers::stop))
        .route("/events", get(handlers::events))
        .route("/status", get(handlers::status))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Bind `addr` (`host:port`) and serve until Ctrl-C
pub async fn serve(ctx: Arc<AppContext>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    log::info!("Dashboard running at http://{local}");
    println!("Dashboard running at http://{local}");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutting down");
        })
        .await?;
    Ok(())
}
