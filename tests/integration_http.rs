//! HTTP surface integration tests
//!
//! Exercises the router in-process with `tower::ServiceExt::oneshot`.

mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use serde_json::Value;
use tower::ServiceExt;
use txcycle::chain::{MockChain, MockConnector};
use txcycle::config::Config;
use txcycle::daemon::{AppContext, router};
use txcycle::domain::{RunState, RunStatus};

fn app_context(config: Config) -> Arc<AppContext> {
    Arc::new(AppContext::new(
        config,
        Arc::new(MockConnector::new(Arc::new(MockChain::new()))),
    ))
}

async fn post_json(app: &axum::Router, uri: &str) -> Value {
    let resp = app
        .clone()
        .oneshot(Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_start_then_already_running() {
    let dir = common::workspace();
    let ctx = app_context(common::config_in(dir.path(), 2, 60_000));
    let app = router(ctx.clone());

    let reply = post_json(&app, "/start").await;
    assert_eq!(reply, serde_json::json!({"ok": true}));

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(ctx.snapshot().status, RunStatus::Running);

    let reply = post_json(&app, "/start").await;
    assert_eq!(reply, serde_json::json!({"error": "Already running"}));

    let reply = post_json(&app, "/stop").await;
    assert_eq!(reply, serde_json::json!({"ok": true}));
}

#[tokio::test]
async fn test_stop_when_idle() {
    let dir = common::workspace();
    let app = router(app_context(common::config_in(dir.path(), 1, 0)));

    let reply = post_json(&app, "/stop").await;
    assert_eq!(reply, serde_json::json!({"error": "Not running"}));
}

#[tokio::test]
async fn test_start_acknowledges_before_failure() {
    // No credential file: the run fails, but only on the status feed
    let dir = tempfile::TempDir::new().unwrap();
    let ctx = app_context(common::config_in(dir.path(), 1, 0));
    let app = router(ctx.clone());

    let reply = post_json(&app, "/start").await;
    assert_eq!(reply, serde_json::json!({"ok": true}));

    let mut feed = Box::pin(ctx.publisher().subscribe());
    while let Some(snapshot) = feed.next().await {
        if snapshot.status.is_terminal() {
            assert_eq!(snapshot.status, RunStatus::Error);
            assert!(snapshot.logs.last().unwrap().contains("not found"));
            break;
        }
    }
}

#[tokio::test]
async fn test_status_snapshot() {
    let dir = common::workspace();
    let app = router(app_context(common::config_in(dir.path(), 3, 0)));

    let resp = app
        .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let state: RunState = serde_json::from_slice(&body).unwrap();
    assert_eq!(state.status, RunStatus::Idle);
    assert_eq!(state.cycles.total, 3);
}

#[tokio::test]
async fn test_events_pushes_snapshot_immediately() {
    let dir = common::workspace();
    let app = router(app_context(common::config_in(dir.path(), 1, 0)));

    let resp = app
        .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let mut body = resp.into_body().into_data_stream();
    let chunk = tokio::time::timeout(Duration::from_secs(1), body.next())
        .await
        .expect("first event should arrive without waiting for a tick")
        .unwrap()
        .unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();
    let data = text
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap();
    let value: Value = serde_json::from_str(data).unwrap();
    assert_eq!(value["status"], "Idle");
    assert_eq!(value["cycles"]["current"], 0);
    assert!(value["logs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_root_serves_dashboard() {
    let dir = common::workspace();
    let static_dir = dir.path().join("public");
    fs::create_dir_all(&static_dir).unwrap();
    fs::write(static_dir.join("index.html"), "<html>txcycle dashboard</html>").unwrap();
    let app = router(app_context(common::config_in(dir.path(), 1, 0)));

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("txcycle dashboard"));

    let resp = app
        .oneshot(Request::builder().uri("/missing.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
