// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

mod common;

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _;

use common::*;
use district_alerts::api::{create_router, AppState};
use district_alerts::{AlertPipeline, MemoryStore, StaticFetcher};

const BODY_LIMIT: usize = 1024 * 1024;

fn router_with(fetcher: StaticFetcher) -> Router {
    let pipeline = AlertPipeline::new(config(), Arc::new(fetcher), Arc::new(MemoryStore::new()));
    create_router(AppState {
        pipeline: Arc::new(pipeline),
    })
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn health_returns_ok() {
    let app = router_with(StaticFetcher::new());
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn alerts_returns_ranked_list() {
    // No onset window configured, so wall-clock time does not affect the result.
    let (status, v) = get_json(router_with(full_fetcher()), "/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["status"], "ok");
    assert_eq!(v["region"], "Far North District");
    assert_eq!(v["count"], 2);
    assert_eq!(v["alerts"][0]["headline"], "Thunderstorm Watch");
    assert_eq!(v["alerts"][1]["headline"], "Heavy Rain Watch");
    assert_eq!(v["alerts"][1]["qualifies"], true);
    assert_eq!(v["alerts"][1]["info_url"], "https://alerts.test/warnings/1");
}

#[tokio::test]
async fn feed_outage_is_a_single_failure_state() {
    let fetcher = StaticFetcher::new().with(BOUNDARY_URL, BOUNDARY_GEOJSON);
    let (status, v) = get_json(router_with(fetcher), "/alerts").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["status"], "failed");
    assert_eq!(v["error"], "alerts failed to load");
    assert!(v.get("alerts").is_none());
}
