//! # Integration Tests: Health Endpoint
//!
//! ## What is tested
//! - GET /health returns 200 OK
//! - Response contains status, version, last_action fields
//! - No authentication required for health endpoint
//! - last_action is null initially, populated after other requests

use serde_json::Value;
use std::sync::{Arc, RwLock};
use warp::test::request;
use zetta::manager::ZfsManager;
use zetta::routes::routes;
use zetta::utils::ActionTracker;

const KEY: &str = "health-test-key";

fn tracker() -> ActionTracker {
    Arc::new(RwLock::new(None))
}

#[tokio::test]
async fn test_health_returns_200() {
    let api = routes(KEY.to_string(), ZfsManager::default(), tracker());
    let resp = request().method("GET").path("/health").reply(&api).await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_health_response_shape() {
    let api = routes(KEY.to_string(), ZfsManager::default(), tracker());
    let resp = request().method("GET").path("/health").reply(&api).await;
    let body: Value = serde_json::from_slice(resp.body()).unwrap();

    assert_eq!(body["status"], "success");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["last_action"].is_null());
}

#[tokio::test]
async fn test_health_records_last_action() {
    let last_action = tracker();
    let api = routes(KEY.to_string(), ZfsManager::default(), last_action.clone());

    // Rejected during validation, so no libzfs call is made
    let resp = request()
        .method("POST")
        .path("/v1/datasets/open")
        .header("X-API-Key", KEY)
        .json(&serde_json::json!({ "name": "not a//valid name" }))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), 400);

    let resp = request().method("GET").path("/health").reply(&api).await;
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["last_action"]["function"], "open_dataset");
    assert!(body["last_action"]["timestamp"].as_u64().unwrap() > 0);
}
