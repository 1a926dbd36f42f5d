//! # Integration Tests: Authentication
//!
//! ## What is tested
//! - Requests without X-API-Key header → 401 Unauthorized
//! - Requests with wrong X-API-Key → 401 Unauthorized
//! - Requests with correct X-API-Key → proceeds to handler
//! - API key generation and persistence

use serde_json::Value;
use std::sync::{Arc, RwLock};
use warp::test::request;
use zetta::auth::{generate_api_key, get_or_create_api_key};
use zetta::manager::ZfsManager;
use zetta::routes::routes;

const KEY: &str = "auth-test-key";

fn api() -> impl warp::Filter<Extract = (impl warp::Reply,), Error = std::convert::Infallible> + Clone
{
    routes(KEY.to_string(), ZfsManager::default(), Arc::new(RwLock::new(None)))
}

#[tokio::test]
async fn test_missing_api_key_returns_401() {
    let resp = request()
        .method("GET")
        .path("/v1/errors/2009")
        .reply(&api())
        .await;
    assert_eq!(resp.status(), 401);

    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_invalid_api_key_returns_401() {
    let resp = request()
        .method("GET")
        .path("/v1/pools")
        .header("X-API-Key", "wrong-key")
        .reply(&api())
        .await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_checked_before_body() {
    let resp = request()
        .method("POST")
        .path("/v1/datasets/get")
        .body("not json")
        .reply(&api())
        .await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_valid_api_key_proceeds() {
    let resp = request()
        .method("GET")
        .path("/v1/errors/2009")
        .header("X-API-Key", KEY)
        .reply(&api())
        .await;
    assert_eq!(resp.status(), 200);
}

#[test]
fn test_generated_key_shape() {
    let key = generate_api_key();
    assert_eq!(key.len(), 32);
    assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(key, generate_api_key());
}

#[test]
fn test_api_key_is_persisted() {
    let dir = std::env::temp_dir().join(format!("zetta-auth-{}", std::process::id()));
    let path = dir.join("nested").join("api_key");

    let first = get_or_create_api_key(&path).unwrap();
    let second = get_or_create_api_key(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first);

    std::fs::remove_dir_all(&dir).unwrap();
}
