// handlers/library.rs
// Library-level handlers: health, error table lookup

use crate::models::{ErrorLookupResponse, HealthResponse};
use crate::utils::{success_response, ActionTracker};
use crate::zfs::ErrorKind;
use warp::{Rejection, Reply};

pub async fn health_check_handler(tracker: ActionTracker) -> Result<impl Reply, Rejection> {
    let last_action = tracker.read().ok().and_then(|guard| guard.clone());
    Ok(success_response(HealthResponse {
        status: "success".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        last_action,
    }))
}

/// Map a native libzfs error code to its identity
pub async fn error_lookup_handler(code: i32) -> Result<impl Reply, Rejection> {
    let kind = ErrorKind::from_code(code);
    Ok(success_response(ErrorLookupResponse {
        status: "success".to_string(),
        code,
        kind: kind.name().to_string(),
        mapped: kind != ErrorKind::Unknown,
    }))
}
