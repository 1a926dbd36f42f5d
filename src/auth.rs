//-----------------------------------------------------
// AUTHENTICATION
//-----------------------------------------------------

use crate::models::ErrorResponse;
use rand::Rng;
use std::convert::Infallible;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};
use warp::http::{HeaderMap, StatusCode};
use warp::{Filter, Rejection, Reply};

pub const API_KEY_HEADER: &str = "X-API-Key";

// Custom error type for API key validation failures
#[derive(Debug)]
pub struct ApiKeyError;
impl warp::reject::Reject for ApiKeyError {}

pub fn generate_api_key() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

// Read the persisted API key, or create and persist a new one
pub fn get_or_create_api_key(path: &Path) -> std::io::Result<String> {
    if let Ok(api_key) = fs::read_to_string(path) {
        let api_key = api_key.trim().to_string();
        if !api_key.is_empty() {
            debug!(path = %path.display(), "using existing API key");
            return Ok(api_key);
        }
    }

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let api_key = generate_api_key();
    let mut file = fs::File::create(path)?;
    file.write_all(api_key.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    info!(path = %path.display(), "generated new API key");
    Ok(api_key)
}

// Check if the API key is valid
async fn check_api_key(headers: HeaderMap, our_api_key: String) -> Result<(), Rejection> {
    match headers.get(API_KEY_HEADER) {
        Some(key) if key.to_str().map(|s| s == our_api_key).unwrap_or(false) => Ok(()),
        _ => Err(warp::reject::custom(ApiKeyError)),
    }
}

/// Filter that rejects requests without the right X-API-Key header
pub fn with_api_key(
    api_key: String,
) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::headers_cloned()
        .and(warp::any().map(move || api_key.clone()))
        .and_then(check_api_key)
        .untuple_one()
}

/// Turn rejections into the same JSON error shape the handlers use
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.find::<ApiKeyError>().is_some() {
        (StatusCode::UNAUTHORIZED, "missing or invalid API key".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "no such route".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("invalid request body: {}", e))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("unhandled rejection: {:?}", err))
    };

    let body = ErrorResponse {
        status: "error".to_string(),
        message,
        kind: None,
        code: None,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
