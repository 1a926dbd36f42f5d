//-----------------------------------------------------
// HELPER FUNCTIONS
//-----------------------------------------------------

use crate::models::{ActionResponse, ErrorResponse, LastAction};
use crate::zfs::{DatasetName, DatasetType, ErrorKind, PoolName, TypeMask, ZfsError};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

pub type ActionTracker = Arc<RwLock<Option<LastAction>>>;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Zfs(#[from] ZfsError),

    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AgentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AgentError::Zfs(ZfsError::InvalidUsage(_))
            | AgentError::Zfs(ZfsError::UnsupportedType { .. }) => StatusCode::BAD_REQUEST,
            AgentError::Zfs(ZfsError::Native { kind, .. }) => match kind {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::DatasetExists => StatusCode::CONFLICT,
                ErrorKind::Perm => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AgentError::Zfs(ZfsError::InitFailed) | AgentError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Identity reported as `kind` in error bodies
    pub fn kind_name(&self) -> &'static str {
        match self {
            AgentError::Zfs(ZfsError::InvalidUsage(_)) => "InvalidUsage",
            AgentError::Zfs(ZfsError::UnsupportedType { .. }) => "UnsupportedType",
            AgentError::Zfs(ZfsError::Native { kind, .. }) => kind.name(),
            AgentError::Zfs(ZfsError::InitFailed) => "InitFailed",
            AgentError::Task(_) => "TaskFailed",
        }
    }

    pub fn native_code(&self) -> Option<i32> {
        match self {
            AgentError::Zfs(ZfsError::Native { code, .. }) => Some(*code),
            _ => None,
        }
    }
}

// Helper functions for response generation
pub fn success_response<T: Serialize>(body: T) -> Response {
    warp::reply::json(&body).into_response()
}

pub fn action_response(message: impl Into<String>) -> Response {
    success_response(ActionResponse {
        status: "success".to_string(),
        message: message.into(),
    })
}

pub fn error_response(context: &str, error: &AgentError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        warn!(context, error = %error, "request failed");
    }
    let body = ErrorResponse {
        status: "error".to_string(),
        message: format!("{}: {}", context, error),
        kind: Some(error.kind_name().to_string()),
        code: error.native_code(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

/// Reply with either the success body or the error
pub fn respond<T: Serialize>(context: &str, result: Result<T, AgentError>) -> Response {
    match result {
        Ok(body) => success_response(body),
        Err(e) => error_response(context, &e),
    }
}

// =========================================================================
// Request validation
// =========================================================================

pub fn dataset_name(name: &str) -> Result<DatasetName, AgentError> {
    Ok(DatasetName::new(name)?)
}

pub fn pool_name(name: &str) -> Result<PoolName, AgentError> {
    Ok(PoolName::new(name)?)
}

/// Missing `types` means any dataset type; an empty list is a mistake
pub fn type_mask(types: Option<Vec<DatasetType>>) -> Result<TypeMask, AgentError> {
    match types {
        None => Ok(TypeMask::DATASET),
        Some(types) if types.is_empty() => Err(ZfsError::invalid_usage("types must not be empty").into()),
        Some(types) => Ok(types.into_iter().collect()),
    }
}

// =========================================================================
// Action tracking
// =========================================================================

// Create a middleware filter that tracks actions
pub fn with_action_tracking(
    action_name: &'static str,
    tracker: ActionTracker,
) -> impl Filter<Extract = (), Error = Infallible> + Clone {
    warp::any()
        .map(move || {
            if let Ok(mut last_action) = tracker.write() {
                *last_action = Some(LastAction::new(action_name.to_string()));
            }
        })
        .untuple_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let invalid: AgentError = ZfsError::invalid_usage("x").into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.kind_name(), "InvalidUsage");
        assert_eq!(invalid.native_code(), None);

        let missing: AgentError = ZfsError::Native {
            kind: ErrorKind::NotFound,
            code: 2009,
            action: String::new(),
            description: "dataset does not exist".to_string(),
        }
        .into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.kind_name(), "NotFound");
        assert_eq!(missing.native_code(), Some(2009));

        let init: AgentError = ZfsError::InitFailed.into();
        assert_eq!(init.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_type_mask_defaults_to_any_dataset() {
        assert_eq!(type_mask(None).unwrap(), TypeMask::DATASET);
        assert_eq!(
            type_mask(Some(vec![DatasetType::Snapshot])).unwrap(),
            TypeMask::SNAPSHOT
        );
        assert!(type_mask(Some(vec![])).is_err());
    }
}
