// handlers/snapshots.rs
// Snapshot handlers: create, clone, rollback

use crate::manager::ZfsManager;
use crate::models::{CloneSnapshotRequest, CreateSnapshot, DatasetInfoResponse, RollbackRequest};
use crate::utils::{action_response, dataset_name, error_response, respond, AgentError};
use crate::zfs::TypeMask;
use warp::{Rejection, Reply};

async fn create(body: CreateSnapshot, zfs: ZfsManager) -> Result<DatasetInfoResponse, AgentError> {
    let name = dataset_name(&body.name)?;
    let recursive = body.recursive;
    zfs.run("create_snapshot", move |session| {
        let snapshot = if recursive {
            session.snapshot_recursive(&name)?
        } else {
            session.snapshot(&name)?
        };
        Ok(DatasetInfoResponse {
            status: "success".to_string(),
            name: snapshot.name(),
            dataset_type: snapshot.dataset_type(),
        })
    })
    .await
}

pub async fn create_snapshot_handler(
    body: CreateSnapshot,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to create snapshot", create(body, zfs).await))
}

async fn clone(
    body: CloneSnapshotRequest,
    zfs: ZfsManager,
) -> Result<DatasetInfoResponse, AgentError> {
    let snapshot = dataset_name(&body.snapshot)?;
    let target = dataset_name(&body.target)?;
    zfs.run("clone_snapshot", move |session| {
        // Opened with any type so a non-snapshot reports UnsupportedType
        let clone = session
            .open_dataset(&snapshot, TypeMask::DATASET)?
            .clone_to(&target)?;
        Ok(DatasetInfoResponse {
            status: "success".to_string(),
            name: clone.name(),
            dataset_type: clone.dataset_type(),
        })
    })
    .await
}

pub async fn clone_snapshot_handler(
    body: CloneSnapshotRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to clone snapshot", clone(body, zfs).await))
}

pub async fn rollback_handler(
    body: RollbackRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let message = format!("Dataset '{}' rolled back to '{}'", body.dataset, body.snapshot);
    let result = async move {
        let dataset = dataset_name(&body.dataset)?;
        let snapshot = dataset_name(&body.snapshot)?;
        let force = body.force;
        zfs.run("rollback", move |session| {
            let target = session.open_dataset(&dataset, TypeMask::DATASET)?;
            let snap = session.open_dataset(&snapshot, TypeMask::DATASET)?;
            target.rollback(&snap, force)
        })
        .await
    }
    .await;
    Ok(match result {
        Ok(()) => action_response(message),
        Err(e) => error_response("Failed to roll back", &e),
    })
}
