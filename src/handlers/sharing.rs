// handlers/sharing.rs
// Mount and share handlers

use crate::manager::ZfsManager;
use crate::models::{
    MountRequest, MountStatusResponse, ShareProtocol, ShareRequest, ShareStatusResponse,
};
use crate::utils::{action_response, dataset_name, error_response, respond, AgentError};
use crate::zfs::{Dataset, TypeMask};
use warp::{Rejection, Reply};

#[derive(Debug, Clone, Copy)]
pub enum MountAction {
    Mount,
    Unmount,
}

#[derive(Debug, Clone, Copy)]
pub enum ShareAction {
    Share,
    Unshare,
}

// =========================================================================
// Mounting
// =========================================================================

pub async fn mount_handler(
    action: MountAction,
    body: MountRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let verb = match action {
        MountAction::Mount => "mounted",
        MountAction::Unmount => "unmounted",
    };
    let message = format!("Dataset '{}' {}", body.name, verb);
    let context = format!("Failed to change mount of '{}'", body.name);
    let result = async move {
        let name = dataset_name(&body.name)?;
        zfs.run("mount", move |session| {
            let dataset = session.open_dataset(&name, TypeMask::FILESYSTEM)?;
            match action {
                MountAction::Mount => dataset.mount(),
                MountAction::Unmount => dataset.unmount(),
            }
        })
        .await
    }
    .await;
    Ok(match result {
        Ok(()) => action_response(message),
        Err(e) => error_response(&context, &e),
    })
}

async fn mount_status(
    body: MountRequest,
    zfs: ZfsManager,
) -> Result<MountStatusResponse, AgentError> {
    let name = dataset_name(&body.name)?;
    zfs.run("mount_status", move |session| {
        let dataset = session.open_dataset(&name, TypeMask::FILESYSTEM)?;
        let mountpoint = dataset.mountpoint();
        Ok(MountStatusResponse {
            status: "success".to_string(),
            name: dataset.name(),
            mounted: mountpoint.is_some(),
            mountpoint,
        })
    })
    .await
}

pub async fn mount_status_handler(
    body: MountRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to read mount status", mount_status(body, zfs).await))
}

// =========================================================================
// Sharing
// =========================================================================

fn apply_share(
    dataset: &Dataset<'_>,
    action: ShareAction,
    protocol: ShareProtocol,
) -> crate::zfs::Result<()> {
    match (action, protocol) {
        (ShareAction::Share, ShareProtocol::All) => dataset.share(),
        (ShareAction::Unshare, ShareProtocol::All) => dataset.unshare(),
        (ShareAction::Share, ShareProtocol::Nfs) => dataset.share_nfs(),
        (ShareAction::Unshare, ShareProtocol::Nfs) => dataset.unshare_nfs(),
        #[cfg(feature = "smb")]
        (ShareAction::Share, ShareProtocol::Smb) => dataset.share_smb(),
        #[cfg(feature = "smb")]
        (ShareAction::Unshare, ShareProtocol::Smb) => dataset.unshare_smb(),
        #[cfg(feature = "iscsi")]
        (ShareAction::Share, ShareProtocol::Iscsi) => dataset.share_iscsi(),
        #[cfg(feature = "iscsi")]
        (ShareAction::Unshare, ShareProtocol::Iscsi) => dataset.unshare_iscsi(),
    }
}

/// (shared, share name) for one protocol
fn share_state(dataset: &Dataset<'_>, protocol: ShareProtocol) -> (bool, Option<String>) {
    match protocol {
        ShareProtocol::All => (dataset.is_shared(), None),
        ShareProtocol::Nfs => {
            let name = dataset.nfs_share_name();
            (name.is_some(), name)
        }
        #[cfg(feature = "smb")]
        ShareProtocol::Smb => {
            let name = dataset.smb_share_name();
            (name.is_some(), name)
        }
        #[cfg(feature = "iscsi")]
        ShareProtocol::Iscsi => (dataset.is_shared_iscsi(), None),
    }
}

pub async fn share_handler(
    action: ShareAction,
    body: ShareRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let verb = match action {
        ShareAction::Share => "shared",
        ShareAction::Unshare => "unshared",
    };
    let message = format!("Dataset '{}' {} ({:?})", body.name, verb, body.protocol);
    let context = format!("Failed to change share of '{}'", body.name);
    let result = async move {
        let name = dataset_name(&body.name)?;
        let protocol = body.protocol;
        zfs.run("share", move |session| {
            let dataset = session.open_dataset(&name, TypeMask::FILESYSTEM)?;
            apply_share(&dataset, action, protocol)
        })
        .await
    }
    .await;
    Ok(match result {
        Ok(()) => action_response(message),
        Err(e) => error_response(&context, &e),
    })
}

async fn share_status(
    body: ShareRequest,
    zfs: ZfsManager,
) -> Result<ShareStatusResponse, AgentError> {
    let name = dataset_name(&body.name)?;
    let protocol = body.protocol;
    zfs.run("share_status", move |session| {
        let dataset = session.open_dataset(&name, TypeMask::FILESYSTEM)?;
        let (shared, share_name) = share_state(&dataset, protocol);
        Ok(ShareStatusResponse {
            status: "success".to_string(),
            name: dataset.name(),
            protocol,
            shared,
            share_name,
        })
    })
    .await
}

pub async fn share_status_handler(
    body: ShareRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to read share status", share_status(body, zfs).await))
}
