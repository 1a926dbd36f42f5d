// handlers/datasets.rs
// Dataset handlers: list, open, exists, create, properties, rename, promote, destroy, children

use crate::manager::ZfsManager;
use crate::models::{
    ChildRelation, ChildrenRequest, CreateDataset, DatasetInfoResponse, DatasetPropertyRequest,
    DatasetRequest, DatasetResponse, ExistsResponse, PropertyResponse, RenameDatasetRequest,
    SetDatasetPropertyRequest,
};
use crate::utils::{action_response, dataset_name, error_response, respond, type_mask, AgentError};
use crate::zfs::{Dataset, TypeMask};
use warp::{Rejection, Reply};

/// Reply with a success message or the error
fn done(context: &str, message: String, result: Result<(), AgentError>) -> warp::reply::Response {
    match result {
        Ok(()) => action_response(message),
        Err(e) => error_response(context, &e),
    }
}

pub async fn list_datasets_handler(zfs: ZfsManager) -> Result<impl Reply, Rejection> {
    let result = zfs
        .run("list_datasets", |session| Dataset::root_names(session))
        .await
        .map(|datasets| DatasetResponse {
            status: "success".to_string(),
            datasets,
        });
    Ok(respond("Failed to list datasets", result))
}

// =========================================================================
// Open / exists / create
// =========================================================================

async fn open(body: DatasetRequest, zfs: ZfsManager) -> Result<DatasetInfoResponse, AgentError> {
    let name = dataset_name(&body.name)?;
    let types = type_mask(body.types)?;
    zfs.run("open_dataset", move |session| {
        let dataset = session.open_dataset(&name, types)?;
        Ok(DatasetInfoResponse {
            status: "success".to_string(),
            name: dataset.name(),
            dataset_type: dataset.dataset_type(),
        })
    })
    .await
}

pub async fn open_dataset_handler(
    body: DatasetRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to open dataset", open(body, zfs).await))
}

async fn exists(body: DatasetRequest, zfs: ZfsManager) -> Result<ExistsResponse, AgentError> {
    let name = dataset_name(&body.name)?;
    let types = type_mask(body.types)?;
    zfs.run("dataset_exists", move |session| {
        let exists = session.dataset_exists(&name, types);
        Ok(ExistsResponse {
            status: "success".to_string(),
            name: name.to_string(),
            exists,
        })
    })
    .await
}

pub async fn dataset_exists_handler(
    body: DatasetRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to check dataset", exists(body, zfs).await))
}

pub async fn create_dataset_handler(
    body: CreateDataset,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let message = format!("Dataset '{}' created as {}", body.name, body.kind);
    let result = async move {
        let name = dataset_name(&body.name)?;
        let (kind, properties) = (body.kind, body.properties);
        zfs.run("create_dataset", move |session| {
            session.create_dataset(&name, kind, &properties)
        })
        .await
    }
    .await;
    Ok(done("Failed to create dataset", message, result))
}

// =========================================================================
// Properties
// =========================================================================

async fn get_property(
    body: DatasetPropertyRequest,
    zfs: ZfsManager,
) -> Result<PropertyResponse, AgentError> {
    let name = dataset_name(&body.name)?;
    let types = type_mask(body.types)?;
    let property = body.property;
    zfs.run("dataset_get", move |session| {
        let value = session.open_dataset(&name, types)?.get(&property)?;
        Ok(PropertyResponse {
            status: "success".to_string(),
            name: name.to_string(),
            property,
            value,
        })
    })
    .await
}

pub async fn get_property_handler(
    body: DatasetPropertyRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to read property", get_property(body, zfs).await))
}

async fn get_user_property(
    body: DatasetPropertyRequest,
    zfs: ZfsManager,
) -> Result<PropertyResponse, AgentError> {
    let name = dataset_name(&body.name)?;
    let types = type_mask(body.types)?;
    let property = body.property;
    zfs.run("dataset_get_user_prop", move |session| {
        let value = session
            .open_dataset(&name, types)?
            .get_user_prop(&property)?
            .map(crate::zfs::PropValue::Text);
        Ok(PropertyResponse {
            status: "success".to_string(),
            name: name.to_string(),
            property,
            value,
        })
    })
    .await
}

pub async fn get_user_property_handler(
    body: DatasetPropertyRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to read user property", get_user_property(body, zfs).await))
}

pub async fn set_property_handler(
    body: SetDatasetPropertyRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let message = format!(
        "Property '{}' set to '{}' on '{}'",
        body.property, body.value, body.name
    );
    let result = async move {
        let name = dataset_name(&body.name)?;
        let types = type_mask(body.types)?;
        let (property, value) = (body.property, body.value);
        zfs.run("dataset_set", move |session| {
            session.open_dataset(&name, types)?.set(&property, &value)
        })
        .await
    }
    .await;
    Ok(done("Failed to set property", message, result))
}

// =========================================================================
// Rename / promote / destroy
// =========================================================================

pub async fn rename_dataset_handler(
    body: RenameDatasetRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let message = format!("Dataset '{}' renamed to '{}'", body.name, body.target);
    let result = async move {
        let name = dataset_name(&body.name)?;
        let target = dataset_name(&body.target)?;
        let recursive = body.recursive;
        zfs.run("rename_dataset", move |session| {
            session
                .open_dataset(&name, TypeMask::DATASET)?
                .rename(&target, recursive)
        })
        .await
    }
    .await;
    Ok(done("Failed to rename dataset", message, result))
}

pub async fn promote_dataset_handler(
    body: DatasetRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let message = format!("Dataset '{}' promoted", body.name);
    let result = async move {
        let name = dataset_name(&body.name)?;
        zfs.run("promote_dataset", move |session| {
            session
                .open_dataset(&name, TypeMask::FILESYSTEM | TypeMask::VOLUME)?
                .promote()
        })
        .await
    }
    .await;
    Ok(done("Failed to promote dataset", message, result))
}

pub async fn destroy_dataset_handler(
    body: DatasetRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let message = format!("Dataset '{}' destroyed", body.name);
    let result = async move {
        let name = dataset_name(&body.name)?;
        let types = type_mask(body.types)?;
        zfs.run("destroy_dataset", move |session| {
            session.open_dataset(&name, types)?.destroy()
        })
        .await
    }
    .await;
    Ok(done("Failed to destroy dataset", message, result))
}

// =========================================================================
// Children
// =========================================================================

async fn children(body: ChildrenRequest, zfs: ZfsManager) -> Result<DatasetResponse, AgentError> {
    let name = dataset_name(&body.name)?;
    let types = type_mask(body.types)?;
    let relation = body.relation;
    zfs.run("dataset_children", move |session| {
        let dataset = session.open_dataset(&name, types)?;
        let datasets = match relation {
            ChildRelation::Filesystems => dataset.filesystem_names()?,
            ChildRelation::Snapshots => dataset.snapshot_names()?,
            ChildRelation::Dependents => dataset.dependent_names()?,
        };
        Ok(DatasetResponse {
            status: "success".to_string(),
            datasets,
        })
    })
    .await
}

pub async fn dataset_children_handler(
    body: ChildrenRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to list children", children(body, zfs).await))
}
