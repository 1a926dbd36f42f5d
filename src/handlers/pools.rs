// handlers/pools.rs
// Pool handlers: list, status, property get/set

use crate::manager::ZfsManager;
use crate::models::{
    PoolListResponse, PoolPropertyRequest, PoolStatusResponse, PropertyResponse,
    SetPoolPropertyRequest,
};
use crate::utils::{action_response, error_response, pool_name, respond, AgentError};
use crate::zfs::Pool;
use warp::{Rejection, Reply};

pub async fn list_pools_handler(zfs: ZfsManager) -> Result<impl Reply, Rejection> {
    let result = zfs
        .run("list_pools", |session| Pool::names(session))
        .await
        .map(|pools| PoolListResponse {
            status: "success".to_string(),
            pools,
        });
    Ok(respond("Failed to list pools", result))
}

async fn pool_status(name: String, zfs: ZfsManager) -> Result<PoolStatusResponse, AgentError> {
    let name = pool_name(&name)?;
    zfs.run("pool_status", move |session| {
        let pool = session.open_pool(&name)?;
        Ok(PoolStatusResponse {
            status: "success".to_string(),
            name: pool.name(),
            guid: pool.guid(),
            version: pool.version(),
            state: pool.state(),
            health: pool.health().to_string(),
            health_status: pool.status(),
            space_used: pool.space_used(),
            space_total: pool.space_total(),
        })
    })
    .await
}

pub async fn get_pool_status_handler(
    name: String,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to get pool status", pool_status(name, zfs).await))
}

async fn pool_get(
    name: String,
    body: PoolPropertyRequest,
    zfs: ZfsManager,
) -> Result<PropertyResponse, AgentError> {
    let name = pool_name(&name)?;
    zfs.run("pool_get", move |session| {
        let value = session.open_pool(&name)?.get(&body.property)?;
        Ok(PropertyResponse {
            status: "success".to_string(),
            name: name.to_string(),
            property: body.property,
            value,
        })
    })
    .await
}

pub async fn get_pool_property_handler(
    name: String,
    body: PoolPropertyRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    Ok(respond("Failed to read pool property", pool_get(name, body, zfs).await))
}

pub async fn set_pool_property_handler(
    name: String,
    body: SetPoolPropertyRequest,
    zfs: ZfsManager,
) -> Result<impl Reply, Rejection> {
    let result = match pool_name(&name) {
        Ok(pool) => {
            let (property, value) = (body.property.clone(), body.value.clone());
            zfs.run("pool_set", move |session| {
                session.open_pool(&pool)?.set(&property, &value)
            })
            .await
        }
        Err(e) => Err(e),
    };
    Ok(match result {
        Ok(()) => action_response(format!(
            "Property '{}' set to '{}' on pool '{}'",
            body.property, body.value, name
        )),
        Err(e) => error_response("Failed to set pool property", &e),
    })
}
