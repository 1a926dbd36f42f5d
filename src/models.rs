use crate::zfs::{DatasetType, PoolState, PoolStatus, PropValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastAction {
    pub function: String,
    pub timestamp: u64,
}

impl LastAction {
    pub fn new(function: String) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self { function, timestamp }
    }
}

// =========================================================================
// Response structures
// =========================================================================

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    /// Error identity, e.g. `NotFound` or `InvalidUsage`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Native libzfs error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub last_action: Option<LastAction>,
}

#[derive(Debug, Serialize)]
pub struct ErrorLookupResponse {
    pub status: String,
    pub code: i32,
    pub kind: String,
    /// False when the code fell back to `Unknown`
    pub mapped: bool,
}

#[derive(Debug, Serialize)]
pub struct PoolListResponse {
    pub status: String,
    pub pools: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PoolStatusResponse {
    pub status: String,
    pub name: String,
    pub guid: u64,
    pub version: u64,
    pub state: PoolState,
    pub health: String,
    pub health_status: PoolStatus,
    pub space_used: u64,
    pub space_total: u64,
}

#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub status: String,
    pub datasets: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DatasetInfoResponse {
    pub status: String,
    pub name: String,
    #[serde(rename = "type")]
    pub dataset_type: DatasetType,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub status: String,
    pub name: String,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct PropertyResponse {
    pub status: String,
    pub name: String,
    pub property: String,
    /// `null` when the property is unset, unknown or does not apply
    pub value: Option<PropValue>,
}

#[derive(Debug, Serialize)]
pub struct MountStatusResponse {
    pub status: String,
    pub name: String,
    pub mounted: bool,
    pub mountpoint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShareStatusResponse {
    pub status: String,
    pub name: String,
    pub protocol: ShareProtocol,
    pub shared: bool,
    /// Exported path or share name, when the protocol reports one
    pub share_name: Option<String>,
}

// =========================================================================
// Request structures
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct PoolPropertyRequest {
    pub property: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPoolPropertyRequest {
    pub property: String,
    pub value: String,
}

/// Dataset addressed by name; `types` defaults to any dataset type
#[derive(Debug, Deserialize)]
pub struct DatasetRequest {
    pub name: String,
    #[serde(default)]
    pub types: Option<Vec<DatasetType>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDataset {
    pub name: String,
    pub kind: DatasetType,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct DatasetPropertyRequest {
    pub name: String,
    #[serde(default)]
    pub types: Option<Vec<DatasetType>>,
    pub property: String,
}

#[derive(Debug, Deserialize)]
pub struct SetDatasetPropertyRequest {
    pub name: String,
    #[serde(default)]
    pub types: Option<Vec<DatasetType>>,
    pub property: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameDatasetRequest {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub recursive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildRelation {
    Filesystems,
    Snapshots,
    Dependents,
}

#[derive(Debug, Deserialize)]
pub struct ChildrenRequest {
    pub name: String,
    #[serde(default)]
    pub types: Option<Vec<DatasetType>>,
    pub relation: ChildRelation,
}

#[derive(Debug, Deserialize)]
pub struct CreateSnapshot {
    pub name: String,
    #[serde(default)]
    pub recursive: bool,
}

#[derive(Debug, Deserialize)]
pub struct CloneSnapshotRequest {
    pub snapshot: String,
    pub target: String,
}

#[derive(Debug, Deserialize)]
pub struct RollbackRequest {
    pub dataset: String,
    pub snapshot: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct MountRequest {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareProtocol {
    /// Every protocol enabled through the share* properties
    #[default]
    All,
    Nfs,
    #[cfg(feature = "smb")]
    Smb,
    #[cfg(feature = "iscsi")]
    Iscsi,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub name: String,
    #[serde(default)]
    pub protocol: ShareProtocol,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_status_response_renders_enums() {
        let body = PoolStatusResponse {
            status: "success".to_string(),
            name: "tank".to_string(),
            guid: 1,
            version: 5000,
            state: PoolState::PotentiallyActive,
            health: "ONLINE".to_string(),
            health_status: PoolStatus::Resilvering,
            space_used: 0,
            space_total: 0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["state"], "potentially_active");
        assert_eq!(json["health_status"], "resilvering");
    }
}
