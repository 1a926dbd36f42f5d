// zfs/types.rs
// Dataset types, type masks, pool state and property values

use libc::c_int;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Type of an opened dataset (`zfs_type_t`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Filesystem,
    Volume,
    Snapshot,
    Pool,
}

impl DatasetType {
    pub fn from_raw(raw: c_int) -> Option<DatasetType> {
        match raw {
            1 => Some(DatasetType::Filesystem),
            2 => Some(DatasetType::Snapshot),
            4 => Some(DatasetType::Volume),
            8 => Some(DatasetType::Pool),
            _ => None,
        }
    }

    pub fn raw(self) -> c_int {
        TypeMask::from(self).bits()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetType::Filesystem => "filesystem",
            DatasetType::Volume => "volume",
            DatasetType::Snapshot => "snapshot",
            DatasetType::Pool => "pool",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Type masks
// ============================================================================

/// Set of dataset types accepted by open / exists / iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeMask(c_int);

impl TypeMask {
    pub const FILESYSTEM: TypeMask = TypeMask(1);
    pub const SNAPSHOT: TypeMask = TypeMask(2);
    pub const VOLUME: TypeMask = TypeMask(4);
    pub const POOL: TypeMask = TypeMask(8);
    /// Filesystem, snapshot or volume
    pub const DATASET: TypeMask = TypeMask(1 | 2 | 4);

    const KNOWN: c_int = 1 | 2 | 4 | 8;

    /// Accepts only non-empty combinations of the known type bits
    pub fn from_bits(bits: c_int) -> Option<TypeMask> {
        if bits != 0 && bits & !Self::KNOWN == 0 {
            Some(TypeMask(bits))
        } else {
            None
        }
    }

    pub fn bits(self) -> c_int {
        self.0
    }

    pub fn contains(self, ty: DatasetType) -> bool {
        self.0 & ty.raw() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for TypeMask {
    fn default() -> Self {
        TypeMask::DATASET
    }
}

impl From<DatasetType> for TypeMask {
    fn from(ty: DatasetType) -> Self {
        match ty {
            DatasetType::Filesystem => TypeMask::FILESYSTEM,
            DatasetType::Snapshot => TypeMask::SNAPSHOT,
            DatasetType::Volume => TypeMask::VOLUME,
            DatasetType::Pool => TypeMask::POOL,
        }
    }
}

impl BitOr for TypeMask {
    type Output = TypeMask;

    fn bitor(self, rhs: TypeMask) -> TypeMask {
        TypeMask(self.0 | rhs.0)
    }
}

impl FromIterator<DatasetType> for TypeMask {
    fn from_iter<I: IntoIterator<Item = DatasetType>>(iter: I) -> Self {
        TypeMask(iter.into_iter().fold(0, |acc, ty| acc | ty.raw()))
    }
}

// ============================================================================
// Pool state
// ============================================================================

/// `pool_state_t` as reported by `zpool_get_state`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolState {
    Active,
    Exported,
    Destroyed,
    Spare,
    L2Cache,
    Uninitialized,
    Unavailable,
    PotentiallyActive,
    Unknown(i32),
}

impl PoolState {
    pub fn from_raw(raw: c_int) -> PoolState {
        match raw {
            0 => PoolState::Active,
            1 => PoolState::Exported,
            2 => PoolState::Destroyed,
            3 => PoolState::Spare,
            4 => PoolState::L2Cache,
            5 => PoolState::Uninitialized,
            6 => PoolState::Unavailable,
            7 => PoolState::PotentiallyActive,
            other => PoolState::Unknown(other),
        }
    }
}

/// Value of the pool `health` property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolHealth {
    Online,
    Degraded,
    Faulted,
    Offline,
    Removed,
    Unavail,
    Other(String),
}

impl PoolHealth {
    pub fn parse(s: &str) -> PoolHealth {
        match s {
            "ONLINE" => PoolHealth::Online,
            "DEGRADED" => PoolHealth::Degraded,
            "FAULTED" => PoolHealth::Faulted,
            "OFFLINE" => PoolHealth::Offline,
            "REMOVED" => PoolHealth::Removed,
            "UNAVAIL" => PoolHealth::Unavail,
            other => PoolHealth::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PoolHealth::Online => "ONLINE",
            PoolHealth::Degraded => "DEGRADED",
            PoolHealth::Faulted => "FAULTED",
            PoolHealth::Offline => "OFFLINE",
            PoolHealth::Removed => "REMOVED",
            PoolHealth::Unavail => "UNAVAIL",
            PoolHealth::Other(s) => s,
        }
    }
}

impl fmt::Display for PoolHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `zpool_status_t` from `zpool_get_status`: why a pool needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStatus {
    CorruptCache,
    MissingDevRedundant,
    MissingDevNoRedundant,
    CorruptLabelRedundant,
    CorruptLabelNoRedundant,
    BadGuidSum,
    CorruptPool,
    CorruptData,
    FailingDev,
    VersionNewer,
    HostidMismatch,
    HostidActive,
    HostidRequired,
    IoFailureWait,
    IoFailureContinue,
    IoFailureMmp,
    BadLog,
    Errata,
    UnsupportedFeatureRead,
    UnsupportedFeatureWrite,
    FaultedDevRedundant,
    FaultedDevNoRedundant,
    VersionOlder,
    FeatureDisabled,
    Resilvering,
    OfflineDev,
    RemovedDev,
    Rebuilding,
    RebuildScrub,
    NonNativeAshift,
    CompatibilityError,
    IncompatibleFeature,
    /// Nothing to report
    Ok,
    Unknown(i32),
}

/// OpenZFS 2.1 numbering, indexed by raw value
#[cfg(not(feature = "iscsi"))]
const STATUS_TABLE: &[PoolStatus] = &[
    PoolStatus::CorruptCache,
    PoolStatus::MissingDevRedundant,
    PoolStatus::MissingDevNoRedundant,
    PoolStatus::CorruptLabelRedundant,
    PoolStatus::CorruptLabelNoRedundant,
    PoolStatus::BadGuidSum,
    PoolStatus::CorruptPool,
    PoolStatus::CorruptData,
    PoolStatus::FailingDev,
    PoolStatus::VersionNewer,
    PoolStatus::HostidMismatch,
    PoolStatus::HostidActive,
    PoolStatus::HostidRequired,
    PoolStatus::IoFailureWait,
    PoolStatus::IoFailureContinue,
    PoolStatus::IoFailureMmp,
    PoolStatus::BadLog,
    PoolStatus::Errata,
    PoolStatus::UnsupportedFeatureRead,
    PoolStatus::UnsupportedFeatureWrite,
    PoolStatus::FaultedDevRedundant,
    PoolStatus::FaultedDevNoRedundant,
    PoolStatus::VersionOlder,
    PoolStatus::FeatureDisabled,
    PoolStatus::Resilvering,
    PoolStatus::OfflineDev,
    PoolStatus::RemovedDev,
    PoolStatus::Rebuilding,
    PoolStatus::RebuildScrub,
    PoolStatus::NonNativeAshift,
    PoolStatus::CompatibilityError,
    PoolStatus::IncompatibleFeature,
    PoolStatus::Ok,
];

/// Legacy Solaris numbering, as far as it was verified
#[cfg(feature = "iscsi")]
const STATUS_TABLE: &[PoolStatus] = &[
    PoolStatus::CorruptCache,
    PoolStatus::MissingDevRedundant,
    PoolStatus::MissingDevNoRedundant,
    PoolStatus::CorruptLabelRedundant,
    PoolStatus::CorruptLabelNoRedundant,
    PoolStatus::BadGuidSum,
    PoolStatus::CorruptPool,
    PoolStatus::CorruptData,
    PoolStatus::FailingDev,
    PoolStatus::VersionNewer,
    PoolStatus::HostidMismatch,
    PoolStatus::VersionOlder,
    PoolStatus::Resilvering,
    PoolStatus::OfflineDev,
    PoolStatus::Ok,
];

impl PoolStatus {
    pub fn from_raw(raw: c_int) -> PoolStatus {
        usize::try_from(raw)
            .ok()
            .and_then(|i| STATUS_TABLE.get(i))
            .copied()
            .unwrap_or(PoolStatus::Unknown(raw))
    }

    /// Native value in this libzfs layout, `None` if the layout lacks it
    pub fn raw(self) -> Option<c_int> {
        STATUS_TABLE
            .iter()
            .position(|s| *s == self)
            .and_then(|i| c_int::try_from(i).ok())
    }

    pub fn is_ok(self) -> bool {
        self == PoolStatus::Ok
    }
}

// ============================================================================
// Property values
// ============================================================================

/// Property value read from a pool or dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Integer(u64),
    Text(String),
}

impl PropValue {
    /// libzfs prints `-` for values that do not apply; those become `None`.
    pub fn from_display(s: &str) -> Option<PropValue> {
        if s == "-" {
            None
        } else {
            Some(PropValue::Text(s.to_string()))
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            PropValue::Integer(n) => Some(*n),
            PropValue::Text(s) => s.parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            PropValue::Integer(_) => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Integer(n) => write!(f, "{}", n),
            PropValue::Text(s) => f.write_str(s),
        }
    }
}
