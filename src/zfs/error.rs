// zfs/error.rs
// Native error-code table and the crate error type

use super::types::DatasetType;
use std::fmt;
use thiserror::Error;

macro_rules! error_kinds {
    ($($(#[$doc:meta])* $kind:ident),+ $(,)?) => {
        /// Identity of a libzfs failure (`zfs_error_t`).
        ///
        /// Callers match on the kind instead of parsing description strings.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrorKind {
            $($(#[$doc])* $kind,)+
        }

        impl ErrorKind {
            /// Every identity, in declaration order
            pub const ALL: &'static [ErrorKind] = &[$(ErrorKind::$kind,)+];

            /// Stable identity name, e.g. `DatasetBusy`
            pub fn name(self) -> &'static str {
                match self {
                    $(ErrorKind::$kind => stringify!($kind),)+
                }
            }
        }
    };
}

error_kinds! {
    NoMemory,
    BadProperty,
    PropertyReadOnly,
    PropertyType,
    PropertyNonInheritable,
    PropertySpace,
    BadType,
    DatasetBusy,
    DatasetExists,
    NotFound,
    BadStream,
    DatasetReadOnly,
    VolumeTooBig,
    /// Legacy libzfs only
    VolumeHasData,
    InvalidName,
    BadRestore,
    BadBackup,
    BadTarget,
    NoDevice,
    BadDevice,
    NoReplicas,
    Resilvering,
    BadVersion,
    PoolUnavailable,
    DeviceOverflow,
    BadPath,
    CrossTarget,
    Zoned,
    MountFailed,
    UnmountFailed,
    UnshareNfsFailed,
    ShareNfsFailed,
    /// Legacy libzfs only
    DevLinks,
    Perm,
    NoSpace,
    Fault,
    Io,
    Interrupted,
    IsSpare,
    InvalidConfig,
    Recursive,
    NoHistory,
    /// Legacy libzfs only
    UnshareIscsiFailed,
    /// Legacy libzfs only
    ShareIscsiFailed,
    PoolProps,
    PoolNotSupported,
    PoolInvalidArg,
    NameTooLong,
    OpenFailed,
    NoCapacity,
    LabelFailed,
    BadWho,
    BadPerm,
    BadPermSet,
    NoDelegation,
    UnshareSmbFailed,
    ShareSmbFailed,
    BadCache,
    IsL2Cache,
    VdevNotSupported,
    NotSupported,
    ActiveSpare,
    UnplayedLogs,
    RefTagRele,
    RefTagHold,
    TagTooLong,
    PipeFailed,
    ThreadCreateFailed,
    PostSplitOnline,
    Scrubbing,
    NoScrub,
    Diff,
    DiffData,
    PoolReadOnly,
    ScrubPaused,
    ActivePool,
    CryptoFailed,
    NoPending,
    CheckpointExists,
    DiscardingCheckpoint,
    NoCheckpoint,
    DeviceRemovalInProgress,
    VdevTooBig,
    IocNotSupported,
    TooMany,
    Initializing,
    NoInitialize,
    WrongParent,
    Trimming,
    NoTrim,
    TrimNotSupported,
    NoResilverDefer,
    ExportInProgress,
    Rebuilding,
    /// Any code missing from the table, including 0
    Unknown,
}

// ============================================================================
// Code tables
// ============================================================================

/// OpenZFS 2.0/2.1 `zfs_error_t` numbering, EZFS_UNKNOWN is 2090
#[cfg(not(feature = "iscsi"))]
const CODE_TABLE: &[(i32, ErrorKind)] = &[
    (2000, ErrorKind::NoMemory),
    (2001, ErrorKind::BadProperty),
    (2002, ErrorKind::PropertyReadOnly),
    (2003, ErrorKind::PropertyType),
    (2004, ErrorKind::PropertyNonInheritable),
    (2005, ErrorKind::PropertySpace),
    (2006, ErrorKind::BadType),
    (2007, ErrorKind::DatasetBusy),
    (2008, ErrorKind::DatasetExists),
    (2009, ErrorKind::NotFound),
    (2010, ErrorKind::BadStream),
    (2011, ErrorKind::DatasetReadOnly),
    (2012, ErrorKind::VolumeTooBig),
    (2013, ErrorKind::InvalidName),
    (2014, ErrorKind::BadRestore),
    (2015, ErrorKind::BadBackup),
    (2016, ErrorKind::BadTarget),
    (2017, ErrorKind::NoDevice),
    (2018, ErrorKind::BadDevice),
    (2019, ErrorKind::NoReplicas),
    (2020, ErrorKind::Resilvering),
    (2021, ErrorKind::BadVersion),
    (2022, ErrorKind::PoolUnavailable),
    (2023, ErrorKind::DeviceOverflow),
    (2024, ErrorKind::BadPath),
    (2025, ErrorKind::CrossTarget),
    (2026, ErrorKind::Zoned),
    (2027, ErrorKind::MountFailed),
    (2028, ErrorKind::UnmountFailed),
    (2029, ErrorKind::UnshareNfsFailed),
    (2030, ErrorKind::ShareNfsFailed),
    (2031, ErrorKind::Perm),
    (2032, ErrorKind::NoSpace),
    (2033, ErrorKind::Fault),
    (2034, ErrorKind::Io),
    (2035, ErrorKind::Interrupted),
    (2036, ErrorKind::IsSpare),
    (2037, ErrorKind::InvalidConfig),
    (2038, ErrorKind::Recursive),
    (2039, ErrorKind::NoHistory),
    (2040, ErrorKind::PoolProps),
    (2041, ErrorKind::PoolNotSupported),
    (2042, ErrorKind::PoolInvalidArg),
    (2043, ErrorKind::NameTooLong),
    (2044, ErrorKind::OpenFailed),
    (2045, ErrorKind::NoCapacity),
    (2046, ErrorKind::LabelFailed),
    (2047, ErrorKind::BadWho),
    (2048, ErrorKind::BadPerm),
    (2049, ErrorKind::BadPermSet),
    (2050, ErrorKind::NoDelegation),
    (2051, ErrorKind::UnshareSmbFailed),
    (2052, ErrorKind::ShareSmbFailed),
    (2053, ErrorKind::BadCache),
    (2054, ErrorKind::IsL2Cache),
    (2055, ErrorKind::VdevNotSupported),
    (2056, ErrorKind::NotSupported),
    (2057, ErrorKind::ActiveSpare),
    (2058, ErrorKind::UnplayedLogs),
    (2059, ErrorKind::RefTagRele),
    (2060, ErrorKind::RefTagHold),
    (2061, ErrorKind::TagTooLong),
    (2062, ErrorKind::PipeFailed),
    (2063, ErrorKind::ThreadCreateFailed),
    (2064, ErrorKind::PostSplitOnline),
    (2065, ErrorKind::Scrubbing),
    (2066, ErrorKind::NoScrub),
    (2067, ErrorKind::Diff),
    (2068, ErrorKind::DiffData),
    (2069, ErrorKind::PoolReadOnly),
    (2070, ErrorKind::ScrubPaused),
    (2071, ErrorKind::ActivePool),
    (2072, ErrorKind::CryptoFailed),
    (2073, ErrorKind::NoPending),
    (2074, ErrorKind::CheckpointExists),
    (2075, ErrorKind::DiscardingCheckpoint),
    (2076, ErrorKind::NoCheckpoint),
    (2077, ErrorKind::DeviceRemovalInProgress),
    (2078, ErrorKind::VdevTooBig),
    (2079, ErrorKind::IocNotSupported),
    (2080, ErrorKind::TooMany),
    (2081, ErrorKind::Initializing),
    (2082, ErrorKind::NoInitialize),
    (2083, ErrorKind::WrongParent),
    (2084, ErrorKind::Trimming),
    (2085, ErrorKind::NoTrim),
    (2086, ErrorKind::TrimNotSupported),
    (2087, ErrorKind::NoResilverDefer),
    (2088, ErrorKind::ExportInProgress),
    (2089, ErrorKind::Rebuilding),
];

/// Solaris libzfs numbering from before SPA version 24.
/// Codes past NAMETOOLONG were never pinned down and fall back to Unknown.
#[cfg(feature = "iscsi")]
const CODE_TABLE: &[(i32, ErrorKind)] = &[
    (2000, ErrorKind::NoMemory),
    (2001, ErrorKind::BadProperty),
    (2002, ErrorKind::PropertyReadOnly),
    (2003, ErrorKind::PropertyType),
    (2004, ErrorKind::PropertyNonInheritable),
    (2005, ErrorKind::PropertySpace),
    (2006, ErrorKind::BadType),
    (2007, ErrorKind::DatasetBusy),
    (2008, ErrorKind::DatasetExists),
    (2009, ErrorKind::NotFound),
    (2010, ErrorKind::BadStream),
    (2011, ErrorKind::DatasetReadOnly),
    (2012, ErrorKind::VolumeTooBig),
    (2013, ErrorKind::VolumeHasData),
    (2014, ErrorKind::InvalidName),
    (2015, ErrorKind::BadRestore),
    (2016, ErrorKind::BadBackup),
    (2017, ErrorKind::BadTarget),
    (2018, ErrorKind::NoDevice),
    (2019, ErrorKind::BadDevice),
    (2020, ErrorKind::NoReplicas),
    (2021, ErrorKind::Resilvering),
    (2022, ErrorKind::BadVersion),
    (2023, ErrorKind::PoolUnavailable),
    (2024, ErrorKind::DeviceOverflow),
    (2025, ErrorKind::BadPath),
    (2026, ErrorKind::CrossTarget),
    (2027, ErrorKind::Zoned),
    (2028, ErrorKind::MountFailed),
    (2029, ErrorKind::UnmountFailed),
    (2030, ErrorKind::UnshareNfsFailed),
    (2031, ErrorKind::ShareNfsFailed),
    (2032, ErrorKind::DevLinks),
    (2033, ErrorKind::Perm),
    (2034, ErrorKind::NoSpace),
    (2035, ErrorKind::Io),
    (2036, ErrorKind::Interrupted),
    (2037, ErrorKind::IsSpare),
    (2038, ErrorKind::InvalidConfig),
    (2039, ErrorKind::Recursive),
    (2040, ErrorKind::NoHistory),
    (2041, ErrorKind::UnshareIscsiFailed),
    (2042, ErrorKind::ShareIscsiFailed),
    (2043, ErrorKind::PoolProps),
    (2044, ErrorKind::PoolNotSupported),
    (2045, ErrorKind::PoolInvalidArg),
    (2046, ErrorKind::NameTooLong),
];

impl ErrorKind {
    /// Map a native `libzfs_errno()` value to its identity
    pub fn from_code(code: i32) -> ErrorKind {
        CODE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, kind)| *kind)
            .unwrap_or(ErrorKind::Unknown)
    }

    /// Native code for this identity, `None` if this libzfs layout lacks it
    pub fn code(self) -> Option<i32> {
        CODE_TABLE
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(c, _)| *c)
    }

    /// Look an identity up by its stable name
    pub fn from_name(name: &str) -> Option<ErrorKind> {
        ErrorKind::ALL.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Last error snapshot
// ============================================================================

/// The library handle's error state right after a native call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub code: i32,
    pub action: String,
    pub description: String,
}

impl LastError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_code(self.code)
    }

    /// False when the handle reports errno 0
    pub fn is_error(&self) -> bool {
        self.code != 0
    }
}

impl From<LastError> for ZfsError {
    fn from(last: LastError) -> Self {
        ZfsError::Native {
            kind: last.kind(),
            code: last.code,
            action: last.action,
            description: last.description,
        }
    }
}

// ============================================================================
// Crate error type
// ============================================================================

#[derive(Debug, Error)]
pub enum ZfsError {
    /// Argument shape violation, raised before any native call
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    #[error("{operation} is not supported on a {dataset_type}")]
    UnsupportedType {
        operation: &'static str,
        dataset_type: DatasetType,
    },

    #[error("{kind}: {description}")]
    Native {
        kind: ErrorKind,
        code: i32,
        action: String,
        description: String,
    },

    #[error("libzfs_init() failed, is the zfs kernel module loaded?")]
    InitFailed,
}

impl ZfsError {
    pub fn invalid_usage(msg: impl Into<String>) -> Self {
        ZfsError::InvalidUsage(msg.into())
    }

    /// Identity of a native failure
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ZfsError::Native { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, ZfsError>;
