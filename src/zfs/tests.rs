// zfs/tests.rs
// Unit tests for the libzfs wrappers

#![cfg(test)]

use super::error::{ErrorKind, LastError, ZfsError};
use super::helpers::{build_props_nvlist, buf_to_string, DatasetName, PoolName, MAX_NAME_LEN};
use super::types::{DatasetType, PoolHealth, PoolState, PoolStatus, PropValue, TypeMask};
use std::collections::BTreeMap;

// -------------------------------------------------------------------------
// Error Table Tests
// -------------------------------------------------------------------------

/// Test: first and common codes map to their identities
#[cfg(not(feature = "iscsi"))]
#[test]
fn test_error_table_openzfs_codes() {
    assert_eq!(ErrorKind::from_code(2000), ErrorKind::NoMemory);
    assert_eq!(ErrorKind::from_code(2007), ErrorKind::DatasetBusy);
    assert_eq!(ErrorKind::from_code(2008), ErrorKind::DatasetExists);
    assert_eq!(ErrorKind::from_code(2009), ErrorKind::NotFound);
    assert_eq!(ErrorKind::from_code(2013), ErrorKind::InvalidName);
    assert_eq!(ErrorKind::from_code(2031), ErrorKind::Perm);
    assert_eq!(ErrorKind::from_code(2043), ErrorKind::NameTooLong);
    assert_eq!(ErrorKind::from_code(2052), ErrorKind::ShareSmbFailed);
    assert_eq!(ErrorKind::from_code(2064), ErrorKind::PostSplitOnline);
}

/// Test: pool-activity codes added after the split are told apart
#[cfg(not(feature = "iscsi"))]
#[test]
fn test_error_table_openzfs_activity_codes() {
    assert_eq!(ErrorKind::from_code(2065), ErrorKind::Scrubbing);
    assert_eq!(ErrorKind::from_code(2069), ErrorKind::PoolReadOnly);
    assert_eq!(ErrorKind::from_code(2074), ErrorKind::CheckpointExists);
    assert_eq!(ErrorKind::from_code(2081), ErrorKind::Initializing);
    assert_eq!(ErrorKind::from_code(2084), ErrorKind::Trimming);
    assert_eq!(ErrorKind::from_code(2089), ErrorKind::Rebuilding);
    assert_eq!(ErrorKind::PoolReadOnly.code(), Some(2069));
    // EZFS_UNKNOWN itself
    assert_eq!(ErrorKind::from_code(2090), ErrorKind::Unknown);
}

/// Test: legacy layout still has the codes that were later removed
#[cfg(feature = "iscsi")]
#[test]
fn test_error_table_legacy_codes() {
    assert_eq!(ErrorKind::from_code(2013), ErrorKind::VolumeHasData);
    assert_eq!(ErrorKind::from_code(2014), ErrorKind::InvalidName);
    assert_eq!(ErrorKind::from_code(2032), ErrorKind::DevLinks);
    assert_eq!(ErrorKind::from_code(2041), ErrorKind::UnshareIscsiFailed);
    assert_eq!(ErrorKind::from_code(2042), ErrorKind::ShareIscsiFailed);
    assert_eq!(ErrorKind::from_code(2046), ErrorKind::NameTooLong);
    assert_eq!(ErrorKind::from_code(2047), ErrorKind::Unknown);
}

/// Test: unmapped codes fall back to Unknown
#[test]
fn test_error_table_unmapped_codes() {
    assert_eq!(ErrorKind::from_code(0), ErrorKind::Unknown);
    assert_eq!(ErrorKind::from_code(-1), ErrorKind::Unknown);
    assert_eq!(ErrorKind::from_code(1999), ErrorKind::Unknown);
    assert_eq!(ErrorKind::from_code(9999), ErrorKind::Unknown);
    assert_eq!(ErrorKind::Unknown.code(), None);
}

/// Test: every mapped identity round-trips through its code
#[test]
fn test_error_table_lookup_is_consistent() {
    let mut mapped = 0;
    for kind in ErrorKind::ALL {
        if let Some(code) = kind.code() {
            assert_eq!(ErrorKind::from_code(code), *kind, "code {}", code);
            mapped += 1;
        }
    }
    assert!(mapped >= 47);
}

/// Test: identity names are stable and resolvable
#[test]
fn test_error_kind_names() {
    assert_eq!(ErrorKind::DatasetBusy.name(), "DatasetBusy");
    assert_eq!(ErrorKind::NotFound.to_string(), "NotFound");
    assert_eq!(ErrorKind::from_name("Perm"), Some(ErrorKind::Perm));
    assert_eq!(ErrorKind::from_name("NoSuchThing"), None);
}

// -------------------------------------------------------------------------
// Error Type Tests
// -------------------------------------------------------------------------

/// Test: a "no error" state reports itself as such
#[test]
fn test_last_error_without_failure() {
    let last = LastError {
        code: 0,
        action: String::new(),
        description: "no error".to_string(),
    };
    assert!(!last.is_error());
    assert_eq!(last.kind(), ErrorKind::Unknown);
}

/// Test: converting the last error keeps code, action and description
#[cfg(not(feature = "iscsi"))]
#[test]
fn test_last_error_into_native_error() {
    let last = LastError {
        code: 2009,
        action: "cannot open 'fakepool'".to_string(),
        description: "no such pool".to_string(),
    };
    let err: ZfsError = last.into();
    assert!(err.is_not_found());
    match err {
        ZfsError::Native {
            kind,
            code,
            action,
            description,
        } => {
            assert_eq!(kind, ErrorKind::NotFound);
            assert_eq!(code, 2009);
            assert_eq!(action, "cannot open 'fakepool'");
            assert_eq!(description, "no such pool");
        }
        other => panic!("Expected Native error, got {:?}", other),
    }
}

/// Test: error messages name the problem
#[test]
fn test_error_display() {
    let err = ZfsError::UnsupportedType {
        operation: "clone",
        dataset_type: DatasetType::Filesystem,
    };
    assert_eq!(err.to_string(), "clone is not supported on a filesystem");
    assert_eq!(err.kind(), None);

    let err = ZfsError::invalid_usage("bad");
    assert_eq!(err.to_string(), "invalid usage: bad");
}

// -------------------------------------------------------------------------
// Type Mask Tests
// -------------------------------------------------------------------------

/// Test: masks carry the native zfs_type_t bits
#[test]
fn test_type_mask_bits() {
    assert_eq!(TypeMask::FILESYSTEM.bits(), 1);
    assert_eq!(TypeMask::SNAPSHOT.bits(), 2);
    assert_eq!(TypeMask::VOLUME.bits(), 4);
    assert_eq!(TypeMask::POOL.bits(), 8);
    assert_eq!(
        TypeMask::DATASET,
        TypeMask::FILESYSTEM | TypeMask::SNAPSHOT | TypeMask::VOLUME
    );
    assert_eq!(TypeMask::default(), TypeMask::DATASET);
}

/// Test: masks built from types and raw bits
#[test]
fn test_type_mask_construction() {
    let mask: TypeMask = [DatasetType::Filesystem, DatasetType::Volume]
        .into_iter()
        .collect();
    assert!(mask.contains(DatasetType::Filesystem));
    assert!(mask.contains(DatasetType::Volume));
    assert!(!mask.contains(DatasetType::Snapshot));

    let empty: TypeMask = std::iter::empty::<DatasetType>().collect();
    assert!(empty.is_empty());

    assert_eq!(TypeMask::from_bits(7), Some(TypeMask::DATASET));
    assert_eq!(TypeMask::from_bits(0), None);
    assert_eq!(TypeMask::from_bits(16), None);
}

/// Test: raw type values decode, bookmarks are not modelled
#[test]
fn test_dataset_type_from_raw() {
    assert_eq!(DatasetType::from_raw(1), Some(DatasetType::Filesystem));
    assert_eq!(DatasetType::from_raw(2), Some(DatasetType::Snapshot));
    assert_eq!(DatasetType::from_raw(4), Some(DatasetType::Volume));
    assert_eq!(DatasetType::from_raw(8), Some(DatasetType::Pool));
    assert_eq!(DatasetType::from_raw(16), None);
    assert_eq!(DatasetType::Volume.raw(), 4);
}

// -------------------------------------------------------------------------
// Name Validation Tests
// -------------------------------------------------------------------------

/// Test: ordinary dataset and snapshot names are accepted
#[test]
fn test_dataset_name_valid() {
    let name = DatasetName::new("tank/home").unwrap();
    assert_eq!(name.as_str(), "tank/home");
    assert_eq!(name.pool(), "tank");
    assert_eq!(name.parent(), Some("tank"));
    assert!(!name.is_snapshot());

    let snap = DatasetName::new("tank/home@monday").unwrap();
    assert!(snap.is_snapshot());
    assert_eq!(snap.dataset(), "tank/home");
    assert_eq!(snap.snapshot_name(), Some("monday"));
    assert_eq!(snap.parent(), Some("tank/home"));

    let root = DatasetName::new("tank").unwrap();
    assert_eq!(root.parent(), None);
    assert!(DatasetName::new("tank/my data:v1.0_x-y").is_ok());
}

/// Test: malformed names never reach libzfs
#[test]
fn test_dataset_name_invalid() {
    for bad in [
        "",
        "tank//home",
        "tank/home/",
        "/tank",
        "1tank/home",
        "tank/ho\0me",
        "tank/home@",
        "tank/home@a@b",
        "tank@snap/child",
        "tank/home#bookmark",
        "tank/h*me",
    ] {
        let err = DatasetName::new(bad).unwrap_err();
        assert!(
            matches!(err, ZfsError::InvalidUsage(_)),
            "'{}' should be rejected",
            bad.escape_default()
        );
    }

    let long = format!("tank/{}", "a".repeat(MAX_NAME_LEN));
    assert!(DatasetName::new(long).is_err());
}

/// Test: pool names are a single component
#[test]
fn test_pool_name_validation() {
    assert_eq!(PoolName::new("tpool").unwrap().to_string(), "tpool");
    assert!("tank".parse::<PoolName>().is_ok());
    assert!(PoolName::new("tank/home").is_err());
    assert!(PoolName::new("tank@snap").is_err());
    assert!(PoolName::new("").is_err());
    assert!(PoolName::new("0pool").is_err());
}

// -------------------------------------------------------------------------
// Property Value Tests
// -------------------------------------------------------------------------

/// Test: the "-" display sentinel means no value
#[test]
fn test_prop_value_from_display() {
    assert_eq!(PropValue::from_display("-"), None);
    assert_eq!(
        PropValue::from_display("on"),
        Some(PropValue::Text("on".to_string()))
    );
    assert_eq!(PropValue::from_display(""), Some(PropValue::Text(String::new())));
}

/// Test: accessors and JSON shape
#[test]
fn test_prop_value_accessors() {
    let guid = PropValue::Integer(1234);
    assert_eq!(guid.as_u64(), Some(1234));
    assert_eq!(guid.as_str(), None);
    assert_eq!(guid.to_string(), "1234");
    assert_eq!(serde_json::to_value(&guid).unwrap(), serde_json::json!(1234));

    let text = PropValue::Text("lz4".to_string());
    assert_eq!(text.as_str(), Some("lz4"));
    assert_eq!(text.as_u64(), None);
    assert_eq!(serde_json::to_value(&text).unwrap(), serde_json::json!("lz4"));
}

/// Test: property buffers stop at the first NUL
#[test]
fn test_buf_to_string() {
    let mut buf = [0 as libc::c_char; 8];
    for (i, b) in b"off".iter().enumerate() {
        buf[i] = *b as libc::c_char;
    }
    assert_eq!(buf_to_string(&buf), "off");
    assert_eq!(buf_to_string(&[0; 4]), "");
}

/// Test: no properties means a NULL nvlist
#[test]
fn test_empty_props_build_no_nvlist() {
    let props = BTreeMap::new();
    assert!(build_props_nvlist(&props).unwrap().is_none());
}

// -------------------------------------------------------------------------
// Pool State Tests
// -------------------------------------------------------------------------

/// Test: pool_state_t values decode
#[test]
fn test_pool_state_from_raw() {
    assert_eq!(PoolState::from_raw(0), PoolState::Active);
    assert_eq!(PoolState::from_raw(1), PoolState::Exported);
    assert_eq!(PoolState::from_raw(2), PoolState::Destroyed);
    assert_eq!(PoolState::from_raw(3), PoolState::Spare);
    assert_eq!(PoolState::from_raw(7), PoolState::PotentiallyActive);
    assert_eq!(PoolState::from_raw(42), PoolState::Unknown(42));
}

/// Test: health strings parse, unknown ones are kept verbatim
#[test]
fn test_pool_health_parse() {
    assert_eq!(PoolHealth::parse("ONLINE"), PoolHealth::Online);
    assert_eq!(PoolHealth::parse("DEGRADED"), PoolHealth::Degraded);
    assert_eq!(PoolHealth::parse("SUSPENDED").as_str(), "SUSPENDED");
    assert_eq!(PoolHealth::Faulted.to_string(), "FAULTED");
}

/// Test: pool state serializes as snake_case, not Debug text
#[test]
fn test_pool_state_serializes() {
    assert_eq!(
        serde_json::to_value(PoolState::PotentiallyActive).unwrap(),
        "potentially_active"
    );
    assert_eq!(
        serde_json::to_value(PoolState::Unknown(9)).unwrap(),
        serde_json::json!({ "unknown": 9 })
    );
}

/// Test: zpool_status_t values decode in the OpenZFS layout
#[cfg(not(feature = "iscsi"))]
#[test]
fn test_pool_status_from_raw() {
    assert_eq!(PoolStatus::from_raw(0), PoolStatus::CorruptCache);
    assert_eq!(PoolStatus::from_raw(1), PoolStatus::MissingDevRedundant);
    assert_eq!(PoolStatus::from_raw(10), PoolStatus::HostidMismatch);
    assert_eq!(PoolStatus::from_raw(16), PoolStatus::BadLog);
    assert_eq!(PoolStatus::from_raw(24), PoolStatus::Resilvering);
    assert_eq!(PoolStatus::from_raw(27), PoolStatus::Rebuilding);
    assert_eq!(PoolStatus::from_raw(32), PoolStatus::Ok);
    assert_eq!(PoolStatus::from_raw(33), PoolStatus::Unknown(33));
    assert_eq!(PoolStatus::from_raw(-1), PoolStatus::Unknown(-1));
    assert_eq!(PoolStatus::Ok.raw(), Some(32));
    assert!(PoolStatus::from_raw(32).is_ok());
}

/// Test: zpool_status_t values decode in the legacy layout
#[cfg(feature = "iscsi")]
#[test]
fn test_pool_status_from_raw_legacy() {
    assert_eq!(PoolStatus::from_raw(0), PoolStatus::CorruptCache);
    assert_eq!(PoolStatus::from_raw(10), PoolStatus::HostidMismatch);
    assert_eq!(PoolStatus::from_raw(11), PoolStatus::VersionOlder);
    assert_eq!(PoolStatus::from_raw(12), PoolStatus::Resilvering);
    assert_eq!(PoolStatus::from_raw(13), PoolStatus::OfflineDev);
    assert_eq!(PoolStatus::from_raw(14), PoolStatus::Ok);
    assert_eq!(PoolStatus::from_raw(15), PoolStatus::Unknown(15));
    assert_eq!(PoolStatus::BadLog.raw(), None);
}

/// Test: pool status serializes as snake_case
#[test]
fn test_pool_status_serializes() {
    assert_eq!(serde_json::to_value(PoolStatus::Ok).unwrap(), "ok");
    assert_eq!(
        serde_json::to_value(PoolStatus::MissingDevRedundant).unwrap(),
        "missing_dev_redundant"
    );
}

// -------------------------------------------------------------------------
// Native Signature Tests
// -------------------------------------------------------------------------

/// Test: calls that changed shape are declared for OpenZFS 2.1
#[cfg(not(feature = "iscsi"))]
#[test]
fn test_openzfs_signatures() {
    use super::ffi::{self, boolean_t, renameflags_t, zfs_handle_t, zfs_iter_f};
    use libc::{c_char, c_int, c_void};

    let _: unsafe extern "C" fn(
        *mut zfs_handle_t,
        boolean_t,
        zfs_iter_f,
        *mut c_void,
        u64,
        u64,
    ) -> c_int = ffi::zfs_iter_snapshots;
    let _: unsafe extern "C" fn(*mut zfs_handle_t, *const c_char, renameflags_t) -> c_int =
        ffi::zfs_rename;
    let _: unsafe extern "C" fn(*mut zfs_handle_t, boolean_t) -> c_int = ffi::zfs_destroy;
    assert_eq!(
        std::mem::size_of::<renameflags_t>(),
        std::mem::size_of::<c_int>()
    );
}

/// Test: calls that changed shape are declared for legacy libzfs
#[cfg(feature = "iscsi")]
#[test]
fn test_legacy_signatures() {
    use super::ffi::{self, boolean_t, zfs_handle_t, zfs_iter_f, zpool_handle_t};
    use libc::{c_char, c_int, c_void};

    let _: unsafe extern "C" fn(*mut zfs_handle_t, zfs_iter_f, *mut c_void) -> c_int =
        ffi::zfs_iter_snapshots;
    let _: unsafe extern "C" fn(*mut zfs_handle_t, *const c_char, boolean_t) -> c_int =
        ffi::zfs_rename;
    let _: unsafe extern "C" fn(*mut zfs_handle_t) -> c_int = ffi::zfs_destroy;
    let _: unsafe extern "C" fn(*mut zpool_handle_t, *mut *mut c_char) -> c_int =
        ffi::zpool_get_status;
}

// -------------------------------------------------------------------------
// Fixture Tests (need a live pool)
// -------------------------------------------------------------------------
// zpool create tpool <vdev>
// zfs create tpool/home
// zfs create tpool/thome
// zfs snapshot tpool/thome@snap
// zfs clone tpool/thome@snap tpool/thomeclone

mod fixture {
    use crate::zfs::{
        Dataset, DatasetName, DatasetType, ErrorKind, LazySession, Pool, PoolHealth, PoolName,
        PoolState, PoolStatus, PropValue, Session, TypeMask, TypedDataset, ZfsError,
    };

    fn ds(name: &str) -> DatasetName {
        DatasetName::new(name).unwrap()
    }

    #[test]
    #[ignore = "Requires libzfs"]
    fn test_session_starts_without_error() {
        let session = Session::new().unwrap();
        assert_eq!(session.errno(), 0);
        assert_eq!(session.error_action(), "");
        assert_eq!(session.error_description(), "no error");
        assert!(!session.last_error().is_error());
        session.print_on_error(true);
        session.print_on_error(false);
    }

    #[test]
    #[ignore = "Requires libzfs"]
    fn test_lazy_session_is_memoized() {
        let lazy = LazySession::new();
        assert!(!lazy.is_initialized());
        let first = lazy.get().unwrap() as *const Session;
        let second = lazy.get().unwrap() as *const Session;
        assert_eq!(first, second);
    }

    #[test]
    #[ignore = "Requires ZFS pool 'tpool'"]
    fn test_open_pool() {
        let session = Session::new().unwrap();
        let pool = session.open_pool(&PoolName::new("tpool").unwrap()).unwrap();
        assert_eq!(pool.name(), "tpool");
        assert_eq!(pool.state(), PoolState::Active);
        assert!(pool.guid() > 0);
        assert!(matches!(pool.get("guid").unwrap(), Some(PropValue::Integer(_))));
        assert!(matches!(pool.get("version").unwrap(), Some(PropValue::Integer(_))));
        assert_eq!(pool.get("altroot").unwrap(), None);
        assert_eq!(pool.get("no_such_property").unwrap(), None);
        let delegation = pool.get("delegation").unwrap().unwrap();
        assert!(["on", "off"].contains(&delegation.to_string().as_str()));
        assert!(pool.space_total() >= pool.space_used());
        assert_eq!(pool.health(), PoolHealth::Online);
        assert_eq!(pool.status(), PoolStatus::Ok);
    }

    #[test]
    #[ignore = "Requires libzfs"]
    fn test_open_missing_pool() {
        let session = Session::new().unwrap();
        let name = PoolName::new("fakepool").unwrap();
        let err = session.open_pool(&name).err().unwrap();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        assert!(session.try_open_pool(&name).unwrap().is_none());
    }

    #[test]
    #[ignore = "Requires ZFS pool 'tpool'"]
    fn test_pool_iteration() {
        let session = Session::new().unwrap();
        let names = Pool::names(&session).unwrap();
        assert!(names.contains(&"tpool".to_string()));
    }

    #[test]
    #[ignore = "Requires ZFS pool 'tpool'"]
    fn test_open_filesystem() {
        let session = Session::new().unwrap();
        let home = session
            .open_dataset(&ds("tpool/home"), TypeMask::FILESYSTEM)
            .unwrap();
        assert_eq!(home.name(), "tpool/home");
        assert_eq!(home.dataset_type(), DatasetType::Filesystem);
        assert!(matches!(home.get("version").unwrap(), Some(PropValue::Integer(_))));
    }

    #[test]
    #[ignore = "Requires ZFS pool 'tpool'"]
    fn test_open_missing_dataset() {
        let session = Session::new().unwrap();
        let name = ds("tpool/this_will_probably_not_exist");
        let err = session.open_dataset(&name, TypeMask::FILESYSTEM).err().unwrap();
        assert!(err.is_not_found());
        assert!(session
            .try_open_dataset(&name, TypeMask::FILESYSTEM)
            .unwrap()
            .is_none());
        assert!(!session.dataset_exists(&name, TypeMask::DATASET));
    }

    #[test]
    #[ignore = "Requires ZFS pool 'tpool'"]
    fn test_property_round_trip() {
        let session = Session::new().unwrap();
        let home = session.open_dataset(&ds("tpool/home"), TypeMask::FILESYSTEM).unwrap();
        home.set("readonly", "on").unwrap();
        assert_eq!(home.get("readonly").unwrap(), Some(PropValue::Text("on".into())));
        home.set("readonly", "off").unwrap();

        home.set("com.example:owner", "ops").unwrap();
        assert_eq!(
            home.get_user_prop("com.example:owner").unwrap(),
            Some("ops".to_string())
        );
        assert!(matches!(
            home.get("com.example:owner"),
            Err(ZfsError::InvalidUsage(_))
        ));
        assert!(matches!(
            home.get_user_prop("compression"),
            Err(ZfsError::InvalidUsage(_))
        ));
    }

    #[test]
    #[ignore = "Requires ZFS pool 'tpool'"]
    fn test_type_gated_operations() {
        let session = Session::new().unwrap();
        let home = session.open_dataset(&ds("tpool/home"), TypeMask::FILESYSTEM).unwrap();
        let thome = session.open_dataset(&ds("tpool/thome"), TypeMask::FILESYSTEM).unwrap();
        let snap = session.open_dataset(&ds("tpool/thome@snap"), TypeMask::SNAPSHOT).unwrap();

        assert!(matches!(
            home.clone_to(&ds("tpool/nope")),
            Err(ZfsError::UnsupportedType { .. })
        ));
        assert!(matches!(
            snap.rollback(&snap, false),
            Err(ZfsError::UnsupportedType { .. })
        ));
        assert!(matches!(
            home.rollback(&thome, false),
            Err(ZfsError::InvalidUsage(_))
        ));
        assert!(matches!(
            home.rollback(&snap, false),
            Err(ZfsError::InvalidUsage(_))
        ));

        match snap.into_typed() {
            TypedDataset::Snapshot(s) => {
                assert_eq!(s.name(), "tpool/thome@snap");
                assert_eq!(s.dataset_type(), DatasetType::Snapshot);
            }
            _ => panic!("Expected Snapshot variant"),
        }

        let typed = thome.into_typed();
        assert_eq!(typed.dataset_type(), DatasetType::Filesystem);
        match typed {
            TypedDataset::Filesystem(fs) => {
                assert!(fs
                    .snapshot_names()
                    .unwrap()
                    .contains(&"tpool/thome@snap".to_string()));
                assert_eq!(fs.into_inner().name(), "tpool/thome");
            }
            _ => panic!("Expected Filesystem variant"),
        }
    }

    #[test]
    #[ignore = "Requires ZFS pool 'tpool'"]
    fn test_dataset_iteration() {
        let session = Session::new().unwrap();
        let roots = Dataset::root_names(&session).unwrap();
        assert!(roots.contains(&"tpool".to_string()));

        let pool_root = session.open_dataset(&ds("tpool"), TypeMask::FILESYSTEM).unwrap();
        let children = pool_root.filesystem_names().unwrap();
        assert!(children.contains(&"tpool/home".to_string()));

        let thome = session.open_dataset(&ds("tpool/thome"), TypeMask::FILESYSTEM).unwrap();
        assert!(thome
            .snapshot_names()
            .unwrap()
            .contains(&"tpool/thome@snap".to_string()));
        assert!(thome
            .dependent_names()
            .unwrap()
            .contains(&"tpool/thomeclone".to_string()));

        let home = session.open_dataset(&ds("tpool/home"), TypeMask::FILESYSTEM).unwrap();
        let mut visits = 0;
        home.for_each_snapshot(|_| visits += 1).unwrap();
        assert_eq!(visits, 0);
    }

    #[test]
    #[ignore = "Requires ZFS pool 'tpool'"]
    fn test_create_snapshot_clone_destroy() {
        let session = Session::new().unwrap();
        let fs = ds("tpool/zetta_scratch");
        session
            .create_dataset(&fs, DatasetType::Filesystem, &Default::default())
            .unwrap();
        assert!(session.dataset_exists(&fs, TypeMask::FILESYSTEM));

        let snap = session.snapshot(&ds("tpool/zetta_scratch@s1")).unwrap();
        assert_eq!(snap.dataset_type(), DatasetType::Snapshot);
        let clone = snap.clone_to(&ds("tpool/zetta_scratch_clone")).unwrap();
        assert_eq!(clone.dataset_type(), DatasetType::Filesystem);

        clone.destroy().unwrap();
        snap.destroy().unwrap();
        session
            .open_dataset(&fs, TypeMask::FILESYSTEM)
            .unwrap()
            .destroy()
            .unwrap();
        assert!(!session.dataset_exists(&fs, TypeMask::DATASET));
    }
}
