// zfs/dataset.rs
// Dataset handle: open, create, properties, rename, snapshot/clone/rollback, destroy

use super::error::{ErrorKind, Result, ZfsError};
use super::ffi::{
    self, zfs_handle_t, DatasetGuard, B_FALSE, B_TRUE, MAXPROPLEN, ZPROP_INVAL, ZPROP_VALUE,
};
use super::helpers::{build_props_nvlist, buf_to_string, read_cstr, to_cstring, DatasetName};
use super::session::Session;
use super::types::{DatasetType, PropValue, TypeMask};
use nvpair_sys::{nvlist_lookup_nvlist, nvlist_lookup_string, nvlist_t};
use std::collections::BTreeMap;
use std::ffi::CString;
use std::ptr;
use tracing::{debug, info};

/// Dataset properties that read back as integers
const INTEGER_PROPS: &[&str] = &["guid", "version"];

/// An open filesystem, volume or snapshot
pub struct Dataset<'s> {
    session: &'s Session,
    handle: DatasetGuard,
    dataset_type: DatasetType,
}

// ============================================================================
// Opening and creating
// ============================================================================

impl Session {
    /// Open a dataset whose type is in `types`; a missing dataset is a `NotFound` error
    pub fn open_dataset(&self, name: &DatasetName, types: TypeMask) -> Result<Dataset<'_>> {
        if types.is_empty() {
            return Err(ZfsError::invalid_usage("type mask must not be empty"));
        }
        let c_name = name.to_cstring();
        let zhp = unsafe { ffi::zfs_open(self.raw(), c_name.as_ptr(), types.bits()) };
        if zhp.is_null() {
            return Err(self.failure("zfs_open", name.as_str()));
        }
        let dataset = Dataset::from_raw(self, zhp)?;
        debug!(dataset = %name, kind = %dataset.dataset_type, "dataset opened");
        Ok(dataset)
    }

    /// Like [`Session::open_dataset`], but a missing dataset is `Ok(None)`
    pub fn try_open_dataset(
        &self,
        name: &DatasetName,
        types: TypeMask,
    ) -> Result<Option<Dataset<'_>>> {
        match self.open_dataset(name, types) {
            Ok(dataset) => Ok(Some(dataset)),
            Err(e) if e.kind() == Some(ErrorKind::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a filesystem or volume. Volumes need a `volsize` property.
    pub fn create_dataset(
        &self,
        name: &DatasetName,
        dataset_type: DatasetType,
        properties: &BTreeMap<String, String>,
    ) -> Result<()> {
        match dataset_type {
            DatasetType::Filesystem | DatasetType::Volume => {}
            other => {
                return Err(ZfsError::UnsupportedType {
                    operation: "create",
                    dataset_type: other,
                })
            }
        }
        if name.is_snapshot() {
            return Err(ZfsError::invalid_usage(format!(
                "cannot create '{}': use snapshot() for snapshot names",
                name
            )));
        }
        if name.parent().is_none() {
            return Err(ZfsError::invalid_usage(format!(
                "cannot create '{}': pool root datasets are created with the pool",
                name
            )));
        }
        if dataset_type == DatasetType::Volume && !properties.contains_key("volsize") {
            return Err(ZfsError::invalid_usage(format!(
                "cannot create volume '{}': volsize property is required",
                name
            )));
        }

        let props = build_props_nvlist(properties)?;
        let nvl = props.as_ref().map_or(ptr::null_mut(), |g| g.0);
        let c_name = name.to_cstring();
        let ret = unsafe { ffi::zfs_create(self.raw(), c_name.as_ptr(), dataset_type.raw(), nvl) };
        if ret != 0 {
            return Err(self.failure("zfs_create", name.as_str()));
        }
        info!(dataset = %name, kind = %dataset_type, "dataset created");
        Ok(())
    }

    pub fn dataset_exists(&self, name: &DatasetName, types: TypeMask) -> bool {
        let c_name = name.to_cstring();
        unsafe { ffi::zfs_dataset_exists(self.raw(), c_name.as_ptr(), types.bits()) == B_TRUE }
    }

    /// Snapshot one dataset; `name` must be `dataset@snap`
    pub fn snapshot(&self, name: &DatasetName) -> Result<Dataset<'_>> {
        self.take_snapshot(name, false)
    }

    /// Snapshot a dataset and all of its descendants
    pub fn snapshot_recursive(&self, name: &DatasetName) -> Result<Dataset<'_>> {
        self.take_snapshot(name, true)
    }

    fn take_snapshot(&self, name: &DatasetName, recursive: bool) -> Result<Dataset<'_>> {
        if !name.is_snapshot() {
            return Err(ZfsError::invalid_usage(format!(
                "snapshot name '{}' must contain '@'",
                name
            )));
        }
        let c_name = name.to_cstring();
        let flag = if recursive { B_TRUE } else { B_FALSE };
        let ret = unsafe { ffi::zfs_snapshot(self.raw(), c_name.as_ptr(), flag, ptr::null_mut()) };
        if ret != 0 {
            return Err(self.failure("zfs_snapshot", name.as_str()));
        }
        info!(snapshot = %name, recursive, "snapshot created");
        self.open_dataset(name, TypeMask::SNAPSHOT)
    }
}

// ============================================================================
// Accessors and properties
// ============================================================================

impl<'s> Dataset<'s> {
    /// Take ownership of a handle libzfs gave us; closed again on error
    pub(crate) fn from_raw(session: &'s Session, zhp: *mut zfs_handle_t) -> Result<Dataset<'s>> {
        let handle = DatasetGuard(zhp);
        let raw_type = unsafe { ffi::zfs_get_type(zhp) };
        let dataset_type = DatasetType::from_raw(raw_type).ok_or_else(|| {
            ZfsError::invalid_usage(format!("unsupported dataset type {}", raw_type))
        })?;
        Ok(Dataset {
            session,
            handle,
            dataset_type,
        })
    }

    pub(crate) fn raw(&self) -> *mut zfs_handle_t {
        self.handle.0
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    pub fn name(&self) -> String {
        unsafe { read_cstr(ffi::zfs_get_name(self.raw())) }
    }

    /// Type read when the handle was opened
    pub fn dataset_type(&self) -> DatasetType {
        self.dataset_type
    }

    /// Read a native property.
    ///
    /// `guid` and `version` come back as integers. Unknown names, values
    /// that do not apply to this type and `-` are `None`. User properties
    /// (`module:name`) must go through [`Dataset::get_user_prop`].
    pub fn get(&self, property: &str) -> Result<Option<PropValue>> {
        let c_prop = to_cstring("property name", property)?;
        if is_user_prop(&c_prop) {
            return Err(ZfsError::invalid_usage(format!(
                "'{}' is a user property, use get_user_prop",
                property
            )));
        }

        let prop = unsafe { ffi::zfs_name_to_prop(c_prop.as_ptr()) };
        if prop == ZPROP_INVAL {
            return Ok(None);
        }

        if INTEGER_PROPS.contains(&property) {
            let value = unsafe { ffi::zfs_prop_get_int(self.raw(), prop) };
            return Ok(Some(PropValue::Integer(value)));
        }

        let mut buf = [0 as libc::c_char; MAXPROPLEN];
        let ret = unsafe {
            ffi::zfs_prop_get(
                self.raw(),
                prop,
                buf.as_mut_ptr(),
                buf.len(),
                ptr::null_mut(),
                ptr::null_mut(),
                0,
                B_FALSE,
            )
        };
        if ret != 0 {
            return Ok(None);
        }
        Ok(PropValue::from_display(&buf_to_string(&buf)))
    }

    /// Read a user property such as `com.example:owner`
    pub fn get_user_prop(&self, property: &str) -> Result<Option<String>> {
        let c_prop = to_cstring("property name", property)?;
        if !is_user_prop(&c_prop) {
            return Err(ZfsError::invalid_usage(format!(
                "'{}' is not a user property, user properties contain ':'",
                property
            )));
        }

        // Owned by the dataset handle, not freed here
        let user_props = unsafe { ffi::zfs_get_user_props(self.raw()) };
        if user_props.is_null() {
            return Ok(None);
        }

        let mut prop_nvl: *mut nvlist_t = ptr::null_mut();
        let ret = unsafe { nvlist_lookup_nvlist(user_props, c_prop.as_ptr(), &mut prop_nvl) };
        if ret != 0 || prop_nvl.is_null() {
            return Ok(None);
        }

        let c_value_key = CString::new(ZPROP_VALUE).unwrap_or_default();
        let mut value: *mut libc::c_char = ptr::null_mut();
        let ret = unsafe { nvlist_lookup_string(prop_nvl, c_value_key.as_ptr(), &mut value) };
        if ret != 0 || value.is_null() {
            return Ok(None);
        }
        Ok(Some(unsafe { read_cstr(value) }))
    }

    /// Set a native or user property
    pub fn set(&self, property: &str, value: &str) -> Result<()> {
        let c_prop = to_cstring("property name", property)?;
        let c_value = to_cstring("property value", value)?;
        let ret = unsafe { ffi::zfs_prop_set(self.raw(), c_prop.as_ptr(), c_value.as_ptr()) };
        if ret != 0 {
            return Err(self
                .session
                .failure("zfs_prop_set", &format!("{} {}={}", self.name(), property, value)));
        }
        debug!(dataset = %self.name(), property, value, "property set");
        Ok(())
    }

    // ========================================================================
    // Rename, clone, promote, rollback, destroy
    // ========================================================================

    /// Rename this dataset. Snapshots rename to snapshots, everything else
    /// to non-snapshot names.
    pub fn rename(&self, target: &DatasetName, recursive: bool) -> Result<()> {
        let is_snapshot = self.dataset_type == DatasetType::Snapshot;
        if target.is_snapshot() != is_snapshot {
            return Err(ZfsError::invalid_usage(format!(
                "cannot rename {} '{}' to '{}'",
                self.dataset_type,
                self.name(),
                target
            )));
        }
        let name = self.name();
        let c_target = target.to_cstring();
        let ret = unsafe { ffi::compat::zfs_rename(self.raw(), c_target.as_ptr(), recursive) };
        if ret != 0 {
            return Err(self
                .session
                .failure("zfs_rename", &format!("{} -> {}", name, target)));
        }
        info!(from = %name, to = %target, recursive, "dataset renamed");
        Ok(())
    }

    /// Clone this snapshot into a new filesystem or volume and open it
    pub fn clone_to(&self, target: &DatasetName) -> Result<Dataset<'s>> {
        if self.dataset_type != DatasetType::Snapshot {
            return Err(ZfsError::UnsupportedType {
                operation: "clone",
                dataset_type: self.dataset_type,
            });
        }
        if target.is_snapshot() {
            return Err(ZfsError::invalid_usage(format!(
                "clone target '{}' must not be a snapshot name",
                target
            )));
        }
        let c_target = target.to_cstring();
        let ret = unsafe { ffi::zfs_clone(self.raw(), c_target.as_ptr(), ptr::null_mut()) };
        if ret != 0 {
            return Err(self
                .session
                .failure("zfs_clone", &format!("{} -> {}", self.name(), target)));
        }
        info!(snapshot = %self.name(), clone = %target, "clone created");
        self.session
            .open_dataset(target, TypeMask::FILESYSTEM | TypeMask::VOLUME)
    }

    /// Make this clone independent of its origin snapshot
    pub fn promote(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_promote(self.raw()) };
        if ret != 0 {
            return Err(self.session.failure("zfs_promote", &self.name()));
        }
        info!(dataset = %self.name(), "clone promoted");
        Ok(())
    }

    /// Roll this filesystem or volume back to one of its snapshots
    pub fn rollback(&self, snapshot: &Dataset<'_>, force: bool) -> Result<()> {
        match self.dataset_type {
            DatasetType::Filesystem | DatasetType::Volume => {}
            other => {
                return Err(ZfsError::UnsupportedType {
                    operation: "rollback",
                    dataset_type: other,
                })
            }
        }
        if snapshot.dataset_type != DatasetType::Snapshot {
            return Err(ZfsError::invalid_usage(format!(
                "rollback target '{}' is a {}, not a snapshot",
                snapshot.name(),
                snapshot.dataset_type
            )));
        }
        let name = self.name();
        let snap_name = snapshot.name();
        if snap_name.split('@').next() != Some(name.as_str()) {
            return Err(ZfsError::invalid_usage(format!(
                "snapshot '{}' does not belong to '{}'",
                snap_name, name
            )));
        }

        let flag = if force { B_TRUE } else { B_FALSE };
        let ret = unsafe { ffi::zfs_rollback(self.raw(), snapshot.raw(), flag) };
        if ret != 0 {
            return Err(self
                .session
                .failure("zfs_rollback", &format!("{} -> {}", name, snap_name)));
        }
        info!(dataset = %name, snapshot = %snap_name, force, "rolled back");
        Ok(())
    }

    /// Destroy the dataset; the handle is closed afterwards either way
    pub fn destroy(self) -> Result<()> {
        let name = self.name();
        let ret = unsafe { ffi::compat::zfs_destroy(self.raw()) };
        if ret != 0 {
            return Err(self.session.failure("zfs_destroy", &name));
        }
        info!(dataset = %name, "dataset destroyed");
        Ok(())
    }
}

impl Drop for Dataset<'_> {
    fn drop(&mut self) {
        debug!(kind = %self.dataset_type, "dataset handle closed");
    }
}

fn is_user_prop(c_prop: &CString) -> bool {
    unsafe { ffi::zfs_prop_user(c_prop.as_ptr()) == B_TRUE }
}
