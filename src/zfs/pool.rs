// zfs/pool.rs
// Pool handle: open, accessors, property get/set

use super::error::{ErrorKind, Result};
use super::ffi::{self, zpool_handle_t, PoolGuard, MAXPROPLEN, ZPROP_INVAL};
use super::helpers::{buf_to_string, read_cstr, to_cstring, PoolName};
use super::session::Session;
use super::types::{PoolHealth, PoolState, PoolStatus, PropValue};
use libc::c_int;
use std::ptr;
use tracing::debug;

/// Pool properties that read back as integers
const INTEGER_PROPS: &[&str] = &["guid", "version"];

/// An open pool, borrowing the session it was opened from
pub struct Pool<'s> {
    session: &'s Session,
    handle: PoolGuard,
}

impl Session {
    /// Open an imported pool; a missing pool is a `NotFound` error
    pub fn open_pool(&self, name: &PoolName) -> Result<Pool<'_>> {
        let c_name = name.to_cstring();
        let zhp = unsafe { ffi::zpool_open_canfail(self.raw(), c_name.as_ptr()) };
        if zhp.is_null() {
            return Err(self.failure("zpool_open", name.as_str()));
        }
        debug!(pool = %name, "pool opened");
        Ok(Pool::from_raw(self, zhp))
    }

    /// Like [`Session::open_pool`], but a missing pool is `Ok(None)`
    pub fn try_open_pool(&self, name: &PoolName) -> Result<Option<Pool<'_>>> {
        match self.open_pool(name) {
            Ok(pool) => Ok(Some(pool)),
            Err(e) if e.kind() == Some(ErrorKind::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<'s> Pool<'s> {
    /// Take ownership of a handle libzfs gave us
    pub(crate) fn from_raw(session: &'s Session, zhp: *mut zpool_handle_t) -> Pool<'s> {
        Pool {
            session,
            handle: PoolGuard(zhp),
        }
    }

    fn raw(&self) -> *mut zpool_handle_t {
        self.handle.0
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    pub fn name(&self) -> String {
        unsafe { read_cstr(ffi::zpool_get_name(self.raw())) }
    }

    pub fn guid(&self) -> u64 {
        self.int_prop("guid").unwrap_or_default()
    }

    pub fn version(&self) -> u64 {
        self.int_prop("version").unwrap_or_default()
    }

    /// Bytes allocated (`allocated` property)
    pub fn space_used(&self) -> u64 {
        self.int_prop("allocated").unwrap_or_default()
    }

    /// Pool size in bytes (`size` property)
    pub fn space_total(&self) -> u64 {
        self.int_prop("size").unwrap_or_default()
    }

    pub fn state(&self) -> PoolState {
        PoolState::from_raw(unsafe { ffi::zpool_get_state(self.raw()) })
    }

    /// Health of the root vdev (`health` property)
    pub fn health(&self) -> PoolHealth {
        match self.get("health") {
            Ok(Some(value)) => PoolHealth::parse(&value.to_string()),
            _ => PoolHealth::Other(String::new()),
        }
    }

    /// Diagnosis behind the `status:` line of `zpool status`
    pub fn status(&self) -> PoolStatus {
        PoolStatus::from_raw(unsafe { ffi::compat::zpool_get_status(self.raw()) })
    }

    /// Read a property.
    ///
    /// `guid` and `version` come back as integers, everything else as text.
    /// Unknown names, unreadable values and `-` are `None`.
    pub fn get(&self, property: &str) -> Result<Option<PropValue>> {
        let Some(prop) = prop_id(property)? else {
            return Ok(None);
        };

        if INTEGER_PROPS.contains(&property) {
            let value = unsafe { ffi::zpool_get_prop_int(self.raw(), prop, ptr::null_mut()) };
            return Ok(Some(PropValue::Integer(value)));
        }

        let mut buf = [0 as libc::c_char; MAXPROPLEN];
        let ret = unsafe { ffi::compat::zpool_get_prop(self.raw(), prop, &mut buf) };
        if ret != 0 {
            return Ok(None);
        }
        Ok(PropValue::from_display(&buf_to_string(&buf)))
    }

    pub fn set(&self, property: &str, value: &str) -> Result<()> {
        let c_prop = to_cstring("property name", property)?;
        let c_value = to_cstring("property value", value)?;
        let ret = unsafe { ffi::zpool_set_prop(self.raw(), c_prop.as_ptr(), c_value.as_ptr()) };
        if ret != 0 {
            return Err(self
                .session
                .failure("zpool_set_prop", &format!("{} {}={}", self.name(), property, value)));
        }
        debug!(pool = %self.name(), property, value, "pool property set");
        Ok(())
    }

    fn int_prop(&self, property: &str) -> Option<u64> {
        let prop = prop_id(property).ok().flatten()?;
        Some(unsafe { ffi::zpool_get_prop_int(self.raw(), prop, ptr::null_mut()) })
    }
}

impl Drop for Pool<'_> {
    fn drop(&mut self) {
        debug!("pool handle closed");
    }
}

fn prop_id(property: &str) -> Result<Option<c_int>> {
    let c_prop = to_cstring("property name", property)?;
    let prop = unsafe { ffi::zpool_name_to_prop(c_prop.as_ptr()) };
    Ok(if prop == ZPROP_INVAL { None } else { Some(prop) })
}
