// zfs/session.rs
// Library handle: owns the libzfs_handle_t every pool and dataset borrows

use super::error::{LastError, Result, ZfsError};
use super::ffi::{self, libzfs_handle_t, LibzfsGuard, B_FALSE, B_TRUE};
use super::helpers::read_cstr;
use libzfs_sys::{libzfs_error_description, libzfs_init};
use std::cell::OnceCell;
use tracing::{debug, warn};

/// An open libzfs library handle.
///
/// The handle carries the "last error" state of every call made through it,
/// so a `Session` is neither `Send` nor `Sync`. Pools and datasets opened
/// from it borrow it and cannot outlive it.
pub struct Session {
    handle: LibzfsGuard,
}

impl Session {
    pub fn new() -> Result<Session> {
        let hdl = unsafe { libzfs_init() };
        if hdl.is_null() {
            warn!("libzfs_init() returned NULL");
            return Err(ZfsError::InitFailed);
        }
        debug!("libzfs handle opened");
        Ok(Session {
            handle: LibzfsGuard(hdl),
        })
    }

    pub(crate) fn raw(&self) -> *mut libzfs_handle_t {
        self.handle.0
    }

    /// Last native error code, 0 when nothing has failed
    pub fn errno(&self) -> i32 {
        unsafe { ffi::libzfs_errno(self.raw()) }
    }

    /// Suggested action for the last error, empty when there is none
    pub fn error_action(&self) -> String {
        unsafe { read_cstr(ffi::libzfs_error_action(self.raw())) }
    }

    /// Description of the last error, "no error" when there is none
    pub fn error_description(&self) -> String {
        unsafe { read_cstr(libzfs_error_description(self.raw())) }
    }

    pub fn last_error(&self) -> LastError {
        LastError {
            code: self.errno(),
            action: self.error_action(),
            description: self.error_description(),
        }
    }

    /// Toggle libzfs printing its own error messages to stderr
    pub fn print_on_error(&self, enabled: bool) {
        let flag = if enabled { B_TRUE } else { B_FALSE };
        unsafe { ffi::libzfs_print_on_error(self.raw(), flag) }
    }

    /// Translate the current error state into a typed error
    pub fn raise_error(&self) -> ZfsError {
        self.last_error().into()
    }

    /// Capture the error of a native call that just failed
    pub(crate) fn failure(&self, operation: &str, target: &str) -> ZfsError {
        let err = self.raise_error();
        warn!(operation, target, error = %err, "libzfs call failed");
        err
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("libzfs handle closed");
    }
}

// ============================================================================
// Lazily opened session
// ============================================================================

/// A session opened on first use and reused afterwards.
///
/// Callers own the value, so each owner gets its own handle.
#[derive(Default)]
pub struct LazySession {
    cell: OnceCell<Session>,
}

impl LazySession {
    pub const fn new() -> LazySession {
        LazySession {
            cell: OnceCell::new(),
        }
    }

    /// Returns the session, calling `libzfs_init` the first time only
    pub fn get(&self) -> Result<&Session> {
        if let Some(session) = self.cell.get() {
            return Ok(session);
        }
        let session = Session::new()?;
        Ok(self.cell.get_or_init(|| session))
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn into_inner(self) -> Option<Session> {
        self.cell.into_inner()
    }
}
