// zfs/ffi.rs
// FFI declarations and RAII guards for libzfs handles

#![allow(non_camel_case_types)]

use libc::{c_char, c_int, c_void, size_t};
use nvpair_sys::nvlist_t;

pub use libzfs_sys::libzfs_handle_t;

pub type boolean_t = c_int;
pub const B_FALSE: boolean_t = 0;
pub const B_TRUE: boolean_t = 1;

/// `zprop_source_t` is an enum in C; we only ever pass NULL or read it back.
pub type zprop_source_t = c_int;

/// Returned by `zfs_name_to_prop` / `zpool_name_to_prop` for unknown names
pub const ZPROP_INVAL: c_int = -1;

/// Key holding the value inside a user property nvlist
pub const ZPROP_VALUE: &str = "value";

/// ZFS_MAXPROPLEN / ZPOOL_MAXPROPLEN are both MAXPATHLEN
pub const MAXPROPLEN: usize = 4096;

// ============================================================================
// Opaque handles
// ============================================================================

/// Opaque handle to a ZFS pool (libzfs)
#[repr(C)]
pub struct zpool_handle_t {
    _private: [u8; 0],
}

/// Opaque handle to a ZFS dataset (libzfs)
#[repr(C)]
pub struct zfs_handle_t {
    _private: [u8; 0],
}

/// `renameflags_t` from libzfs.h: `{ int recursive:1; int nounmount:1; int forceunmount:1; }`
/// Bitfields pack into one int, first field in the low bit.
#[cfg(not(feature = "iscsi"))]
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct renameflags_t {
    bits: c_int,
}

#[cfg(not(feature = "iscsi"))]
impl renameflags_t {
    pub fn recursive(recursive: bool) -> Self {
        renameflags_t {
            bits: if recursive { 1 } else { 0 },
        }
    }
}

pub type zpool_iter_f = Option<unsafe extern "C" fn(*mut zpool_handle_t, *mut c_void) -> c_int>;
pub type zfs_iter_f = Option<unsafe extern "C" fn(*mut zfs_handle_t, *mut c_void) -> c_int>;

// ============================================================================
// FFI Declarations
// ============================================================================
// libzfs-sys only covers init/fini and the error description; everything
// below is exported by the system libzfs.so. Calls whose signature differs
// between OpenZFS 2.1 and legacy Solaris libzfs are declared per layout
// further down and reached through `compat`.

#[link(name = "zfs")]
extern "C" {
    // ---- library handle -------------------------------------------------
    pub fn libzfs_errno(hdl: *mut libzfs_handle_t) -> c_int;
    pub fn libzfs_error_action(hdl: *mut libzfs_handle_t) -> *const c_char;
    pub fn libzfs_print_on_error(hdl: *mut libzfs_handle_t, print: boolean_t);

    // ---- pools ----------------------------------------------------------
    /// Open a pool by name, returning NULL on failure (no error printed)
    pub fn zpool_open_canfail(
        hdl: *mut libzfs_handle_t,
        name: *const c_char,
    ) -> *mut zpool_handle_t;
    pub fn zpool_close(zhp: *mut zpool_handle_t);
    pub fn zpool_get_name(zhp: *mut zpool_handle_t) -> *const c_char;
    pub fn zpool_get_state(zhp: *mut zpool_handle_t) -> c_int;
    pub fn zpool_get_handle(zhp: *mut zpool_handle_t) -> *mut libzfs_handle_t;
    pub fn zpool_name_to_prop(name: *const c_char) -> c_int;
    pub fn zpool_get_prop_int(
        zhp: *mut zpool_handle_t,
        prop: c_int,
        src: *mut zprop_source_t,
    ) -> u64;
    pub fn zpool_set_prop(
        zhp: *mut zpool_handle_t,
        propname: *const c_char,
        propval: *const c_char,
    ) -> c_int;
    pub fn zpool_iter(hdl: *mut libzfs_handle_t, func: zpool_iter_f, data: *mut c_void) -> c_int;

    // ---- datasets -------------------------------------------------------
    pub fn zfs_open(hdl: *mut libzfs_handle_t, name: *const c_char, types: c_int)
        -> *mut zfs_handle_t;
    pub fn zfs_close(zhp: *mut zfs_handle_t);
    pub fn zfs_get_name(zhp: *const zfs_handle_t) -> *const c_char;
    pub fn zfs_get_type(zhp: *const zfs_handle_t) -> c_int;
    pub fn zfs_get_handle(zhp: *mut zfs_handle_t) -> *mut libzfs_handle_t;
    pub fn zfs_create(
        hdl: *mut libzfs_handle_t,
        path: *const c_char,
        dataset_type: c_int,
        props: *mut nvlist_t,
    ) -> c_int;
    pub fn zfs_dataset_exists(
        hdl: *mut libzfs_handle_t,
        path: *const c_char,
        types: c_int,
    ) -> boolean_t;

    pub fn zfs_name_to_prop(name: *const c_char) -> c_int;
    pub fn zfs_prop_user(name: *const c_char) -> boolean_t;
    pub fn zfs_prop_get(
        zhp: *mut zfs_handle_t,
        prop: c_int,
        buf: *mut c_char,
        len: size_t,
        src: *mut zprop_source_t,
        statbuf: *mut c_char,
        statlen: size_t,
        literal: boolean_t,
    ) -> c_int;
    pub fn zfs_prop_get_int(zhp: *mut zfs_handle_t, prop: c_int) -> u64;
    pub fn zfs_prop_set(
        zhp: *mut zfs_handle_t,
        propname: *const c_char,
        propval: *const c_char,
    ) -> c_int;
    pub fn zfs_get_user_props(zhp: *mut zfs_handle_t) -> *mut nvlist_t;

    // ---- snapshots & clones ---------------------------------------------
    pub fn zfs_snapshot(
        hdl: *mut libzfs_handle_t,
        path: *const c_char,
        recursive: boolean_t,
        props: *mut nvlist_t,
    ) -> c_int;
    pub fn zfs_clone(zhp: *mut zfs_handle_t, target: *const c_char, props: *mut nvlist_t) -> c_int;
    pub fn zfs_promote(zhp: *mut zfs_handle_t) -> c_int;
    pub fn zfs_rollback(zhp: *mut zfs_handle_t, snap: *mut zfs_handle_t, force: boolean_t) -> c_int;

    // ---- mount & share --------------------------------------------------
    pub fn zfs_is_mounted(zhp: *mut zfs_handle_t, where_: *mut *mut c_char) -> boolean_t;
    pub fn zfs_mount(zhp: *mut zfs_handle_t, options: *const c_char, flags: c_int) -> c_int;
    pub fn zfs_unmount(zhp: *mut zfs_handle_t, mountpoint: *const c_char, flags: c_int) -> c_int;

    pub fn zfs_is_shared(zhp: *mut zfs_handle_t) -> boolean_t;
    pub fn zfs_share(zhp: *mut zfs_handle_t) -> c_int;
    pub fn zfs_unshare(zhp: *mut zfs_handle_t) -> c_int;

    pub fn zfs_is_shared_nfs(zhp: *mut zfs_handle_t, where_: *mut *mut c_char) -> boolean_t;
    pub fn zfs_share_nfs(zhp: *mut zfs_handle_t) -> c_int;
    pub fn zfs_unshare_nfs(zhp: *mut zfs_handle_t, mountpoint: *const c_char) -> c_int;

    // ---- iteration ------------------------------------------------------
    pub fn zfs_iter_root(hdl: *mut libzfs_handle_t, func: zfs_iter_f, data: *mut c_void) -> c_int;
    pub fn zfs_iter_filesystems(zhp: *mut zfs_handle_t, func: zfs_iter_f, data: *mut c_void)
        -> c_int;
    pub fn zfs_iter_dependents(
        zhp: *mut zfs_handle_t,
        allowrecursion: boolean_t,
        func: zfs_iter_f,
        data: *mut c_void,
    ) -> c_int;
}

// OpenZFS 2.1
#[cfg(not(feature = "iscsi"))]
#[link(name = "zfs")]
extern "C" {
    pub fn zpool_get_prop(
        zhp: *mut zpool_handle_t,
        prop: c_int,
        buf: *mut c_char,
        len: size_t,
        src: *mut zprop_source_t,
        literal: boolean_t,
    ) -> c_int;
    pub fn zpool_get_status(
        zhp: *mut zpool_handle_t,
        msgid: *mut *mut c_char,
        errata: *mut c_int,
    ) -> c_int;
    pub fn zfs_destroy(zhp: *mut zfs_handle_t, defer: boolean_t) -> c_int;
    pub fn zfs_rename(zhp: *mut zfs_handle_t, target: *const c_char, flags: renameflags_t)
        -> c_int;
    pub fn zfs_iter_snapshots(
        zhp: *mut zfs_handle_t,
        simple: boolean_t,
        func: zfs_iter_f,
        data: *mut c_void,
        min_txg: u64,
        max_txg: u64,
    ) -> c_int;
}

// Solaris libzfs before SPA version 24
#[cfg(feature = "iscsi")]
#[link(name = "zfs")]
extern "C" {
    pub fn zpool_get_prop(
        zhp: *mut zpool_handle_t,
        prop: c_int,
        buf: *mut c_char,
        len: size_t,
        src: *mut zprop_source_t,
    ) -> c_int;
    pub fn zpool_get_status(zhp: *mut zpool_handle_t, msgid: *mut *mut c_char) -> c_int;
    pub fn zfs_destroy(zhp: *mut zfs_handle_t) -> c_int;
    pub fn zfs_rename(zhp: *mut zfs_handle_t, target: *const c_char, recursive: boolean_t)
        -> c_int;
    pub fn zfs_iter_snapshots(zhp: *mut zfs_handle_t, func: zfs_iter_f, data: *mut c_void)
        -> c_int;
}

#[cfg(feature = "smb")]
#[link(name = "zfs")]
extern "C" {
    pub fn zfs_is_shared_smb(zhp: *mut zfs_handle_t, where_: *mut *mut c_char) -> boolean_t;
    pub fn zfs_share_smb(zhp: *mut zfs_handle_t) -> c_int;
    pub fn zfs_unshare_smb(zhp: *mut zfs_handle_t, mountpoint: *const c_char) -> c_int;
}

#[cfg(feature = "iscsi")]
#[link(name = "zfs")]
extern "C" {
    pub fn zfs_is_shared_iscsi(zhp: *mut zfs_handle_t) -> boolean_t;
    pub fn zfs_share_iscsi(zhp: *mut zfs_handle_t) -> c_int;
    pub fn zfs_unshare_iscsi(zhp: *mut zfs_handle_t) -> c_int;
}

// ============================================================================
// One call shape for both layouts
// ============================================================================

pub mod compat {
    use super::*;
    use std::ptr;

    /// Value of a pool property as displayed by `zpool get`
    pub unsafe fn zpool_get_prop(
        zhp: *mut zpool_handle_t,
        prop: c_int,
        buf: &mut [c_char],
    ) -> c_int {
        #[cfg(not(feature = "iscsi"))]
        {
            super::zpool_get_prop(zhp, prop, buf.as_mut_ptr(), buf.len(), ptr::null_mut(), B_FALSE)
        }
        #[cfg(feature = "iscsi")]
        {
            super::zpool_get_prop(zhp, prop, buf.as_mut_ptr(), buf.len(), ptr::null_mut())
        }
    }

    /// Raw `zpool_status_t`; the message id points into static storage
    pub unsafe fn zpool_get_status(zhp: *mut zpool_handle_t) -> c_int {
        let mut msgid: *mut c_char = ptr::null_mut();
        #[cfg(not(feature = "iscsi"))]
        {
            super::zpool_get_status(zhp, &mut msgid, ptr::null_mut())
        }
        #[cfg(feature = "iscsi")]
        {
            super::zpool_get_status(zhp, &mut msgid)
        }
    }

    pub unsafe fn zfs_destroy(zhp: *mut zfs_handle_t) -> c_int {
        #[cfg(not(feature = "iscsi"))]
        {
            super::zfs_destroy(zhp, B_FALSE)
        }
        #[cfg(feature = "iscsi")]
        {
            super::zfs_destroy(zhp)
        }
    }

    pub unsafe fn zfs_rename(
        zhp: *mut zfs_handle_t,
        target: *const c_char,
        recursive: bool,
    ) -> c_int {
        #[cfg(not(feature = "iscsi"))]
        {
            super::zfs_rename(zhp, target, renameflags_t::recursive(recursive))
        }
        #[cfg(feature = "iscsi")]
        {
            super::zfs_rename(zhp, target, if recursive { B_TRUE } else { B_FALSE })
        }
    }

    pub unsafe fn zfs_iter_snapshots(
        zhp: *mut zfs_handle_t,
        func: zfs_iter_f,
        data: *mut c_void,
    ) -> c_int {
        #[cfg(not(feature = "iscsi"))]
        {
            super::zfs_iter_snapshots(zhp, B_FALSE, func, data, 0, 0)
        }
        #[cfg(feature = "iscsi")]
        {
            super::zfs_iter_snapshots(zhp, func, data)
        }
    }
}

// ============================================================================
// RAII Guards for resource cleanup
// ============================================================================

/// RAII guard for libzfs handle - calls libzfs_fini() on drop
pub struct LibzfsGuard(pub *mut libzfs_handle_t);

impl Drop for LibzfsGuard {
    fn drop(&mut self) {
        unsafe { libzfs_sys::libzfs_fini(self.0) }
    }
}

/// RAII guard for zpool handle - calls zpool_close() on drop
pub struct PoolGuard(pub *mut zpool_handle_t);

impl Drop for PoolGuard {
    fn drop(&mut self) {
        unsafe { zpool_close(self.0) }
    }
}

/// RAII guard for zfs handle - calls zfs_close() on drop
pub struct DatasetGuard(pub *mut zfs_handle_t);

impl Drop for DatasetGuard {
    fn drop(&mut self) {
        unsafe { zfs_close(self.0) }
    }
}

/// RAII guard for nvlist - calls nvlist_free() on drop
pub struct NvlistGuard(pub *mut nvlist_t);

impl Drop for NvlistGuard {
    fn drop(&mut self) {
        unsafe { nvpair_sys::nvlist_free(self.0) }
    }
}
