// zfs/share.rs
// Mount and share operations on datasets

use super::dataset::Dataset;
use super::error::Result;
use super::ffi::{self, zfs_handle_t, B_TRUE};
use super::helpers::read_cstr;
use libc::{c_char, c_int};
use std::ptr;
use tracing::info;

type WhereFn = unsafe extern "C" fn(*mut zfs_handle_t, *mut *mut c_char) -> c_int;

/// Call a `zfs_is_*(zhp, &where)` style query. `where` is malloc'd by libzfs.
fn query_where(zhp: *mut zfs_handle_t, query: WhereFn) -> Option<String> {
    let mut where_: *mut c_char = ptr::null_mut();
    let active = unsafe { query(zhp, &mut where_) } == B_TRUE;
    let location = if where_.is_null() {
        None
    } else {
        let s = unsafe { read_cstr(where_) };
        unsafe { libc::free(where_ as *mut libc::c_void) };
        Some(s)
    };
    if active {
        Some(location.unwrap_or_default())
    } else {
        None
    }
}

impl Dataset<'_> {
    fn check(&self, operation: &str, ret: c_int) -> Result<()> {
        if ret != 0 {
            return Err(self.session().failure(operation, &self.name()));
        }
        info!(dataset = %self.name(), operation, "done");
        Ok(())
    }

    // ========================================================================
    // Mounting
    // ========================================================================

    pub fn is_mounted(&self) -> bool {
        self.mountpoint().is_some()
    }

    /// Where the dataset is mounted, `None` when it is not
    pub fn mountpoint(&self) -> Option<String> {
        query_where(self.raw(), ffi::zfs_is_mounted)
    }

    pub fn mount(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_mount(self.raw(), ptr::null(), 0) };
        self.check("zfs_mount", ret)
    }

    pub fn unmount(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_unmount(self.raw(), ptr::null(), 0) };
        self.check("zfs_unmount", ret)
    }

    // ========================================================================
    // All protocols
    // ========================================================================

    pub fn is_shared(&self) -> bool {
        unsafe { ffi::zfs_is_shared(self.raw()) == B_TRUE }
    }

    /// Share over every protocol enabled by the share* properties
    pub fn share(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_share(self.raw()) };
        self.check("zfs_share", ret)
    }

    pub fn unshare(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_unshare(self.raw()) };
        self.check("zfs_unshare", ret)
    }

    // ========================================================================
    // NFS
    // ========================================================================

    pub fn is_shared_nfs(&self) -> bool {
        self.nfs_share_name().is_some()
    }

    /// Exported path, `None` when not shared over NFS
    pub fn nfs_share_name(&self) -> Option<String> {
        query_where(self.raw(), ffi::zfs_is_shared_nfs)
    }

    pub fn share_nfs(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_share_nfs(self.raw()) };
        self.check("zfs_share_nfs", ret)
    }

    pub fn unshare_nfs(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_unshare_nfs(self.raw(), ptr::null()) };
        self.check("zfs_unshare_nfs", ret)
    }

    // ========================================================================
    // SMB
    // ========================================================================

    #[cfg(feature = "smb")]
    pub fn is_shared_smb(&self) -> bool {
        self.smb_share_name().is_some()
    }

    #[cfg(feature = "smb")]
    pub fn smb_share_name(&self) -> Option<String> {
        query_where(self.raw(), ffi::zfs_is_shared_smb)
    }

    #[cfg(feature = "smb")]
    pub fn share_smb(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_share_smb(self.raw()) };
        self.check("zfs_share_smb", ret)
    }

    #[cfg(feature = "smb")]
    pub fn unshare_smb(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_unshare_smb(self.raw(), ptr::null()) };
        self.check("zfs_unshare_smb", ret)
    }

    // ========================================================================
    // iSCSI
    // ========================================================================

    #[cfg(feature = "iscsi")]
    pub fn is_shared_iscsi(&self) -> bool {
        unsafe { ffi::zfs_is_shared_iscsi(self.raw()) == B_TRUE }
    }

    #[cfg(feature = "iscsi")]
    pub fn share_iscsi(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_share_iscsi(self.raw()) };
        self.check("zfs_share_iscsi", ret)
    }

    #[cfg(feature = "iscsi")]
    pub fn unshare_iscsi(&self) -> Result<()> {
        let ret = unsafe { ffi::zfs_unshare_iscsi(self.raw()) };
        self.check("zfs_unshare_iscsi", ret)
    }
}
