// zfs/helpers.rs
// Validated names, C string conversion and nvlist construction

use super::error::{ErrorKind, Result, ZfsError};
use super::ffi::NvlistGuard;
use nvpair_sys::{nvlist_add_string, nvlist_alloc, nvlist_t, NV_UNIQUE_NAME};
use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::fmt;
use std::ptr;

/// ZFS_MAX_DATASET_NAME_LEN without the terminating NUL
pub const MAX_NAME_LEN: usize = 255;

fn valid_component_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | ' ')
}

fn check_component(kind: &str, full: &str, component: &str) -> Result<()> {
    if component.is_empty() {
        return Err(ZfsError::invalid_usage(format!(
            "{} '{}' has an empty component",
            kind, full
        )));
    }
    if let Some(bad) = component.chars().find(|c| !valid_component_char(*c)) {
        return Err(ZfsError::invalid_usage(format!(
            "{} '{}' contains invalid character '{}'",
            kind, full, bad
        )));
    }
    Ok(())
}

fn check_common(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ZfsError::invalid_usage(format!("{} must not be empty", kind)));
    }
    if name.contains('\0') {
        return Err(ZfsError::invalid_usage(format!(
            "{} '{}' contains null byte",
            kind,
            name.escape_default()
        )));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ZfsError::invalid_usage(format!(
            "{} is longer than {} bytes",
            kind, MAX_NAME_LEN
        )));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(ZfsError::invalid_usage(format!(
            "{} '{}' must begin with a letter",
            kind, name
        )));
    }
    Ok(())
}

// ============================================================================
// Pool names
// ============================================================================

/// A syntactically valid pool name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolName(String);

impl PoolName {
    pub fn new(name: impl Into<String>) -> Result<PoolName> {
        let name = name.into();
        check_common("pool name", &name)?;
        check_component("pool name", &name, &name)?;
        Ok(PoolName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn to_cstring(&self) -> CString {
        to_cstring_unchecked(&self.0)
    }
}

// ============================================================================
// Dataset names
// ============================================================================

/// A syntactically valid dataset or snapshot name, e.g. `tank/home@monday`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetName(String);

impl DatasetName {
    pub fn new(name: impl Into<String>) -> Result<DatasetName> {
        let name = name.into();
        check_common("dataset name", &name)?;
        if name.contains('#') {
            return Err(ZfsError::invalid_usage(format!(
                "dataset name '{}' refers to a bookmark",
                name
            )));
        }

        let mut parts = name.splitn(2, '@');
        let path = parts.next().unwrap_or_default();
        let snap = parts.next();
        for component in path.split('/') {
            check_component("dataset name", &name, component)?;
        }
        if let Some(snap) = snap {
            if snap.contains('@') {
                return Err(ZfsError::invalid_usage(format!(
                    "dataset name '{}' contains more than one '@'",
                    name
                )));
            }
            if snap.contains('/') {
                return Err(ZfsError::invalid_usage(format!(
                    "snapshot name '{}' has '/' after '@'",
                    name
                )));
            }
            check_component("snapshot name", &name, snap)?;
        }
        Ok(DatasetName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_snapshot(&self) -> bool {
        self.0.contains('@')
    }

    /// `tank` for `tank/home@snap`
    pub fn pool(&self) -> &str {
        self.0
            .split(|c: char| c == '/' || c == '@')
            .next()
            .unwrap_or(&self.0)
    }

    /// `tank/home` for `tank/home@snap`, the name itself otherwise
    pub fn dataset(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }

    /// `snap` for `tank/home@snap`
    pub fn snapshot_name(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, snap)| snap)
    }

    /// Name of the parent filesystem, `None` at the pool root
    pub fn parent(&self) -> Option<&str> {
        if self.is_snapshot() {
            return Some(self.dataset());
        }
        self.0.rsplit_once('/').map(|(parent, _)| parent)
    }

    pub(crate) fn to_cstring(&self) -> CString {
        to_cstring_unchecked(&self.0)
    }
}

macro_rules! name_conversions {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $ty {
            type Err = ZfsError;

            fn from_str(s: &str) -> Result<Self> {
                $ty::new(s)
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = ZfsError;

            fn try_from(s: &str) -> Result<Self> {
                $ty::new(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ZfsError;

            fn try_from(s: String) -> Result<Self> {
                $ty::new(s)
            }
        }
    };
}

name_conversions!(PoolName);
name_conversions!(DatasetName);

// ============================================================================
// C strings
// ============================================================================

// Validated names never contain NUL.
fn to_cstring_unchecked(s: &str) -> CString {
    CString::new(s).unwrap_or_default()
}

/// Convert a caller-supplied string for a native call
pub fn to_cstring(what: &str, s: &str) -> Result<CString> {
    CString::new(s)
        .map_err(|_| ZfsError::invalid_usage(format!("{} '{}' contains null byte", what, s.escape_default())))
}

/// Copy a C string owned by libzfs; NULL becomes an empty string
///
/// # Safety
/// `ptr` must be NULL or point to a NUL-terminated string.
pub unsafe fn read_cstr(ptr: *const libc::c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Read a property buffer filled by `zfs_prop_get` / `zpool_get_prop`
pub fn buf_to_string(buf: &[libc::c_char]) -> String {
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|c| **c != 0)
        .map(|c| *c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

// ============================================================================
// nvlist construction
// ============================================================================

/// Build a string-valued nvlist of creation properties.
/// Returns `None` for an empty map so the native call receives NULL.
pub fn build_props_nvlist(props: &BTreeMap<String, String>) -> Result<Option<NvlistGuard>> {
    if props.is_empty() {
        return Ok(None);
    }

    let mut nvl: *mut nvlist_t = ptr::null_mut();
    let ret = unsafe { nvlist_alloc(&mut nvl, NV_UNIQUE_NAME, 0) };
    if ret != 0 || nvl.is_null() {
        return Err(ZfsError::Native {
            kind: ErrorKind::NoMemory,
            code: ErrorKind::NoMemory.code().unwrap_or_default(),
            action: String::new(),
            description: format!(
                "failed to allocate property nvlist: {}",
                errno_to_string(ret)
            ),
        });
    }
    let guard = NvlistGuard(nvl);

    for (key, value) in props {
        let c_key = to_cstring("property name", key)?;
        let c_value = to_cstring("property value", value)?;
        let ret = unsafe { nvlist_add_string(guard.0, c_key.as_ptr(), c_value.as_ptr()) };
        if ret != 0 {
            return Err(ZfsError::invalid_usage(format!(
                "failed to add property '{}' to nvlist: {}",
                key,
                errno_to_string(ret)
            )));
        }
    }

    Ok(Some(guard))
}

/// Convert errno from nvlist helpers to a short description
pub fn errno_to_string(errno: i32) -> &'static str {
    match errno {
        libc::ENOENT => "not found",
        libc::ENOMEM => "out of memory",
        libc::EINVAL => "invalid argument",
        _ => "unknown error",
    }
}
