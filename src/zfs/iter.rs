// zfs/iter.rs
// Pool and dataset iteration through libzfs callbacks

use super::dataset::Dataset;
use super::error::Result;
use super::ffi::{self, zfs_handle_t, zpool_handle_t, B_TRUE};
use super::pool::Pool;
use super::session::Session;
use libc::{c_int, c_void};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Data handed through the `void *` of a libzfs iterator
struct VisitState<'a, F> {
    session: &'a Session,
    visit: &'a mut F,
    panic: Option<Box<dyn Any + Send + 'static>>,
}

impl<'a, F> VisitState<'a, F> {
    fn new(session: &'a Session, visit: &'a mut F) -> Self {
        VisitState {
            session,
            visit,
            panic: None,
        }
    }

    fn as_data(&mut self) -> *mut c_void {
        self as *mut Self as *mut c_void
    }

    /// Re-raise a visitor panic on the caller's side of the FFI boundary,
    /// otherwise turn a nonzero iterator status into an error.
    fn finish(self, ret: c_int, operation: &str, target: &str) -> Result<()> {
        if let Some(payload) = self.panic {
            panic::resume_unwind(payload);
        }
        if ret != 0 {
            return Err(self.session.failure(operation, target));
        }
        Ok(())
    }
}

// Panics must not unwind through C frames; they are caught here and
// the iteration is stopped with a nonzero return.
unsafe extern "C" fn dataset_trampoline<F>(zhp: *mut zfs_handle_t, data: *mut c_void) -> c_int
where
    F: FnMut(&Dataset<'_>),
{
    let state = &mut *(data as *mut VisitState<'_, F>);
    if state.panic.is_some() {
        ffi::zfs_close(zhp);
        return 1;
    }
    // Types we do not model (bookmarks) are closed and skipped
    let dataset = match Dataset::from_raw(state.session, zhp) {
        Ok(dataset) => dataset,
        Err(_) => return 0,
    };
    let visit = &mut *state.visit;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| visit(&dataset)));
    drop(dataset);
    match outcome {
        Ok(()) => 0,
        Err(payload) => {
            state.panic = Some(payload);
            1
        }
    }
}

unsafe extern "C" fn pool_trampoline<F>(zhp: *mut zpool_handle_t, data: *mut c_void) -> c_int
where
    F: FnMut(&Pool<'_>),
{
    let state = &mut *(data as *mut VisitState<'_, F>);
    if state.panic.is_some() {
        ffi::zpool_close(zhp);
        return 1;
    }
    let pool = Pool::from_raw(state.session, zhp);
    let visit = &mut *state.visit;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| visit(&pool)));
    drop(pool);
    match outcome {
        Ok(()) => 0,
        Err(payload) => {
            state.panic = Some(payload);
            1
        }
    }
}

// ============================================================================
// Pools
// ============================================================================

impl Pool<'_> {
    /// Visit every imported pool. Each handle is closed after its visit.
    pub fn for_each<F>(session: &Session, mut visit: F) -> Result<()>
    where
        F: FnMut(&Pool<'_>),
    {
        let mut state = VisitState::new(session, &mut visit);
        let ret = unsafe {
            ffi::zpool_iter(session.raw(), Some(pool_trampoline::<F>), state.as_data())
        };
        state.finish(ret, "zpool_iter", "all pools")
    }

    pub fn names(session: &Session) -> Result<Vec<String>> {
        let mut names = Vec::new();
        Pool::for_each(session, |pool| names.push(pool.name()))?;
        debug!(count = names.len(), "pools listed");
        Ok(names)
    }
}

// ============================================================================
// Datasets
// ============================================================================

impl Dataset<'_> {
    /// Visit the root dataset of every imported pool
    pub fn for_each_root<F>(session: &Session, mut visit: F) -> Result<()>
    where
        F: FnMut(&Dataset<'_>),
    {
        let mut state = VisitState::new(session, &mut visit);
        let ret = unsafe {
            ffi::zfs_iter_root(session.raw(), Some(dataset_trampoline::<F>), state.as_data())
        };
        state.finish(ret, "zfs_iter_root", "all pools")
    }

    /// Visit direct child filesystems and volumes
    pub fn for_each_filesystem<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Dataset<'_>),
    {
        let mut state = VisitState::new(self.session(), &mut visit);
        let ret = unsafe {
            ffi::zfs_iter_filesystems(self.raw(), Some(dataset_trampoline::<F>), state.as_data())
        };
        state.finish(ret, "zfs_iter_filesystems", &self.name())
    }

    /// Visit snapshots of this dataset
    pub fn for_each_snapshot<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Dataset<'_>),
    {
        let mut state = VisitState::new(self.session(), &mut visit);
        let ret = unsafe {
            ffi::compat::zfs_iter_snapshots(
                self.raw(),
                Some(dataset_trampoline::<F>),
                state.as_data(),
            )
        };
        state.finish(ret, "zfs_iter_snapshots", &self.name())
    }

    /// Visit everything that depends on this dataset, recursively:
    /// children, snapshots and clones of those snapshots
    pub fn for_each_dependent<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Dataset<'_>),
    {
        let mut state = VisitState::new(self.session(), &mut visit);
        let ret = unsafe {
            ffi::zfs_iter_dependents(
                self.raw(),
                B_TRUE,
                Some(dataset_trampoline::<F>),
                state.as_data(),
            )
        };
        state.finish(ret, "zfs_iter_dependents", &self.name())
    }

    pub fn root_names(session: &Session) -> Result<Vec<String>> {
        let mut names = Vec::new();
        Dataset::for_each_root(session, |ds| names.push(ds.name()))?;
        Ok(names)
    }

    pub fn filesystem_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.for_each_filesystem(|ds| names.push(ds.name()))?;
        Ok(names)
    }

    pub fn snapshot_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.for_each_snapshot(|ds| names.push(ds.name()))?;
        Ok(names)
    }

    pub fn dependent_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.for_each_dependent(|ds| names.push(ds.name()))?;
        Ok(names)
    }
}
