// zfs/mod.rs
// Safe wrappers over libzfs: session, pools, datasets, error table

mod dataset;
mod error;
mod ffi;
mod helpers;
mod iter;
mod pool;
mod session;
mod share;
mod typed;
mod types;

#[cfg(test)]
mod tests;

pub use dataset::Dataset;
pub use error::{ErrorKind, LastError, Result, ZfsError};
pub use helpers::{DatasetName, PoolName, MAX_NAME_LEN};
pub use pool::Pool;
pub use session::{LazySession, Session};
pub use typed::{Filesystem, PoolDataset, Snapshot, TypedDataset, Volume};
pub use types::{DatasetType, PoolHealth, PoolState, PoolStatus, PropValue, TypeMask};
