// zfs/typed.rs
// Capability-typed dataset handles

use super::dataset::Dataset;
use super::error::Result;
use super::helpers::DatasetName;
use super::session::Session;
use super::types::{DatasetType, PropValue};

/// Inherent methods that pass straight through to the wrapped `Dataset`
macro_rules! forward {
    ($($(#[$attr:meta])* fn $method:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty;)+) => {
        $(
            $(#[$attr])*
            pub fn $method(&self $(, $arg: $ty)*) -> $ret {
                self.0.$method($($arg),*)
            }
        )+
    };
}

macro_rules! forward_visit {
    ($($method:ident),+ $(,)?) => {
        $(
            pub fn $method<F>(&self, visit: F) -> Result<()>
            where
                F: FnMut(&Dataset<'_>),
            {
                self.0.$method(visit)
            }
        )+
    };
}

// No Deref to `Dataset`: each handle exposes only what its type supports,
// and `into_inner` is the way back to the dynamically checked API.
macro_rules! typed_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name<'s>(Dataset<'s>);

        impl<'s> $name<'s> {
            pub fn into_inner(self) -> Dataset<'s> {
                self.0
            }

            pub fn destroy(self) -> Result<()> {
                self.0.destroy()
            }

            forward! {
                fn session(&self) -> &'s Session;
                fn name(&self) -> String;
                fn dataset_type(&self) -> DatasetType;
                fn get(&self, property: &str) -> Result<Option<PropValue>>;
                fn get_user_prop(&self, property: &str) -> Result<Option<String>>;
                fn set(&self, property: &str, value: &str) -> Result<()>;
                fn rename(&self, target: &DatasetName, recursive: bool) -> Result<()>;
                fn dependent_names(&self) -> Result<Vec<String>>;
            }

            forward_visit!(for_each_dependent);
        }
    };
}

typed_handle!(
    /// A dataset known to be a filesystem.
    ///
    /// Only snapshots can be cloned, so this does not compile:
    ///
    /// ```compile_fail
    /// use zetta::zfs::{DatasetName, Filesystem};
    ///
    /// fn clone(fs: &Filesystem<'_>, target: &DatasetName) {
    ///     let _ = fs.clone_to(target);
    /// }
    /// ```
    ///
    /// Rolling back to one of its snapshots does:
    ///
    /// ```no_run
    /// use zetta::zfs::{Filesystem, Result, Snapshot};
    ///
    /// fn restore(fs: &Filesystem<'_>, snap: &Snapshot<'_>) -> Result<()> {
    ///     fs.rollback(snap, false)
    /// }
    /// ```
    Filesystem
);
typed_handle!(
    /// A dataset known to be a volume
    Volume
);
typed_handle!(
    /// A dataset known to be a snapshot.
    ///
    /// A snapshot cannot be rolled back:
    ///
    /// ```compile_fail
    /// use zetta::zfs::Snapshot;
    ///
    /// fn rollback(snap: &Snapshot<'_>, other: &Snapshot<'_>) {
    ///     let _ = snap.rollback(other, false);
    /// }
    /// ```
    Snapshot
);
typed_handle!(
    /// The root dataset opened with the pool type bit
    PoolDataset
);

/// A dataset split by type, so type-gated operations are checked at compile time
pub enum TypedDataset<'s> {
    Filesystem(Filesystem<'s>),
    Volume(Volume<'s>),
    Snapshot(Snapshot<'s>),
    Pool(PoolDataset<'s>),
}

impl<'s> Dataset<'s> {
    pub fn into_typed(self) -> TypedDataset<'s> {
        match self.dataset_type() {
            DatasetType::Filesystem => TypedDataset::Filesystem(Filesystem(self)),
            DatasetType::Volume => TypedDataset::Volume(Volume(self)),
            DatasetType::Snapshot => TypedDataset::Snapshot(Snapshot(self)),
            DatasetType::Pool => TypedDataset::Pool(PoolDataset(self)),
        }
    }
}

impl<'s> TypedDataset<'s> {
    pub fn into_dataset(self) -> Dataset<'s> {
        match self {
            TypedDataset::Filesystem(d) => d.0,
            TypedDataset::Volume(d) => d.0,
            TypedDataset::Snapshot(d) => d.0,
            TypedDataset::Pool(d) => d.0,
        }
    }

    pub fn dataset_type(&self) -> DatasetType {
        match self {
            TypedDataset::Filesystem(d) => d.dataset_type(),
            TypedDataset::Volume(d) => d.dataset_type(),
            TypedDataset::Snapshot(d) => d.dataset_type(),
            TypedDataset::Pool(d) => d.dataset_type(),
        }
    }
}

// ============================================================================
// Per-type capabilities
// ============================================================================

impl<'s> Snapshot<'s> {
    /// Clone into a new filesystem or volume
    pub fn clone_to(&self, target: &DatasetName) -> Result<Dataset<'s>> {
        self.0.clone_to(target)
    }
}

impl Filesystem<'_> {
    pub fn rollback(&self, snapshot: &Snapshot<'_>, force: bool) -> Result<()> {
        self.0.rollback(&snapshot.0, force)
    }

    forward! {
        fn promote(&self) -> Result<()>;
        fn mount(&self) -> Result<()>;
        fn unmount(&self) -> Result<()>;
        fn is_mounted(&self) -> bool;
        fn mountpoint(&self) -> Option<String>;
        fn share(&self) -> Result<()>;
        fn unshare(&self) -> Result<()>;
        fn is_shared(&self) -> bool;
        fn share_nfs(&self) -> Result<()>;
        fn unshare_nfs(&self) -> Result<()>;
        fn is_shared_nfs(&self) -> bool;
        fn nfs_share_name(&self) -> Option<String>;
        fn filesystem_names(&self) -> Result<Vec<String>>;
        fn snapshot_names(&self) -> Result<Vec<String>>;
    }

    #[cfg(feature = "smb")]
    forward! {
        fn share_smb(&self) -> Result<()>;
        fn unshare_smb(&self) -> Result<()>;
        fn is_shared_smb(&self) -> bool;
        fn smb_share_name(&self) -> Option<String>;
    }

    forward_visit!(for_each_filesystem, for_each_snapshot);
}

impl Volume<'_> {
    pub fn rollback(&self, snapshot: &Snapshot<'_>, force: bool) -> Result<()> {
        self.0.rollback(&snapshot.0, force)
    }

    forward! {
        fn promote(&self) -> Result<()>;
        fn snapshot_names(&self) -> Result<Vec<String>>;
    }

    #[cfg(feature = "iscsi")]
    forward! {
        fn share_iscsi(&self) -> Result<()>;
        fn unshare_iscsi(&self) -> Result<()>;
        fn is_shared_iscsi(&self) -> bool;
    }

    forward_visit!(for_each_snapshot);
}

impl PoolDataset<'_> {
    forward! {
        fn filesystem_names(&self) -> Result<Vec<String>>;
        fn snapshot_names(&self) -> Result<Vec<String>>;
    }

    forward_visit!(for_each_filesystem, for_each_snapshot);
}
