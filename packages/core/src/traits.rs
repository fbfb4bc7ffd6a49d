//! The storage-driver seam between a host and a releasefs driver.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, File, Obj, Result, VirtualPath};

/// Static facts a host needs about a driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriverInfo {
    pub name: String,
    /// Whether the host should sort listings itself.
    pub local_sort: bool,
    pub no_upload: bool,
    pub default_root: VirtualPath,
}

/// Options for a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// Re-fetch remote data even when cached data exists.
    pub refresh: bool,
}

/// Options for resolving a download link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkArgs {
    /// Request headers the host received, if it wants them forwarded.
    pub headers: HashMap<String, String>,
}

/// A resolved download location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// A storage driver as the host sees it.
///
/// Read-only drivers only implement listing and linking; every mutating
/// operation defaults to `Error::NotImplemented` and never touches state.
pub trait Driver: Send {
    fn info(&self) -> DriverInfo;

    /// Prepare the driver from its configuration.
    fn init(&mut self) -> Result<()>;

    /// Release cached state.
    fn shutdown(&mut self) -> Result<()>;

    /// List the entries directly below `dir`.
    fn list(&mut self, dir: &VirtualPath, args: &ListArgs) -> Result<Vec<File>>;

    /// Resolve where a listed file can be downloaded from.
    fn link(&self, file: &dyn Obj, args: &LinkArgs) -> Result<Link>;

    fn make_dir(&mut self, _parent: &dyn Obj, _name: &str) -> Result<File> {
        Err(Error::NotImplemented {
            operation: "make_dir",
        })
    }

    fn move_obj(&mut self, _src: &dyn Obj, _dst_dir: &dyn Obj) -> Result<File> {
        Err(Error::NotImplemented {
            operation: "move",
        })
    }

    fn rename(&mut self, _src: &dyn Obj, _new_name: &str) -> Result<File> {
        Err(Error::NotImplemented {
            operation: "rename",
        })
    }

    fn copy(&mut self, _src: &dyn Obj, _dst_dir: &dyn Obj) -> Result<File> {
        Err(Error::NotImplemented {
            operation: "copy",
        })
    }

    fn remove(&mut self, _obj: &dyn Obj) -> Result<()> {
        Err(Error::NotImplemented {
            operation: "remove",
        })
    }
}
