//! Core releasefs: the virtual namespace layer
//!
//! This layer defines what every driver speaks:
//! - `VirtualPath`: Normalized absolute path in the virtual tree
//! - `PathRelation`: How a mount path relates to a queried path
//! - `File`: One listing entry, either a directory or a downloadable asset
//! - `Driver`: The storage-driver seam a host calls into
//!
//! # Example
//!
//! ```rust
//! use releasefs_core::{PathRelation, VirtualPath};
//!
//! let mount = VirtualPath::parse("/tools/cli");
//! let query = VirtualPath::parse("/tools");
//!
//! assert_eq!(
//!     PathRelation::between(&mount, &query),
//!     PathRelation::QueryIsAncestor { next: "cli".to_string() },
//! );
//! ```

mod error;
mod object;
mod path;
mod traits;

pub use error::Error;
pub use object::{File, FileKind, Obj};
pub use path::{next_segment, PathRelation, VirtualPath};
pub use traits::{Driver, DriverInfo, Link, LinkArgs, ListArgs};

/// Result alias used across releasefs crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;
