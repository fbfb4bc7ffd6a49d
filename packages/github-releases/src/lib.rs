//! # releasefs-github-releases
//!
//! A read-only driver that mounts the releases of one or more GitHub
//! repositories into a single virtual directory tree.
//!
//! ## Mounting
//!
//! Mounts come from a text block, one per line:
//!
//! ```text
//! /tools:owner/cli
//! /tools/gui:owner/gui
//! owner/at-root
//! ```
//!
//! Listing `/tools` then shows the assets of `owner/cli`'s latest release
//! next to a synthesized `gui` directory. Directories contributed by several
//! mounts collapse into one entry whose size is the sum of their sizes.
//!
//! ## Modes
//!
//! - Latest-only (default): a mount's content is its newest release's assets.
//! - All versions: a mount's content is one directory per release tag.
//!
//! Release data is cached per mount point until a refreshing listing or
//! `shutdown`. All mounts share one rate guard, so an exhausted API budget
//! fails every further fetch until the reset time.

pub mod config;
pub mod driver;
pub mod merge;
pub mod mount_point;
pub mod mount_spec;

pub use config::{GithubReleasesConfig, ListingMode, ListingOptions};
pub use driver::{GithubReleases, DOWNLOAD_ORIGIN};
pub use merge::{list_concurrent, list_sequential, merge_files};
pub use mount_point::{MountPoint, ReleaseCache};
pub use mount_spec::parse_mount_spec;
