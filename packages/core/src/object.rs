//! Listing entries and the object contract exposed to the host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::path::VirtualPath;

/// Whether an entry is a directory or a downloadable file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Dir,
}

/// What the host sees for every listed entry.
///
/// # Object Safety
///
/// This trait is object-safe: hosts can hold `Box<dyn Obj>`.
pub trait Obj: Send + Sync {
    fn name(&self) -> &str;
    fn path(&self) -> &VirtualPath;
    /// Size in bytes. Directories report the sum of what they contain.
    fn size(&self) -> u64;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn is_dir(&self) -> bool;
    /// Stable identifier; for files this is the download URL.
    fn id(&self) -> &str;
}

/// One virtual filesystem entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct File {
    pub path: VirtualPath,
    pub name: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub kind: FileKind,
    /// Direct download URL. Empty for synthesized directories.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl File {
    /// A downloadable file at `parent/name`.
    pub fn file(
        parent: &VirtualPath,
        name: impl Into<String>,
        size: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        url: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            path: parent.child(&name),
            name,
            size,
            created_at,
            updated_at,
            kind: FileKind::File,
            url: url.into(),
        }
    }

    /// A directory at `parent/name` with no download URL.
    pub fn dir(
        parent: &VirtualPath,
        name: impl Into<String>,
        size: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        Self {
            path: parent.child(&name),
            name,
            size,
            created_at,
            updated_at,
            kind: FileKind::Dir,
            url: String::new(),
        }
    }
}

impl Obj for File {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &VirtualPath {
        &self.path
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    fn id(&self) -> &str {
        &self.url
    }
}
