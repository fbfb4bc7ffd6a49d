//! Virtual paths and how they relate to one another.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized absolute path in the virtual namespace.
///
/// Displayed with a single leading slash and no trailing slash; the root is
/// `/`. Parsing never fails: empty components are dropped, so `//a//b/`
/// and `a/b` both normalize to `/a/b`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VirtualPath {
    pub components: Vec<String>,
}

impl VirtualPath {
    /// The namespace root, `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and normalize a path string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use releasefs_core::VirtualPath;
    ///
    /// assert_eq!(VirtualPath::parse("/a/b/").to_string(), "/a/b");
    /// assert_eq!(VirtualPath::parse("a//b").to_string(), "/a/b");
    /// assert_eq!(VirtualPath::parse("").to_string(), "/");
    /// ```
    pub fn parse(s: &str) -> Self {
        let components = s
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();
        VirtualPath { components }
    }

    /// Check if this is the namespace root.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if this path has no components (same as `is_root`).
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The last component, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// The parent path; the root is its own parent.
    #[must_use]
    pub fn parent(&self) -> VirtualPath {
        let end = self.components.len().saturating_sub(1);
        VirtualPath {
            components: self.components[..end].to_vec(),
        }
    }

    /// Append one component.
    #[must_use]
    pub fn child(&self, name: &str) -> VirtualPath {
        let mut components = self.components.clone();
        components.push(name.to_string());
        VirtualPath { components }
    }

    /// Check if this path has the given prefix, component-wise.
    ///
    /// `/ab` does not have the prefix `/a`.
    pub fn has_prefix(&self, prefix: &VirtualPath) -> bool {
        prefix.components.len() <= self.components.len()
            && prefix.components == self.components[..prefix.components.len()]
    }

    /// Strip a prefix from this path.
    ///
    /// Returns `None` if the prefix doesn't match.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &VirtualPath) -> Option<VirtualPath> {
        if self.has_prefix(prefix) {
            Some(VirtualPath {
                components: self.components[prefix.components.len()..].to_vec(),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.components.join("/"))
    }
}

impl From<&str> for VirtualPath {
    fn from(s: &str) -> Self {
        VirtualPath::parse(s)
    }
}

impl From<String> for VirtualPath {
    fn from(s: String) -> Self {
        VirtualPath::parse(&s)
    }
}

impl From<VirtualPath> for String {
    fn from(path: VirtualPath) -> Self {
        path.to_string()
    }
}

/// The single path segment immediately below `base` on the way to `whole`.
///
/// Returns `None` unless `whole` is a strict descendant of `base`. Both
/// arguments play either role: the listing code asks once with
/// `(mount, query)` and once with `(query, mount)`.
pub fn next_segment(whole: &VirtualPath, base: &VirtualPath) -> Option<String> {
    if whole.len() <= base.len() || !whole.has_prefix(base) {
        return None;
    }
    Some(whole.components[base.len()].clone())
}

/// How a mount point's path relates to a queried path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRelation {
    /// The query is the mount path itself.
    Same,
    /// The mount lives below the query; `next` is the directory to
    /// synthesize at the query level.
    QueryIsAncestor { next: String },
    /// The query lives below the mount; `next` is the first segment inside
    /// the mount.
    QueryIsDescendant { next: String },
    /// Neither path contains the other.
    Unrelated,
}

impl PathRelation {
    /// Classify `query` relative to `mount`.
    pub fn between(mount: &VirtualPath, query: &VirtualPath) -> Self {
        if mount == query {
            return PathRelation::Same;
        }
        if let Some(next) = next_segment(mount, query) {
            return PathRelation::QueryIsAncestor { next };
        }
        if let Some(next) = next_segment(query, mount) {
            return PathRelation::QueryIsDescendant { next };
        }
        PathRelation::Unrelated
    }
}
