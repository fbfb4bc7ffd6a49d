//! Release API payloads.
//!
//! Only the fields the virtual tree needs are modelled; unknown fields are
//! ignored so the payloads stay tolerant of API additions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tagged release and its assets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    /// Drafts have no publish time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Sum of all asset sizes.
    pub fn total_size(&self) -> u64 {
        self.assets.iter().map(|asset| asset.size).sum()
    }

    /// Publish time, or creation time for unpublished releases.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
    pub browser_download_url: String,
}

/// An entry of a repository's top-level contents listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: u64,
    /// `file`, `dir`, `symlink` or `submodule`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentEntry {
    /// Readme-like files shown next to release assets: Markdown documents
    /// and licence files.
    pub fn is_extra_file(&self) -> bool {
        self.kind == "file"
            && self.download_url.is_some()
            && (self.name.ends_with(".md") || self.name.starts_with("LICENSE"))
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}
