//! Driver configuration.
//!
//! The JSON keys match what hosts already store for this driver:
//!
//! ```json
//! {
//!   "repo_structure": "/tools:owner/cli\n/tools/gui:owner/gui",
//!   "show_readme": true,
//!   "token": "",
//!   "show_all_version": false,
//!   "gh_proxy": "https://gh-proxy.com/github.com",
//!   "concurrent_requests": true
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use releasefs_core::Error;
use releasefs_http::DEFAULT_API_BASE;

/// Which releases a mount point exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    /// The newest release's assets are the mount's content.
    Latest,
    /// Every release is a subdirectory named by its tag.
    AllVersions,
}

/// Per-listing knobs handed to each mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    pub mode: ListingMode,
    pub show_readme: bool,
    pub release_pages: u32,
}

/// Configuration for one `GithubReleases` driver instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GithubReleasesConfig {
    /// Mount specification: one `[path:]owner/repo` per line.
    pub repo_structure: String,
    /// Show README and LICENSE files next to release assets.
    pub show_readme: bool,
    /// Bearer token for private repositories or a larger rate limit.
    pub token: String,
    /// Expose every release as a directory instead of only the latest.
    pub show_all_version: bool,
    /// Replaces `https://github.com` in download links when non-empty.
    pub gh_proxy: String,
    /// Query mount points in parallel.
    pub concurrent_requests: bool,
    /// Base URL of the release API.
    pub api_base: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// How many pages of 100 releases to read in all-versions mode.
    pub release_pages: u32,
}

impl Default for GithubReleasesConfig {
    fn default() -> Self {
        Self {
            repo_structure: "OpenListTeam/OpenList".to_string(),
            show_readme: true,
            token: String::new(),
            show_all_version: false,
            gh_proxy: String::new(),
            concurrent_requests: false,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
            release_pages: 1,
        }
    }
}

impl GithubReleasesConfig {
    /// Parse a JSON configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Read a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::InvalidConfig {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    pub fn mode(&self) -> ListingMode {
        if self.show_all_version {
            ListingMode::AllVersions
        } else {
            ListingMode::Latest
        }
    }

    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions {
            mode: self.mode(),
            show_readme: self.show_readme,
            release_pages: self.release_pages.max(1),
        }
    }
}
