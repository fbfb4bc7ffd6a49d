//! One repository bound into the virtual namespace.
//!
//! A mount point owns its release cache exclusively. Listing workers each
//! hold a `&mut MountPoint`, so the cache needs no lock of its own.

use chrono::{DateTime, Utc};

use releasefs_core::{Error, File, PathRelation, VirtualPath};
use releasefs_http::{ContentEntry, Release, ReleaseClient};

use crate::config::{ListingMode, ListingOptions};
use crate::merge::merge_files;

/// Cached release data, keyed by the listing mode that fetched it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReleaseCache {
    /// Nothing fetched yet.
    #[default]
    Empty,
    /// Latest-only mode: the newest release.
    Latest(Release),
    /// All-versions mode: every release, newest first.
    All(Vec<Release>),
}

impl ReleaseCache {
    /// Whether this cache already holds data for `mode`.
    pub fn holds(&self, mode: ListingMode) -> bool {
        matches!(
            (self, mode),
            (ReleaseCache::Latest(_), ListingMode::Latest)
                | (ReleaseCache::All(_), ListingMode::AllVersions)
        )
    }
}

/// A repository mounted at a path of the virtual tree.
#[derive(Debug, Clone)]
pub struct MountPoint {
    point: VirtualPath,
    repo: String,
    cache: ReleaseCache,
    extra_files: Option<Vec<ContentEntry>>,
}

impl MountPoint {
    pub fn new(point: VirtualPath, repo: impl Into<String>) -> Self {
        Self {
            point,
            repo: repo.into(),
            cache: ReleaseCache::Empty,
            extra_files: None,
        }
    }

    /// Where the repository's root sits in the tree.
    pub fn point(&self) -> &VirtualPath {
        &self.point
    }

    /// The `owner/name` repository id.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn cache(&self) -> &ReleaseCache {
        &self.cache
    }

    /// Replace the release cache wholesale.
    pub fn set_cache(&mut self, cache: ReleaseCache) {
        self.cache = cache;
    }

    pub fn clear_cache(&mut self) {
        self.cache = ReleaseCache::Empty;
        self.extra_files = None;
    }

    /// List what this mount point contributes at `query`.
    ///
    /// Release data is fetched only when the relation between the mount and
    /// the query needs it, and re-fetched when `refresh` is set.
    pub fn list(
        &mut self,
        client: &ReleaseClient,
        query: &VirtualPath,
        options: &ListingOptions,
        refresh: bool,
    ) -> Result<Vec<File>, Error> {
        let relation = PathRelation::between(&self.point, query);
        if !needs_releases(&relation, options.mode) {
            return Ok(Vec::new());
        }

        self.fetch_releases(client, options, refresh)?;
        let mut files = self.entries(&relation, query);

        if relation == PathRelation::Same && options.show_readme {
            files.extend(self.extra_files(client, refresh)?);
        }

        Ok(files)
    }

    /// Fill the cache for `options.mode` unless it already holds data.
    pub fn fetch_releases(
        &mut self,
        client: &ReleaseClient,
        options: &ListingOptions,
        refresh: bool,
    ) -> Result<(), Error> {
        if !refresh && self.cache.holds(options.mode) {
            log::debug!("using cached releases for {}", self.repo);
            return Ok(());
        }

        self.cache = match options.mode {
            ListingMode::Latest => ReleaseCache::Latest(client.latest_release(&self.repo)?),
            ListingMode::AllVersions => {
                ReleaseCache::All(client.releases(&self.repo, options.release_pages)?)
            }
        };
        Ok(())
    }

    /// Build entries from cached data for an already classified query.
    pub fn entries(&self, relation: &PathRelation, query: &VirtualPath) -> Vec<File> {
        match (&self.cache, relation) {
            (ReleaseCache::Latest(release), PathRelation::Same) => {
                asset_files(&self.point, release)
            }
            (ReleaseCache::Latest(release), PathRelation::QueryIsAncestor { next }) => {
                vec![File::dir(
                    query,
                    next.as_str(),
                    release.total_size(),
                    release.created_at,
                    release.updated_at(),
                )]
            }
            (ReleaseCache::All(releases), PathRelation::Same) => {
                tag_level(&self.point, &[], releases)
            }
            (ReleaseCache::All(releases), PathRelation::QueryIsAncestor { next }) => {
                let (size, created_at, updated_at) = match releases.first() {
                    Some(newest) => (newest.total_size(), newest.created_at, newest.updated_at()),
                    None => (0, epoch(), epoch()),
                };
                vec![File::dir(query, next.as_str(), size, created_at, updated_at)]
            }
            (ReleaseCache::All(releases), PathRelation::QueryIsDescendant { .. }) => {
                match query.strip_prefix(&self.point) {
                    Some(rest) => tag_level(query, &rest.components, releases),
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn extra_files(&mut self, client: &ReleaseClient, refresh: bool) -> Result<Vec<File>, Error> {
        if refresh || self.extra_files.is_none() {
            self.extra_files = Some(client.contents(&self.repo)?);
        }

        let files = self
            .extra_files
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|entry| entry.is_extra_file())
            .map(|entry| {
                File::file(
                    &self.point,
                    entry.name.as_str(),
                    entry.size,
                    epoch(),
                    epoch(),
                    entry.download_url.clone().unwrap_or_default(),
                )
            })
            .collect();

        Ok(files)
    }
}

fn needs_releases(relation: &PathRelation, mode: ListingMode) -> bool {
    match relation {
        PathRelation::Same | PathRelation::QueryIsAncestor { .. } => true,
        PathRelation::QueryIsDescendant { .. } => mode == ListingMode::AllVersions,
        PathRelation::Unrelated => false,
    }
}

/// Entries at `dir`, which lies `rest` components below the mount.
///
/// Tags are matched component-wise, so a tag such as `cli/v1` shows up as a
/// `cli` directory holding a `v1` directory holding the assets. Directories
/// shared by several tags are merged with their sizes summed.
fn tag_level(dir: &VirtualPath, rest: &[String], releases: &[Release]) -> Vec<File> {
    let mut files = Vec::new();
    for release in releases {
        let tag = VirtualPath::parse(&release.tag_name);
        if tag.is_root() {
            continue;
        }
        let entries = match tag.components.strip_prefix(rest) {
            Some([]) => asset_files(dir, release),
            Some([next, ..]) => vec![File::dir(
                dir,
                next.as_str(),
                release.total_size(),
                release.created_at,
                release.updated_at(),
            )],
            None => continue,
        };
        merge_files(&mut files, entries);
    }
    files
}

fn asset_files(parent: &VirtualPath, release: &Release) -> Vec<File> {
    release
        .assets
        .iter()
        .map(|asset| {
            File::file(
                parent,
                asset.name.as_str(),
                asset.size,
                asset.created_at,
                asset.updated_at,
                asset.browser_download_url.as_str(),
            )
        })
        .collect()
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}
