//! The `GithubReleases` driver facade.

use std::sync::Arc;
use std::time::Duration;

use releasefs_core::{Driver, DriverInfo, Error, File, Link, LinkArgs, ListArgs, Obj, VirtualPath};
use releasefs_http::{HttpExecutor, ReleaseClient, ReqwestExecutor};

use crate::config::GithubReleasesConfig;
use crate::merge::{list_concurrent, list_sequential};
use crate::mount_point::MountPoint;
use crate::mount_spec::parse_mount_spec;

/// Origin of release download links, replaced by `gh_proxy` when set.
pub const DOWNLOAD_ORIGIN: &str = "https://github.com";

/// Presents the releases of one or more repositories as a directory tree.
///
/// ```ignore
/// use releasefs_core::{Driver, ListArgs, VirtualPath};
/// use releasefs_github_releases::{GithubReleases, GithubReleasesConfig};
///
/// let config = GithubReleasesConfig {
///     repo_structure: "/tools:owner/cli\n/tools/gui:owner/gui".to_string(),
///     ..Default::default()
/// };
/// let mut driver = GithubReleases::new(config)?;
/// driver.init()?;
///
/// for entry in driver.list(&VirtualPath::parse("/tools"), &ListArgs::default())? {
///     println!("{} {}", entry.name, entry.size);
/// }
/// ```
pub struct GithubReleases {
    config: GithubReleasesConfig,
    points: Vec<MountPoint>,
    client: ReleaseClient,
}

impl GithubReleases {
    /// Create a driver that talks to the configured API over HTTP.
    pub fn new(config: GithubReleasesConfig) -> Result<Self, Error> {
        let executor = ReqwestExecutor::new(Duration::from_secs(config.timeout_secs))
            .map_err(releasefs_http::Error::into_config_error)?;
        Self::with_executor(config, Arc::new(executor))
    }

    /// Create a driver on top of a caller-supplied executor.
    pub fn with_executor(
        config: GithubReleasesConfig,
        executor: Arc<dyn HttpExecutor>,
    ) -> Result<Self, Error> {
        let client =
            ReleaseClient::new(executor, &config.api_base)?.with_token(config.token.as_str());

        Ok(Self {
            config,
            points: Vec::new(),
            client,
        })
    }

    pub fn config(&self) -> &GithubReleasesConfig {
        &self.config
    }

    /// Mount points in mount order.
    pub fn mounts(&self) -> &[MountPoint] {
        &self.points
    }

    /// The release client, including the rate guard shared by all mounts.
    pub fn client(&self) -> &ReleaseClient {
        &self.client
    }

    /// Replace the mount list from a mount specification.
    ///
    /// On error the previous mount list is kept untouched.
    pub fn parse_repos(&mut self, text: &str) -> Result<&[MountPoint], Error> {
        self.points = parse_mount_spec(text)?;
        log::debug!("parsed {} mount points", self.points.len());
        Ok(&self.points)
    }

    /// Resolve a download URL, routing it through `proxy` when non-empty.
    pub fn resolve_download(url: &str, proxy: &str) -> String {
        let proxy = proxy.trim();
        match url.strip_prefix(DOWNLOAD_ORIGIN) {
            Some(rest) if !proxy.is_empty() => format!("{}{}", proxy, rest),
            _ => url.to_string(),
        }
    }
}

impl Driver for GithubReleases {
    fn info(&self) -> DriverInfo {
        DriverInfo {
            name: "GitHub Releases".to_string(),
            local_sort: false,
            no_upload: true,
            default_root: VirtualPath::root(),
        }
    }

    fn init(&mut self) -> Result<(), Error> {
        let text = self.config.repo_structure.clone();
        self.parse_repos(&text)?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), Error> {
        for point in &mut self.points {
            point.clear_cache();
        }
        Ok(())
    }

    fn list(&mut self, dir: &VirtualPath, args: &ListArgs) -> Result<Vec<File>, Error> {
        let options = self.config.listing_options();
        if self.config.concurrent_requests {
            list_concurrent(&mut self.points, &self.client, dir, &options, args.refresh)
        } else {
            list_sequential(&mut self.points, &self.client, dir, &options, args.refresh)
        }
    }

    fn link(&self, file: &dyn Obj, _args: &LinkArgs) -> Result<Link, Error> {
        Ok(Link {
            url: Self::resolve_download(file.id(), &self.config.gh_proxy),
            headers: Default::default(),
        })
    }
}
