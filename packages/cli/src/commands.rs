//! Command parsing and execution.
//!
//! Commands:
//! - `ls [path] [--refresh]` - List a directory of the virtual tree
//! - `link <path>` - Print the download link of a file
//!
//! The driver configuration comes from `--config FILE` (JSON), with the
//! remaining flags overriding individual keys.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use releasefs_core::{Driver, Error, File, FileKind, LinkArgs, ListArgs, VirtualPath};
use releasefs_github_releases::{GithubReleases, GithubReleasesConfig};

/// Errors surfaced by the command line front end.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Driver(#[from] Error),

    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flags that build the driver configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON driver configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mounts as `[path:]owner/repo`, separated by newlines or commas
    #[arg(long, value_name = "TEXT")]
    pub repos: Option<String>,

    /// Show every release as a directory named by its tag
    #[arg(long)]
    pub all_versions: bool,

    /// Show README and LICENSE files next to assets (`--readme false` hides them)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub readme: Option<bool>,

    /// Query mount points in parallel
    #[arg(long)]
    pub concurrent: bool,

    /// API token
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Replacement for `https://github.com` in download links
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,
}

impl ConfigArgs {
    /// Load the configuration file, if any, and apply flag overrides.
    pub fn load(&self) -> Result<GithubReleasesConfig, Error> {
        let mut config = match &self.config {
            Some(path) => GithubReleasesConfig::from_file(path)?,
            None => GithubReleasesConfig::default(),
        };

        if let Some(repos) = &self.repos {
            config.repo_structure = repos.replace(',', "\n");
        }
        if self.all_versions {
            config.show_all_version = true;
        }
        if let Some(readme) = self.readme {
            config.show_readme = readme;
        }
        if self.concurrent {
            config.concurrent_requests = true;
        }
        if let Some(token) = &self.token {
            config.token = token.clone();
        }
        if let Some(proxy) = &self.proxy {
            config.gh_proxy = proxy.clone();
        }

        Ok(config)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,

        /// Re-fetch release data
        #[arg(long)]
        refresh: bool,
    },
    /// Print the download link of a file
    Link { path: String },
}

/// Build a driver from the flags, run one command, and shut the driver down.
pub fn run(args: &ConfigArgs, command: &Command, json: bool) -> Result<String, CliError> {
    let config = args.load()?;
    let mut driver = GithubReleases::new(config)?;
    driver.init()?;
    log::debug!("running {:?} over {} mounts", command, driver.mounts().len());

    let output = execute(&mut driver, command, json);
    driver.shutdown()?;
    output
}

/// Run one command against an initialized driver.
pub fn execute(driver: &mut dyn Driver, command: &Command, json: bool) -> Result<String, CliError> {
    match command {
        Command::Ls { path, refresh } => {
            let files = driver.list(&VirtualPath::parse(path), &ListArgs { refresh: *refresh })?;
            if json {
                Ok(serde_json::to_string_pretty(&files)?)
            } else {
                Ok(format_listing(&files))
            }
        }
        Command::Link { path } => {
            let file = find_file(driver, &VirtualPath::parse(path))?;
            let link = driver.link(&file, &LinkArgs::default())?;
            if json {
                Ok(serde_json::to_string_pretty(&link)?)
            } else {
                Ok(link.url)
            }
        }
    }
}

/// Look up a downloadable file by listing its parent directory.
fn find_file(driver: &mut dyn Driver, path: &VirtualPath) -> Result<File, Error> {
    let not_found = || Error::NotFound { path: path.clone() };
    let name = path.name().ok_or_else(not_found)?;

    driver
        .list(&path.parent(), &ListArgs::default())?
        .into_iter()
        .find(|f| f.kind == FileKind::File && f.name == name)
        .ok_or_else(not_found)
}

/// One line per entry: kind, size, last update, name.
pub fn format_listing(files: &[File]) -> String {
    files
        .iter()
        .map(|f| {
            let kind = match f.kind {
                FileKind::Dir => 'd',
                FileKind::File => '-',
            };
            format!(
                "{} {:>12} {} {}",
                kind,
                f.size,
                f.updated_at.format("%Y-%m-%d %H:%M"),
                f.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
