//! # releasefs-cli
//!
//! A small command line front end for the GitHub releases driver.
//!
//! ## Usage
//!
//! ```bash
//! # List the latest release of a repository mounted at the root
//! releasefs --repos OpenListTeam/OpenList ls /
//!
//! # Several mounts, every release as a tag directory
//! releasefs --repos "/tools:owner/cli,/tools/gui:owner/gui" --all-versions ls /tools
//!
//! # Resolve a download link through a proxy
//! releasefs --config releasefs.json --proxy https://gh-proxy.com/github.com link /tools/cli.tar.gz
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see requests
//! and cache hits.

pub mod commands;

pub use commands::{execute, run, CliError, Command, ConfigArgs};
