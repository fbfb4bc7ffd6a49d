//! # releasefs-http
//!
//! The remote side of releasefs: a small client for a GitHub-style release
//! API, built on a mockable HTTP executor and guarded by a shared rate-limit
//! cell.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use releasefs_http::{ReleaseClient, ReqwestExecutor, DEFAULT_API_BASE};
//!
//! let executor = Arc::new(ReqwestExecutor::with_default_timeout()?);
//! let client = ReleaseClient::new(executor, DEFAULT_API_BASE)?.with_token(token);
//!
//! let latest = client.latest_release("OpenListTeam/OpenList")?;
//! for asset in &latest.assets {
//!     println!("{} {}", asset.name, asset.size);
//! }
//! ```
//!
//! ## Rate limiting
//!
//! Every response carrying `X-RateLimit-Remaining` and `X-RateLimit-Reset`
//! refreshes the client's [`RateGuard`]. Once the budget hits zero, requests
//! fail with `RateLimited` until the reset time passes. Nothing is retried.

pub mod client;
pub mod error;
pub mod executor;
pub mod rate_guard;
pub mod release;
pub mod types;

// Re-export main types
pub use client::{ReleaseClient, DEFAULT_API_BASE, RELEASES_PER_PAGE};
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use rate_guard::{RateGuard, RateState};
pub use release::{Asset, ContentEntry, Release};
pub use types::{HttpRequest, HttpResponse};
