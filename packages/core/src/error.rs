//! Error types for the core layer.

use crate::path::VirtualPath;

/// Errors surfaced by drivers to the host.
///
/// None of these are retried internally. A `RateLimited` error means the
/// remote budget is exhausted until `reset_at`; callers decide what to do.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Remote API budget exhausted and the reset time is still in the future.
    #[error("rate limit exceeded, resets at unix time {reset_at}")]
    RateLimited { reset_at: i64 },

    /// Non-success response, transport failure, or undecodable body.
    #[error("fetch of {url} failed{}: {message}", status_suffix(.status))]
    RemoteFetchFailed {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Malformed line in the mount specification.
    #[error("invalid mount specification '{line}': {message}")]
    InvalidMountSpec { line: String, message: String },

    /// Mutating operations are never attempted.
    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    /// Driver configuration could not be used.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// No entry at the given path.
    #[error("not found: {path}")]
    NotFound { path: VirtualPath },
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" with status {}", status),
        None => String::new(),
    }
}

impl Error {
    /// Shorthand for a failed fetch with no HTTP status (transport or decode).
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RemoteFetchFailed {
            url: url.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Whether this error is the unsupported-operation signal.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented { .. })
    }
}
