//! Client for the remote release API.
//!
//! Every call passes through the shared [`RateGuard`] first, so an
//! exhausted budget fails fast without touching the network.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use releasefs_core::Error as CoreError;

use crate::executor::HttpExecutor;
use crate::rate_guard::{RateGuard, REMAINING_HEADER, RESET_HEADER};
use crate::release::{ContentEntry, Release};
use crate::types::{HttpRequest, HttpResponse};
use crate::Error;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Page size requested when listing releases (the API maximum).
pub const RELEASES_PER_PAGE: usize = 100;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// Fetches releases and repository contents for `owner/name` repositories.
pub struct ReleaseClient {
    executor: Arc<dyn HttpExecutor>,
    api_base: Url,
    token: Option<String>,
    rate_guard: RateGuard,
}

impl ReleaseClient {
    /// Create a client against the given API base URL.
    pub fn new(executor: Arc<dyn HttpExecutor>, api_base: &str) -> Result<Self, Error> {
        let mut api_base = Url::parse(api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                message: format!("'{}' cannot be used as an API base", api_base),
            });
        }
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        Ok(Self {
            executor,
            api_base,
            token: None,
            rate_guard: RateGuard::new(),
        })
    }

    /// Authenticate requests with a bearer token. Blank tokens are ignored.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    /// The guard shared by every request this client makes.
    pub fn rate_guard(&self) -> &RateGuard {
        &self.rate_guard
    }

    /// `GET /repos/{repo}/releases/latest`
    pub fn latest_release(&self, repo: &str) -> Result<Release, CoreError> {
        let url = self.endpoint(repo, "releases/latest")?;
        self.get_json(HttpRequest::get(url))
    }

    /// `GET /repos/{repo}/releases`, newest first, following up to
    /// `max_pages` pages and stopping early on a short page.
    pub fn releases(&self, repo: &str, max_pages: u32) -> Result<Vec<Release>, CoreError> {
        let url = self.endpoint(repo, "releases")?;
        let mut releases = Vec::new();

        for page in 1..=max_pages.max(1) {
            let request = HttpRequest::get(url.clone())
                .with_query("per_page", RELEASES_PER_PAGE.to_string())
                .with_query("page", page.to_string());
            let batch: Vec<Release> = self.get_json(request)?;
            let short_page = batch.len() < RELEASES_PER_PAGE;
            releases.extend(batch);
            if short_page {
                break;
            }
        }

        Ok(releases)
    }

    /// `GET /repos/{repo}/contents`: the repository's top-level entries.
    pub fn contents(&self, repo: &str) -> Result<Vec<ContentEntry>, CoreError> {
        let url = self.endpoint(repo, "contents")?;
        self.get_json(HttpRequest::get(url))
    }

    fn endpoint(&self, repo: &str, suffix: &str) -> Result<String, CoreError> {
        let repo = repo.trim_matches('/');
        let url = self
            .api_base
            .join(&format!("repos/{}/{}", repo, suffix))
            .map_err(Error::from)?;
        Ok(url.to_string())
    }

    fn get_json<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, CoreError> {
        let url = request.path.clone();
        let response = self.get(request)?;
        response.json().map_err(|e| CoreError::RemoteFetchFailed {
            url,
            status: Some(response.status),
            message: format!("unexpected response body: {}", e),
        })
    }

    fn get(&self, request: HttpRequest) -> Result<HttpResponse, CoreError> {
        self.rate_guard.check()?;

        let mut request = request
            .with_header("Accept", ACCEPT)
            .with_header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            request = request.with_header("Authorization", format!("Bearer {}", token));
        }

        log::info!("GET {}", request.path);
        let response = self
            .executor
            .execute(&request)
            .map_err(|e| CoreError::fetch(&request.path, e.to_string()))?;

        if response.status != 200 {
            let body = response.body_text.clone().unwrap_or_default();
            log::warn!(
                "GET {} failed with status {}: {}",
                request.path,
                response.status,
                body
            );
            return Err(CoreError::RemoteFetchFailed {
                url: request.path,
                status: Some(response.status),
                message: if body.is_empty() {
                    response.status_text
                } else {
                    body
                },
            });
        }

        if let (Some(remaining), Some(reset_at)) = (
            response.header_i64(REMAINING_HEADER),
            response.header_i64(RESET_HEADER),
        ) {
            self.rate_guard.update(remaining, reset_at);
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::mock::MockExecutor;

    const API: &str = "https://api.test";

    fn client(executor: &MockExecutor) -> ReleaseClient {
        ReleaseClient::new(Arc::new(executor.clone()), API).unwrap()
    }

    fn release_json(tag: &str) -> serde_json::Value {
        serde_json::json!({
            "tag_name": tag,
            "created_at": "2025-01-01T00:00:00Z",
            "published_at": "2025-01-02T00:00:00Z",
            "assets": [{
                "name": format!("{}.zip", tag),
                "size": 10,
                "browser_download_url": format!("https://github.com/o/r/releases/download/{}/{}.zip", tag, tag)
            }]
        })
    }

    #[test]
    fn latest_release_sends_api_headers() {
        let executor = MockExecutor::new().with_response(
            "https://api.test/repos/o/r/releases/latest",
            MockExecutor::success_response(release_json("v1")),
        );
        let client = client(&executor).with_token("secret");

        let release = client.latest_release("o/r").unwrap();
        assert_eq!(release.tag_name, "v1");

        let recorded = executor.recorded_requests();
        assert_eq!(recorded.len(), 1);
        let headers = &recorded[0].headers;
        assert_eq!(headers.get("Accept").unwrap(), ACCEPT);
        assert_eq!(headers.get("X-GitHub-Api-Version").unwrap(), API_VERSION);
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer secret");
    }

    #[test]
    fn blank_token_sends_no_authorization() {
        let executor = MockExecutor::new();
        let client = client(&executor).with_token("   ");
        let _ = client.latest_release("o/r");
        assert!(!executor.recorded_requests()[0]
            .headers
            .contains_key("Authorization"));
    }

    #[test]
    fn non_success_status_is_fetch_failure() {
        let executor = MockExecutor::new();
        let err = client(&executor).latest_release("o/missing").unwrap_err();

        match err {
            CoreError::RemoteFetchFailed { url, status, .. } => {
                assert_eq!(url, "https://api.test/repos/o/missing/releases/latest");
                assert_eq!(status, Some(404));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn transport_failure_is_fetch_failure() {
        let executor = MockExecutor::new().fail_with("connection refused");
        let err = client(&executor).contents("o/r").unwrap_err();
        assert!(matches!(
            err,
            CoreError::RemoteFetchFailed { status: None, .. }
        ));
    }

    #[test]
    fn undecodable_body_is_fetch_failure() {
        let executor = MockExecutor::new().with_response(
            "https://api.test/repos/o/r/releases/latest",
            MockExecutor::success_response(serde_json::json!({"unexpected": true})),
        );
        let err = client(&executor).latest_release("o/r").unwrap_err();
        assert!(matches!(
            err,
            CoreError::RemoteFetchFailed {
                status: Some(200),
                ..
            }
        ));
    }

    #[test]
    fn releases_stop_on_short_page() {
        let full_page: Vec<_> = (0..RELEASES_PER_PAGE)
            .map(|i| release_json(&format!("v{}", i)))
            .collect();
        let executor = MockExecutor::new()
            .with_response(
                "https://api.test/repos/o/r/releases?page=1&per_page=100",
                MockExecutor::success_response(serde_json::Value::Array(full_page)),
            )
            .with_response(
                "https://api.test/repos/o/r/releases?page=2&per_page=100",
                MockExecutor::success_response(serde_json::json!([release_json("old")])),
            );

        let releases = client(&executor).releases("o/r", 5).unwrap();
        assert_eq!(releases.len(), RELEASES_PER_PAGE + 1);
        assert_eq!(releases.last().unwrap().tag_name, "old");
        assert_eq!(executor.request_count(), 2);
    }

    #[test]
    fn releases_respect_page_limit() {
        let full_page: Vec<_> = (0..RELEASES_PER_PAGE)
            .map(|i| release_json(&format!("v{}", i)))
            .collect();
        let executor = MockExecutor::new().with_response(
            "https://api.test/repos/o/r/releases",
            MockExecutor::success_response(serde_json::Value::Array(full_page)),
        );

        let releases = client(&executor).releases("o/r", 1).unwrap();
        assert_eq!(releases.len(), RELEASES_PER_PAGE);
        assert_eq!(executor.request_count(), 1);
    }

    #[test]
    fn rate_headers_update_guard() {
        let executor = MockExecutor::new().with_response(
            "https://api.test/repos/o/r/contents",
            MockExecutor::rate_limited_response(serde_json::json!([]), 41, 1_800_000_000),
        );
        let client = client(&executor);

        client.contents("o/r").unwrap();
        let state = client.rate_guard().snapshot();
        assert_eq!(state.remaining, 41);
        assert_eq!(state.reset_at, 1_800_000_000);
    }

    #[test]
    fn exhausted_guard_skips_network() {
        let executor = MockExecutor::new();
        let client = client(&executor);
        client
            .rate_guard()
            .update(0, chrono::Utc::now().timestamp() + 3_600);

        let err = client.latest_release("o/r").unwrap_err();
        assert!(matches!(err, CoreError::RateLimited { .. }));
        assert_eq!(executor.request_count(), 0);
    }

    #[test]
    fn expired_guard_allows_network() {
        let executor = MockExecutor::new().with_response(
            "https://api.test/repos/o/r/releases/latest",
            MockExecutor::success_response(release_json("v1")),
        );
        let client = client(&executor);
        client
            .rate_guard()
            .update(0, chrono::Utc::now().timestamp() - 10);

        assert!(client.latest_release("o/r").is_ok());
        assert_eq!(executor.request_count(), 1);
    }

    #[test]
    fn api_base_with_path_keeps_prefix() {
        let executor = MockExecutor::new();
        let client =
            ReleaseClient::new(Arc::new(executor.clone()), "https://ghe.example.com/api/v3")
                .unwrap();
        let _ = client.contents("o/r");
        assert_eq!(
            executor.recorded_requests()[0].path,
            "https://ghe.example.com/api/v3/repos/o/r/contents"
        );
    }

    #[test]
    fn invalid_api_base_is_rejected() {
        let executor = MockExecutor::new();
        assert!(ReleaseClient::new(Arc::new(executor.clone()), "not a url").is_err());
        assert!(ReleaseClient::new(Arc::new(executor), "mailto:someone@example.com").is_err());
    }
}
