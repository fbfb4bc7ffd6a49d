//! HTTP execution abstraction for testing.
//!
//! This module provides a trait for HTTP execution that can be mocked in tests,
//! avoiding the need for actual network calls.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::Error;
use crate::types::{HttpRequest, HttpResponse};

/// Trait for executing HTTP requests.
///
/// Implementations can use real HTTP clients or mock responses for testing.
/// Executors are shared across listing workers, hence `Send + Sync`.
pub trait HttpExecutor: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Non-success statuses are returned as responses, not errors; `Err`
    /// means the request never produced a response.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error>;
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create a new executor with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("releasefs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(Duration::from_secs(30))
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str())?;
            let header_value = HeaderValue::try_from(value.as_str())?;
            headers.insert(header_name, header_value);
        }

        let mut req_builder = self.client.get(&request.path).headers(headers);

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        let response = req_builder.send()?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut resp_headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                resp_headers.insert(name.to_string(), v.to_string());
            }
        }

        let body_text = response.text()?;
        let body = serde_json::from_str(&body_text).unwrap_or(serde_json::Value::Null);

        Ok(HttpResponse {
            status,
            status_text,
            headers: resp_headers,
            body,
            body_text: Some(body_text),
        })
    }
}

/// Mock HTTP executor for testing.
///
/// Returns predefined responses based on request matching.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A mock HTTP executor that returns predefined responses.
    ///
    /// Responses registered with a query string (`path?k=v&k2=v2`, keys
    /// sorted) win over responses registered for the bare path.
    #[derive(Clone, Default)]
    pub struct MockExecutor {
        /// Responses keyed by request path, optionally with query.
        responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
        /// Paths that fail with a transport error.
        failing: Arc<Mutex<HashMap<String, String>>>,
        /// Recorded requests for verification.
        recorded_requests: Arc<Mutex<Vec<HttpRequest>>>,
        /// Whether to fail all requests.
        fail_all: Arc<Mutex<Option<String>>>,
    }

    /// Matching key for a request: the path plus its sorted query.
    pub fn request_key(request: &HttpRequest) -> String {
        if request.query.is_empty() {
            return request.path.clone();
        }
        let mut pairs: Vec<_> = request
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        pairs.sort();
        format!("{}?{}", request.path, pairs.join("&"))
    }

    impl MockExecutor {
        /// Create a new mock executor.
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a response for a specific path (or `path?query`).
        pub fn with_response(self, path: impl Into<String>, response: HttpResponse) -> Self {
            self.set_response(path, response);
            self
        }

        /// Replace the response for a path after construction.
        pub fn set_response(&self, path: impl Into<String>, response: HttpResponse) {
            self.responses.lock().unwrap().insert(path.into(), response);
        }

        /// Fail requests to one path with a transport error.
        pub fn with_failure(self, path: impl Into<String>, message: impl Into<String>) -> Self {
            self.failing
                .lock()
                .unwrap()
                .insert(path.into(), message.into());
            self
        }

        /// Configure to fail all requests with an error.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.fail_all.lock().unwrap() = Some(message.into());
            self
        }

        /// Get all recorded requests.
        pub fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.recorded_requests.lock().unwrap().clone()
        }

        /// Number of requests seen so far.
        pub fn request_count(&self) -> usize {
            self.recorded_requests.lock().unwrap().len()
        }

        /// Clear recorded requests.
        pub fn clear_recorded(&self) {
            self.recorded_requests.lock().unwrap().clear();
        }

        /// Create a simple success response.
        pub fn success_response(body: serde_json::Value) -> HttpResponse {
            let body_text = body.to_string();
            HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                headers: HashMap::new(),
                body,
                body_text: Some(body_text),
            }
        }

        /// Create a success response carrying rate-limit headers.
        pub fn rate_limited_response(
            body: serde_json::Value,
            remaining: i64,
            reset_at: i64,
        ) -> HttpResponse {
            let mut response = Self::success_response(body);
            response
                .headers
                .insert("x-ratelimit-remaining".to_string(), remaining.to_string());
            response
                .headers
                .insert("x-ratelimit-reset".to_string(), reset_at.to_string());
            response
        }

        /// Create a simple error response.
        pub fn error_response(status: u16, message: &str) -> HttpResponse {
            HttpResponse {
                status,
                status_text: message.to_string(),
                headers: HashMap::new(),
                body: serde_json::json!({"message": message}),
                body_text: Some(format!(r#"{{"message":"{}"}}"#, message)),
            }
        }

        /// Create a 404 Not Found response.
        pub fn not_found() -> HttpResponse {
            Self::error_response(404, "Not Found")
        }
    }

    impl HttpExecutor for MockExecutor {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
            self.recorded_requests.lock().unwrap().push(request.clone());

            if let Some(message) = self.fail_all.lock().unwrap().clone() {
                return Err(Error::Transport { message });
            }

            if let Some(message) = self.failing.lock().unwrap().get(&request.path) {
                return Err(Error::Transport {
                    message: message.clone(),
                });
            }

            let responses = self.responses.lock().unwrap();
            if let Some(response) = responses.get(&request_key(request)) {
                return Ok(response.clone());
            }
            if let Some(response) = responses.get(&request.path) {
                return Ok(response.clone());
            }

            Ok(Self::not_found())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{request_key, MockExecutor};
    use super::*;

    #[test]
    fn mock_executor_returns_configured_response() {
        let executor = MockExecutor::new().with_response(
            "https://api.test/a",
            MockExecutor::success_response(serde_json::json!({"result": "success"})),
        );

        let result = executor
            .execute(&HttpRequest::get("https://api.test/a"))
            .unwrap();

        assert_eq!(result.status, 200);
        assert_eq!(result.body, serde_json::json!({"result": "success"}));
    }

    #[test]
    fn mock_executor_returns_404_when_no_match() {
        let executor = MockExecutor::new();
        let result = executor.execute(&HttpRequest::get("/unknown")).unwrap();

        assert_eq!(result.status, 404);
    }

    #[test]
    fn mock_executor_fails_when_configured() {
        let executor = MockExecutor::new().fail_with("Network error");
        let result = executor.execute(&HttpRequest::get("/any"));

        assert!(matches!(result, Err(Error::Transport { message }) if message == "Network error"));
    }

    #[test]
    fn mock_executor_fails_single_path() {
        let executor = MockExecutor::new()
            .with_response("/ok", MockExecutor::success_response(serde_json::Value::Null))
            .with_failure("/broken", "reset by peer");

        assert!(executor.execute(&HttpRequest::get("/ok")).is_ok());
        assert!(executor.execute(&HttpRequest::get("/broken")).is_err());
    }

    #[test]
    fn mock_executor_prefers_query_match() {
        let executor = MockExecutor::new()
            .with_response("/r", MockExecutor::success_response(serde_json::json!(1)))
            .with_response(
                "/r?page=2&per_page=100",
                MockExecutor::success_response(serde_json::json!(2)),
            );

        let page_two = HttpRequest::get("/r")
            .with_query("per_page", "100")
            .with_query("page", "2");
        let page_one = HttpRequest::get("/r").with_query("page", "1");

        assert_eq!(executor.execute(&page_two).unwrap().body, serde_json::json!(2));
        assert_eq!(executor.execute(&page_one).unwrap().body, serde_json::json!(1));
    }

    #[test]
    fn request_key_sorts_query() {
        let request = HttpRequest::get("/r")
            .with_query("b", "2")
            .with_query("a", "1");
        assert_eq!(request_key(&request), "/r?a=1&b=2");
    }

    #[test]
    fn mock_executor_records_requests() {
        let executor = MockExecutor::new();

        executor.execute(&HttpRequest::get("/first")).unwrap();
        executor
            .execute(&HttpRequest::get("/second").with_header("Authorization", "Bearer t"))
            .unwrap();

        let recorded = executor.recorded_requests();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].path, "/first");
        assert_eq!(
            recorded[1].headers.get("Authorization"),
            Some(&"Bearer t".to_string())
        );

        executor.clear_recorded();
        assert_eq!(executor.request_count(), 0);
    }

    #[test]
    fn rate_limited_response_helper_sets_headers() {
        let response = MockExecutor::rate_limited_response(serde_json::Value::Null, 0, 42);
        assert_eq!(response.header_i64("X-RateLimit-Remaining"), Some(0));
        assert_eq!(response.header_i64("X-RateLimit-Reset"), Some(42));
    }

    #[test]
    fn reqwest_executor_creation() {
        assert!(ReqwestExecutor::with_default_timeout().is_ok());
        assert!(ReqwestExecutor::new(Duration::from_secs(10)).is_ok());
    }
}
