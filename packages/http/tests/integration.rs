use std::sync::Arc;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use releasefs_core::Error as CoreError;
use releasefs_http::{ReleaseClient, ReqwestExecutor};

fn release_json(tag: &str, sizes: &[u64]) -> serde_json::Value {
    let assets: Vec<_> = sizes
        .iter()
        .enumerate()
        .map(|(i, size)| {
            serde_json::json!({
                "name": format!("asset-{}.bin", i),
                "size": size,
                "created_at": "2025-03-01T10:00:00Z",
                "updated_at": "2025-03-01T11:00:00Z",
                "browser_download_url": format!("https://github.com/o/r/releases/download/{}/asset-{}.bin", tag, i)
            })
        })
        .collect();
    serde_json::json!({
        "tag_name": tag,
        "html_url": format!("https://github.com/o/r/releases/tag/{}", tag),
        "created_at": "2025-03-01T09:00:00Z",
        "published_at": "2025-03-01T12:00:00Z",
        "assets": assets
    })
}

fn client_for(uri: &str, token: &str) -> ReleaseClient {
    let executor = Arc::new(ReqwestExecutor::with_default_timeout().unwrap());
    ReleaseClient::new(executor, uri).unwrap().with_token(token)
}

#[tokio::test]
async fn test_latest_release_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/releases/latest"))
        .and(header("Accept", "application/vnd.github+json"))
        .and(header("Authorization", "Bearer token123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(release_json("v2.0.0", &[100, 200]))
                .insert_header("X-RateLimit-Remaining", "4999")
                .insert_header("X-RateLimit-Reset", "1800000000"),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let (release, state) = tokio::task::spawn_blocking(move || {
        let client = client_for(&uri, "token123");
        let release = client.latest_release("o/r").unwrap();
        (release, client.rate_guard().snapshot())
    })
    .await
    .unwrap();

    assert_eq!(release.tag_name, "v2.0.0");
    assert_eq!(release.total_size(), 300);
    assert_eq!(state.remaining, 4999);
    assert_eq!(state.reset_at, 1_800_000_000);
}

#[tokio::test]
async fn test_releases_paged_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/releases"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            release_json("v2", &[5]),
            release_json("v1", &[7])
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let releases = tokio::task::spawn_blocking(move || {
        client_for(&uri, "").releases("o/r", 3).unwrap()
    })
    .await
    .unwrap();

    let tags: Vec<_> = releases.iter().map(|r| r.tag_name.as_str()).collect();
    assert_eq!(tags, vec!["v2", "v1"]);
}

#[tokio::test]
async fn test_error_status_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/gone/releases/latest"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found"
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        client_for(&uri, "").latest_release("o/gone").unwrap_err()
    })
    .await
    .unwrap();

    match err {
        CoreError::RemoteFetchFailed {
            status, message, ..
        } => {
            assert_eq!(status, Some(404));
            assert!(message.contains("Not Found"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_exhausted_budget_blocks_next_request() {
    let server = MockServer::start().await;
    let reset_at = chrono::Utc::now().timestamp() + 3_600;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/contents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .insert_header("X-RateLimit-Remaining", "0")
                .insert_header("X-RateLimit-Reset", reset_at.to_string().as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let second = tokio::task::spawn_blocking(move || {
        let client = client_for(&uri, "");
        client.contents("o/r").unwrap();
        client.contents("o/r")
    })
    .await
    .unwrap();

    assert_eq!(second.unwrap_err(), CoreError::RateLimited { reset_at });
}
