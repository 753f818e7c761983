//! Integration tests for UvProvider using wiremock.
//!
//! These tests verify the UV client against a mock HTTP server.

use std::time::Duration;

use sunsafe_uv::{UvError, UvProvider};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create an API payload
fn uv_payload(now_uvi: f64) -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "latitude": 40.0,
        "longitude": -73.0,
        "now": {"time": "2025-06-01T16:00:00Z", "uvi": now_uvi},
        "forecast": [
            {"time": "2025-06-01T17:00:00Z", "uvi": 6.4},
            {"time": "2025-06-01T18:00:00Z", "uvi": 5.1}
        ],
        "history": [
            {"time": "2025-06-01T15:00:00Z", "uvi": 6.9}
        ]
    })
}

fn provider(server: &MockServer) -> UvProvider {
    UvProvider::new(&server.uri(), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uvi"))
        .and(query_param("latitude", "40.0"))
        .and(query_param("longitude", "-73.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(uv_payload(7.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let data = provider(&mock_server).fetch("40.0", "-73.0").await.unwrap();

    assert_eq!(data.now.uvi, 7.0);
    assert_eq!(data.history.len(), 1);
    assert_eq!(data.forecast.len(), 2);
    assert_eq!(data.points().len(), 4);
}

#[tokio::test]
async fn test_fetch_server_error_is_network_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uvi"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch("40.0", "-73.0").await.unwrap_err();

    assert!(matches!(err, UvError::Status { status: 503 }));
    assert!(err.is_network());
}

#[tokio::test]
async fn test_fetch_not_found_is_network_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uvi"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch("40.0", "-73.0").await.unwrap_err();
    assert!(matches!(err, UvError::Status { status: 404 }));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uvi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch("40.0", "-73.0").await.unwrap_err();
    assert!(matches!(err, UvError::Parse(_)));
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_fetch_missing_now_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uvi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"forecast": []})),
        )
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch("40.0", "-73.0").await.unwrap_err();
    assert!(matches!(err, UvError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_negative_uvi_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uvi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(uv_payload(-2.0)))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server).fetch("40.0", "-73.0").await.unwrap_err();
    assert!(matches!(err, UvError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uvi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(uv_payload(7.0))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let provider = UvProvider::new(&mock_server.uri(), Duration::from_millis(200)).unwrap();
    let err = provider.fetch("40.0", "-73.0").await.unwrap_err();

    match err {
        UvError::Network(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_cancelled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uvi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(uv_payload(7.0))
                .set_delay(Duration::from_secs(1)),
        )
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = provider
        .fetch_cancellable("40.0", "-73.0", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, UvError::Cancelled));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Nothing listens on the discard port
    let provider = UvProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = provider.fetch("40.0", "-73.0").await.unwrap_err();
    assert!(matches!(err, UvError::Network(_)));
}
