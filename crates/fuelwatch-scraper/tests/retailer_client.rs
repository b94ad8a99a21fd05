//! Integration tests for `RetailerClient::fetch`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the happy path and every failure
//! classification the client can return.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fuelwatch_core::RetailerSource;
use fuelwatch_scraper::{FetchError, RetailerClient};

/// Builds a `RetailerClient` suitable for tests: 5-second timeout, descriptive UA.
fn test_client() -> RetailerClient {
    RetailerClient::new(5, "fuelwatch-test/0.1").expect("failed to build test RetailerClient")
}

fn source_for(server: &MockServer, feed_path: &str) -> RetailerSource {
    RetailerSource::new("TESTCO", &format!("{}{feed_path}", server.uri()))
}

#[tokio::test]
async fn fetch_returns_parsed_json_payload() {
    let server = MockServer::start().await;
    let payload = json!({ "last_updated": "23/02/2025 11:51:52", "stations": [] });

    Mock::given(method("GET"))
        .and(path("/fuel_prices_data.json"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "fuelwatch-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .expect(1)
        .mount(&server)
        .await;

    let value = test_client()
        .fetch(&source_for(&server, "/fuel_prices_data.json"))
        .await
        .expect("fetch should succeed");

    assert_eq!(value, payload);
}

#[tokio::test]
async fn fetch_parses_json_served_as_plain_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"site_id":"gb-1"}]"#))
        .mount(&server)
        .await;

    let value = test_client()
        .fetch(&source_for(&server, "/feed"))
        .await
        .expect("plain-text JSON should parse");

    assert_eq!(value, json!([{ "site_id": "gb-1" }]));
}

#[tokio::test]
async fn fetch_maps_server_error_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let failure = test_client()
        .fetch(&source_for(&server, "/feed"))
        .await
        .expect_err("500 should fail");

    assert_eq!(failure.retailer, "TESTCO");
    assert!(
        matches!(failure.cause, FetchError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {:?}",
        failure.cause
    );
    assert_eq!(failure.cause.kind(), "transport");
}

#[tokio::test]
async fn fetch_rejects_html_content_type_as_unsupported_format() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<!DOCTYPE html><html><body>Find a station</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let failure = test_client()
        .fetch(&source_for(&server, "/feed"))
        .await
        .expect_err("HTML should be rejected");

    assert!(
        matches!(failure.cause, FetchError::UnsupportedFormat { ref content_type } if content_type == "text/html"),
        "expected UnsupportedFormat(text/html), got: {:?}",
        failure.cause
    );
}

#[tokio::test]
async fn fetch_sniffs_markup_behind_generic_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  <html><body>maintenance</body></html>"))
        .mount(&server)
        .await;

    let failure = test_client()
        .fetch(&source_for(&server, "/feed"))
        .await
        .expect_err("markup body should be rejected");

    assert!(
        matches!(failure.cause, FetchError::UnsupportedFormat { .. }),
        "expected UnsupportedFormat, got: {:?}",
        failure.cause
    );
}

#[tokio::test]
async fn fetch_reports_invalid_json_as_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"stations\": [", "application/json"))
        .mount(&server)
        .await;

    let failure = test_client()
        .fetch(&source_for(&server, "/feed"))
        .await
        .expect_err("truncated JSON should fail");

    assert!(
        matches!(failure.cause, FetchError::Deserialize { .. }),
        "expected Deserialize, got: {:?}",
        failure.cause
    );
}

#[tokio::test]
async fn fetch_rejects_malformed_endpoint_without_network() {
    let source = RetailerSource::new("BROKEN", "not a url");

    let failure = test_client()
        .fetch(&source)
        .await
        .expect_err("malformed endpoint should fail");

    assert_eq!(failure.endpoint, "not a url");
    assert!(
        matches!(failure.cause, FetchError::InvalidEndpoint { .. }),
        "expected InvalidEndpoint, got: {:?}",
        failure.cause
    );
}

#[tokio::test]
async fn fetch_times_out_as_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = RetailerClient::new(1, "fuelwatch-test/0.1").expect("client");
    let failure = client
        .fetch(&source_for(&server, "/slow"))
        .await
        .expect_err("slow response should time out");

    match failure.cause {
        FetchError::Transport(ref err) => assert!(err.is_timeout(), "expected timeout, got: {err}"),
        ref other => panic!("expected Transport, got: {other:?}"),
    }
}
