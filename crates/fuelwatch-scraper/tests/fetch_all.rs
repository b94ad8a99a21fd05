//! Integration tests for `fetch_all` over a mixed set of healthy and broken
//! retailer feeds served by `wiremock`.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fuelwatch_core::{dedupe_stations, RetailerSource};
use fuelwatch_scraper::{fetch_all, FetchError, RetailerClient};

fn test_client() -> RetailerClient {
    RetailerClient::new(5, "fuelwatch-test/0.1").expect("failed to build test RetailerClient")
}

fn station(site_id: &str, e5: f64) -> Value {
    json!({
        "site_id": site_id,
        "brand": "TESTCO",
        "address": "1 Forecourt Way",
        "postcode": "LS1 1AA",
        "location": { "longitude": -1.55, "latitude": 53.8 },
        "prices": { "E5": e5 }
    })
}

async fn mount_json(server: &MockServer, feed_path: &str, body: Value, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(feed_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
        .mount(server)
        .await;
}

#[tokio::test]
async fn failing_sources_do_not_block_healthy_ones() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shell"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>store finder</html>", "text/html"))
        .mount(&server)
        .await;

    let mut entries: Vec<Value> = (0..10).map(|i| station(&format!("gb-{i}"), 140.0)).collect();
    entries.push(json!({ "postcode": "LS1 1AA", "location": { "longitude": -1.5, "latitude": 53.8 } }));
    entries.push(json!({ "brand": "TESTCO", "postcode": "LS2 2BB" }));
    mount_json(&server, "/good", json!({ "stations": entries }), Duration::ZERO).await;

    let sources = vec![
        RetailerSource::new("DOWN", &format!("{}/down", server.uri())),
        RetailerSource::new("SHELL", &format!("{}/shell", server.uri())),
        RetailerSource::new("GOOD", &format!("{}/good", server.uri())),
    ];

    let result = fetch_all(&test_client(), &sources, 1).await;

    assert_eq!(result.stations.len(), 10);
    assert_eq!(result.failures.len(), 2);
    assert_eq!(result.failures[0].retailer, "DOWN");
    assert!(matches!(
        result.failures[0].cause,
        FetchError::UnexpectedStatus { status: 500, .. }
    ));
    assert_eq!(result.failures[1].retailer, "SHELL");
    assert!(matches!(
        result.failures[1].cause,
        FetchError::UnsupportedFormat { .. }
    ));

    assert_eq!(result.outcomes.len(), 1);
    assert_eq!(result.outcomes[0].retailer, "GOOD");
    assert_eq!(result.outcomes[0].stations, 10);
    assert_eq!(result.outcomes[0].dropped, 2);
}

#[tokio::test]
async fn structural_anomaly_is_recorded_per_source() {
    let server = MockServer::start().await;
    mount_json(&server, "/odd", json!({ "data": { "sites": [] } }), Duration::ZERO).await;

    let sources = vec![RetailerSource::new("ODD", &format!("{}/odd", server.uri()))];
    let result = fetch_all(&test_client(), &sources, 1).await;

    assert!(result.stations.is_empty());
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].cause.kind(), "structural_anomaly");
}

#[tokio::test]
async fn concurrent_fetch_preserves_registry_order() {
    let server = MockServer::start().await;
    // The first source answers last, so completion order differs from registry order.
    mount_json(
        &server,
        "/first",
        json!([station("gb-shared", 139.9), station("gb-a", 141.0)]),
        Duration::from_millis(300),
    )
    .await;
    mount_json(
        &server,
        "/second",
        json!([station("gb-shared", 145.9)]),
        Duration::ZERO,
    )
    .await;

    let sources = vec![
        RetailerSource::new("FIRST", &format!("{}/first", server.uri())),
        RetailerSource::new("SECOND", &format!("{}/second", server.uri())),
    ];
    let result = fetch_all(&test_client(), &sources, 2).await;

    let ids: Vec<&str> = result.stations.iter().map(|s| s.site_id.as_str()).collect();
    assert_eq!(ids, vec!["gb-shared", "gb-a", "gb-shared"]);

    let unique = dedupe_stations(result.stations);
    assert_eq!(unique["gb-shared"].prices.e5, Some(145.9));
}

#[tokio::test]
async fn stations_without_timestamps_share_the_fetch_time() {
    let server = MockServer::start().await;
    mount_json(&server, "/feed", json!([station("gb-1", 140.0), station("gb-2", 141.0)]), Duration::ZERO).await;

    let sources = vec![RetailerSource::new("TESTCO", &format!("{}/feed", server.uri()))];
    let result = fetch_all(&test_client(), &sources, 0).await;

    let expected = result
        .fetched_at
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    assert!(result.stations.iter().all(|s| s.last_updated == expected));
}
