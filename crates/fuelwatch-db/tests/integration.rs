//! Offline tests for fuelwatch-db pool configuration and record formatting.
//! These tests do not require a live database connection.

use fuelwatch_core::{AppConfig, CanonicalStation, Coordinates, FuelPrices};
use fuelwatch_db::{format_station, DbError, PoolConfig};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: None,
        log_level: "info".to_string(),
        retailers_path: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        fetch_timeout_secs: 10,
        user_agent: "ua".to_string(),
        max_concurrent_retailers: 1,
        station_batch_size: 100,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn connect_without_database_url_is_a_typed_error() {
    let result = fuelwatch_db::connect_pool_from_config(&app_config()).await;
    assert!(
        matches!(result, Err(DbError::MissingDatabaseUrl)),
        "expected MissingDatabaseUrl, got: {result:?}"
    );
}

#[test]
fn formatted_record_matches_stations_columns() {
    let station = CanonicalStation {
        site_id: "gb-42".to_string(),
        brand: "ESSO".to_string(),
        name: None,
        address: "Wetherby Road".to_string(),
        postcode: "HG2 7SA".to_string(),
        coordinates: Coordinates::new(-1.513, 53.992),
        prices: FuelPrices {
            e5: None,
            e10: Some(136.9),
            b7: None,
            sdv: Some(162.9),
        },
        last_updated: "2025-02-23T09:30:00.000Z".to_string(),
    };

    let record = format_station(&station);
    assert_eq!(record.geom.as_deref(), Some("SRID=4326;POINT(-1.513 53.992)"));
    assert_eq!(
        record.current_prices,
        serde_json::json!({ "E10": 136.9, "SDV": 162.9 })
    );
    assert_eq!(record.last_updated, "2025-02-23T09:30:00.000Z");
}
