//! Store-facing formatting of canonical stations.
//!
//! Converts coordinates into the PostGIS EWKT point and the GeoJSON-style
//! object served to clients, and rewrites `DD/MM/YYYY HH:mm:ss` timestamps to
//! `YYYY-MM-DD HH:mm:ss`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use fuelwatch_core::{CanonicalStation, Coordinates, FuelGrade, FuelPrices};

/// WGS84.
pub const SRID: u32 = 4326;

static DMY_TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4}) ([0-9]{2}:[0-9]{2}:[0-9]{2})$").expect("valid regex")
});

/// A canonical station in the shape persisted to the `stations` table.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub site_id: String,
    pub brand: String,
    pub name: Option<String>,
    pub address: String,
    pub postcode: String,
    /// `SRID=4326;POINT(lon lat)`, or `None` when the coordinates are unusable.
    pub geom: Option<String>,
    /// `{"type":"Point","coordinates":[lon, lat]}`, `None` alongside `geom`.
    pub location_json: Option<Value>,
    /// Only the grades the station reported.
    pub current_prices: Value,
    pub last_updated: String,
}

/// Format one station for persistence.
///
/// Never drops the station: unusable coordinates yield a record with null
/// geometry and a warning.
#[must_use]
pub fn format_station(station: &CanonicalStation) -> StationRecord {
    let geom = point_ewkt(station.coordinates);
    if geom.is_none() {
        tracing::warn!(
            site_id = %station.site_id,
            longitude = station.coordinates.longitude,
            latitude = station.coordinates.latitude,
            "coordinates out of range; storing station without geometry"
        );
    }

    StationRecord {
        site_id: station.site_id.clone(),
        brand: station.brand.clone(),
        name: station.name.clone(),
        address: station.address.clone(),
        postcode: station.postcode.clone(),
        geom,
        location_json: location_json(station.coordinates),
        current_prices: prices_json(&station.prices),
        last_updated: reformat_dmy_timestamp(&station.last_updated),
    }
}

/// EWKT point for `coordinates`, longitude first.
#[must_use]
pub fn point_ewkt(coordinates: Coordinates) -> Option<String> {
    coordinates.is_valid().then(|| {
        format!(
            "SRID={SRID};POINT({} {})",
            coordinates.longitude, coordinates.latitude
        )
    })
}

/// Client-facing point object, `[longitude, latitude]` order.
#[must_use]
pub fn location_json(coordinates: Coordinates) -> Option<Value> {
    coordinates.is_valid().then(|| {
        json!({
            "type": "Point",
            "coordinates": [coordinates.longitude, coordinates.latitude],
        })
    })
}

/// Rewrite `DD/MM/YYYY HH:mm:ss` to `YYYY-MM-DD HH:mm:ss`; return any other
/// input unchanged.
#[must_use]
pub fn reformat_dmy_timestamp(raw: &str) -> String {
    DMY_TIMESTAMP_RE.replace(raw, "$3-$2-$1 $4").into_owned()
}

fn prices_json(prices: &FuelPrices) -> Value {
    let mut object = Map::new();
    for grade in FuelGrade::ALL {
        if let Some(price) = prices.get(grade) {
            object.insert(grade.as_str().to_string(), json!(price));
        }
    }
    Value::Object(object)
}
