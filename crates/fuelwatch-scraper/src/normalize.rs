//! Retailer payload → [`CanonicalStation`] normalization.
//!
//! Each feed entry is coerced independently through an [`AliasTable`]. Entries
//! that cannot satisfy the canonical invariants are dropped and counted; they
//! never abort their siblings.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use fuelwatch_core::{CanonicalStation, Coordinates, FuelGrade, FuelPrices};

use crate::aliases::{aliases_for, AliasTable};
use crate::coerce::{first_f64, first_object, first_text, shape_of};
use crate::error::{FetchError, RecordRejection};

/// Stations recovered from one feed, plus the number of entries dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFeed {
    pub stations: Vec<CanonicalStation>,
    pub dropped: usize,
}

/// Normalize a retailer payload, absorbing structural anomalies.
///
/// A payload with no recognisable station list yields an empty sequence and a
/// warning.
#[must_use]
pub fn normalize_payload(payload: &Value, retailer: &str) -> Vec<CanonicalStation> {
    match normalize_feed(payload, retailer) {
        Ok(feed) => feed.stations,
        Err(e) => {
            tracing::warn!(retailer, error = %e, "structural anomaly in retailer payload");
            Vec::new()
        }
    }
}

/// Normalize a retailer payload using the retailer's alias table and the
/// current time as the fallback `last_updated`.
///
/// # Errors
///
/// Returns [`FetchError::StructuralAnomaly`] when the payload is neither an
/// array nor an object carrying a station array.
pub fn normalize_feed(payload: &Value, retailer: &str) -> Result<NormalizedFeed, FetchError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    normalize_feed_with(payload, retailer, aliases_for(retailer), &now)
}

/// Normalize a retailer payload with an explicit alias table and fallback
/// timestamp.
///
/// `fallback_updated` is used for entries that carry no `last_updated` when
/// the payload itself carries none either.
///
/// # Errors
///
/// Returns [`FetchError::StructuralAnomaly`] when the payload is neither an
/// array nor an object carrying a station array.
pub fn normalize_feed_with(
    payload: &Value,
    retailer: &str,
    aliases: &AliasTable,
    fallback_updated: &str,
) -> Result<NormalizedFeed, FetchError> {
    let entries = station_entries(payload, aliases).ok_or_else(|| FetchError::StructuralAnomaly {
        shape: shape_of(payload),
    })?;

    let feed_updated = first_text(payload, aliases.last_updated);
    let default_updated = feed_updated.as_deref().unwrap_or(fallback_updated);

    let mut feed = NormalizedFeed::default();
    for (index, entry) in entries.iter().enumerate() {
        match normalize_station(entry, retailer, aliases, default_updated) {
            Ok(station) => feed.stations.push(station),
            Err(reason) => {
                feed.dropped += 1;
                tracing::debug!(retailer, index, reason = %reason, "dropping station entry");
            }
        }
    }

    Ok(feed)
}

/// Coerce one feed entry into a [`CanonicalStation`].
///
/// # Errors
///
/// Returns a [`RecordRejection`] when the entry is not an object, lacks a
/// `site_id` or postcode, or its coordinates resolve to `(0, 0)`.
pub fn normalize_station(
    entry: &Value,
    retailer: &str,
    aliases: &AliasTable,
    default_updated: &str,
) -> Result<CanonicalStation, RecordRejection> {
    if !entry.is_object() {
        return Err(RecordRejection::NotAnObject);
    }

    let site_id = first_text(entry, aliases.site_id).ok_or(RecordRejection::MissingSiteId)?;
    let postcode = first_text(entry, aliases.postcode).ok_or(RecordRejection::MissingPostcode)?;

    let coordinates = coordinates_of(entry, aliases);
    if coordinates.is_origin() {
        return Err(RecordRejection::OriginCoordinates);
    }

    Ok(CanonicalStation {
        site_id,
        brand: first_text(entry, aliases.brand).unwrap_or_else(|| retailer.to_string()),
        name: first_text(entry, aliases.name),
        address: first_text(entry, aliases.address).unwrap_or_default(),
        postcode,
        coordinates,
        prices: prices_of(entry, aliases),
        last_updated: first_text(entry, aliases.last_updated)
            .unwrap_or_else(|| default_updated.to_string()),
    })
}

fn station_entries<'a>(payload: &'a Value, aliases: &AliasTable) -> Option<&'a Vec<Value>> {
    match payload {
        Value::Array(entries) => Some(entries),
        Value::Object(_) => aliases
            .station_list
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}

/// Missing or unparseable axes become `0`.
fn coordinates_of(entry: &Value, aliases: &AliasTable) -> Coordinates {
    let location = first_object(entry, aliases.location);
    let axis = |keys: &[&str]| {
        location
            .and_then(|loc| first_f64(loc, keys))
            .or_else(|| first_f64(entry, keys))
            .unwrap_or(0.0)
    };
    Coordinates::new(axis(aliases.longitude), axis(aliases.latitude))
}

fn prices_of(entry: &Value, aliases: &AliasTable) -> FuelPrices {
    let mut prices = FuelPrices::default();
    let Some(source) = first_object(entry, aliases.prices) else {
        return prices;
    };
    for grade in FuelGrade::ALL {
        prices.set(grade, first_f64(source, aliases.grade(grade)));
    }
    prices
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
