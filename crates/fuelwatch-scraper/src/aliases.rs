//! Field-name alias tables for retailer feeds.
//!
//! Retailers publish the same fields under different names. Each canonical
//! field maps to an ordered list of candidate keys; the first key whose value
//! coerces to the expected type wins.

use fuelwatch_core::FuelGrade;

/// Candidate source keys for every canonical station field.
#[derive(Debug, Clone, Copy)]
pub struct AliasTable {
    pub site_id: &'static [&'static str],
    pub brand: &'static [&'static str],
    pub name: &'static [&'static str],
    pub address: &'static [&'static str],
    pub postcode: &'static [&'static str],
    pub last_updated: &'static [&'static str],
    /// Keys of the nested object holding coordinates. When none is present
    /// the coordinates are read from the entry itself.
    pub location: &'static [&'static str],
    pub longitude: &'static [&'static str],
    pub latitude: &'static [&'static str],
    /// Keys of the nested object holding per-grade prices.
    pub prices: &'static [&'static str],
    pub e5: &'static [&'static str],
    pub e10: &'static [&'static str],
    pub b7: &'static [&'static str],
    pub sdv: &'static [&'static str],
    /// Keys that may hold the station list when the payload is an object.
    pub station_list: &'static [&'static str],
}

impl AliasTable {
    #[must_use]
    pub fn grade(&self, grade: FuelGrade) -> &'static [&'static str] {
        match grade {
            FuelGrade::E5 => self.e5,
            FuelGrade::E10 => self.e10,
            FuelGrade::B7 => self.b7,
            FuelGrade::SDV => self.sdv,
        }
    }
}

/// Aliases covering every feed published under the open-data price scheme.
pub static STANDARD_ALIASES: AliasTable = AliasTable {
    site_id: &["site_id", "id"],
    brand: &["brand", "retailerName"],
    name: &["name"],
    address: &["address", "street_address"],
    postcode: &["postcode", "post_code"],
    last_updated: &["last_updated"],
    location: &["location"],
    longitude: &["longitude", "lng"],
    latitude: &["latitude", "lat"],
    prices: &["prices", "fuel_prices"],
    e5: &["E5", "UNLEADED", "unleaded"],
    e10: &["E10", "e10"],
    b7: &["B7", "DIESEL", "diesel"],
    sdv: &["SDV", "PREMIUM", "premium"],
    station_list: &["stations"],
};

/// Retailers whose feeds deviate from [`STANDARD_ALIASES`]. Every feed in the
/// built-in registry currently conforms.
static RETAILER_ALIASES: &[(&str, &AliasTable)] = &[];

/// The alias table used for `retailer`'s feed.
#[must_use]
pub fn aliases_for(retailer: &str) -> &'static AliasTable {
    RETAILER_ALIASES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(retailer))
        .map_or(&STANDARD_ALIASES, |(_, table)| *table)
}
