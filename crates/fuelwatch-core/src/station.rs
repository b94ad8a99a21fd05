use serde::{Deserialize, Serialize};

/// A pump fuel grade as published by UK retailers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FuelGrade {
    /// Standard unleaded (up to 5% ethanol).
    E5,
    /// Unleaded with up to 10% ethanol.
    E10,
    /// Standard diesel.
    B7,
    /// Super / premium diesel.
    SDV,
}

impl FuelGrade {
    pub const ALL: [FuelGrade; 4] = [FuelGrade::E5, FuelGrade::E10, FuelGrade::B7, FuelGrade::SDV];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FuelGrade::E5 => "E5",
            FuelGrade::E10 => "E10",
            FuelGrade::B7 => "B7",
            FuelGrade::SDV => "SDV",
        }
    }
}

impl std::fmt::Display for FuelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-grade pump prices in pence per litre.
///
/// `None` means the retailer did not report that grade. It is never written
/// out as `0`: serialization skips absent grades entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelPrices {
    #[serde(rename = "E5", default, skip_serializing_if = "Option::is_none")]
    pub e5: Option<f64>,
    #[serde(rename = "E10", default, skip_serializing_if = "Option::is_none")]
    pub e10: Option<f64>,
    #[serde(rename = "B7", default, skip_serializing_if = "Option::is_none")]
    pub b7: Option<f64>,
    #[serde(rename = "SDV", default, skip_serializing_if = "Option::is_none")]
    pub sdv: Option<f64>,
}

impl FuelPrices {
    #[must_use]
    pub fn get(&self, grade: FuelGrade) -> Option<f64> {
        match grade {
            FuelGrade::E5 => self.e5,
            FuelGrade::E10 => self.e10,
            FuelGrade::B7 => self.b7,
            FuelGrade::SDV => self.sdv,
        }
    }

    pub fn set(&mut self, grade: FuelGrade, price: Option<f64>) {
        let slot = match grade {
            FuelGrade::E5 => &mut self.e5,
            FuelGrade::E10 => &mut self.e10,
            FuelGrade::B7 => &mut self.b7,
            FuelGrade::SDV => &mut self.sdv,
        };
        *slot = price;
    }

    /// Number of grades with a reported price.
    #[must_use]
    pub fn reported_count(&self) -> usize {
        FuelGrade::ALL
            .iter()
            .filter(|grade| self.get(**grade).is_some())
            .count()
    }
}

/// A WGS84 coordinate pair in `(longitude, latitude)` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// `(0, 0)` is how a feed's missing coordinates look after coercion.
    /// No UK forecourt sits on the equator, so the pair is treated as absent.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_origin(&self) -> bool {
        self.longitude == 0.0 && self.latitude == 0.0
    }

    /// Both components are finite and inside the WGS84 ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

/// A forecourt listing reconciled from any retailer feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalStation {
    /// Retailer-assigned site identifier; unique across the whole dataset.
    pub site_id: String,
    /// Forecourt brand; the retailer name when the feed omits it.
    pub brand: String,
    pub name: Option<String>,
    pub address: String,
    pub postcode: String,
    pub coordinates: Coordinates,
    pub prices: FuelPrices,
    /// Either ISO-8601 or `DD/MM/YYYY HH:mm:ss`, exactly as published.
    pub last_updated: String,
}

/// A retailer feed: display name plus the JSON endpoint it publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerSource {
    pub name: String,
    #[serde(rename = "url")]
    pub endpoint: String,
}

impl RetailerSource {
    #[must_use]
    pub fn new(name: &str, endpoint: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_pair_is_treated_as_missing() {
        assert!(Coordinates::new(0.0, 0.0).is_origin());
        assert!(!Coordinates::new(0.0001, 51.5).is_origin());
        assert!(
            !Coordinates::new(0.0, 51.4779).is_origin(),
            "Greenwich meridian is a real UK longitude"
        );
    }

    #[test]
    fn coordinates_outside_wgs84_are_invalid() {
        assert!(Coordinates::new(-0.1276, 51.5072).is_valid());
        assert!(!Coordinates::new(f64::NAN, 51.5).is_valid());
        assert!(!Coordinates::new(-0.12, f64::INFINITY).is_valid());
        assert!(!Coordinates::new(181.0, 51.5).is_valid());
        assert!(!Coordinates::new(-0.12, -90.5).is_valid());
    }

    #[test]
    fn absent_prices_are_not_serialized() {
        let mut prices = FuelPrices::default();
        prices.set(FuelGrade::E5, Some(145.9));
        let json = serde_json::to_value(prices).unwrap();
        assert_eq!(json, serde_json::json!({ "E5": 145.9 }));
    }

    #[test]
    fn get_and_set_address_the_same_grade() {
        let mut prices = FuelPrices::default();
        for (i, grade) in FuelGrade::ALL.into_iter().enumerate() {
            prices.set(grade, Some(f64::from(u32::try_from(i).unwrap()) + 140.0));
        }
        assert_eq!(prices.e5, Some(140.0));
        assert_eq!(prices.e10, Some(141.0));
        assert_eq!(prices.b7, Some(142.0));
        assert_eq!(prices.sdv, Some(143.0));
        assert_eq!(prices.reported_count(), 4);
    }

    #[test]
    fn retailer_source_reads_url_field() {
        let source: RetailerSource =
            serde_json::from_value(serde_json::json!({"name": "ASDA", "url": "https://a.test/x.json"}))
                .unwrap();
        assert_eq!(source.endpoint, "https://a.test/x.json");
    }
}
