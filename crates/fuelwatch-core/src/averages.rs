//! National per-grade price averages.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::station::{CanonicalStation, FuelGrade};

/// One day's national averages, keyed by `date` in the store.
///
/// An average is `None` when no station reported a positive price for that
/// grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalAverages {
    pub date: NaiveDate,
    /// E5.
    pub unleaded_avg: Option<f64>,
    pub e10_avg: Option<f64>,
    /// B7.
    pub diesel_avg: Option<f64>,
    /// SDV.
    pub premium_avg: Option<f64>,
}

impl NationalAverages {
    #[must_use]
    pub fn get(&self, grade: FuelGrade) -> Option<f64> {
        match grade {
            FuelGrade::E5 => self.unleaded_avg,
            FuelGrade::E10 => self.e10_avg,
            FuelGrade::B7 => self.diesel_avg,
            FuelGrade::SDV => self.premium_avg,
        }
    }
}

/// Compute today's (UTC) national averages over `stations`.
#[must_use]
pub fn compute_national_averages<'a, I>(stations: I) -> NationalAverages
where
    I: IntoIterator<Item = &'a CanonicalStation>,
{
    compute_national_averages_on(stations, Utc::now().date_naive())
}

/// Compute national averages over `stations`, stamped with `date`.
///
/// Only present, strictly positive prices contribute. Each mean is rounded to
/// one decimal place, half away from zero.
#[must_use]
pub fn compute_national_averages_on<'a, I>(stations: I, date: NaiveDate) -> NationalAverages
where
    I: IntoIterator<Item = &'a CanonicalStation>,
{
    let mut sums = [0.0_f64; 4];
    let mut counts = [0_u32; 4];

    for station in stations {
        for (idx, grade) in FuelGrade::ALL.into_iter().enumerate() {
            if let Some(price) = station.prices.get(grade) {
                if price.is_finite() && price > 0.0 {
                    sums[idx] += price;
                    counts[idx] += 1;
                }
            }
        }
    }

    let average = |idx: usize| -> Option<f64> {
        (counts[idx] > 0).then(|| round_to_one_decimal(sums[idx] / f64::from(counts[idx])))
    };

    NationalAverages {
        date,
        unleaded_avg: average(0),
        e10_avg: average(1),
        diesel_avg: average(2),
        premium_avg: average(3),
    }
}

/// `f64::round` rounds half away from zero.
fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::{Coordinates, FuelPrices};

    fn station_with(e5: Option<f64>, b7: Option<f64>) -> CanonicalStation {
        CanonicalStation {
            site_id: "gb-1".to_string(),
            brand: "JET".to_string(),
            name: None,
            address: String::new(),
            postcode: "YO1 7HH".to_string(),
            coordinates: Coordinates::new(-1.08, 53.96),
            prices: FuelPrices {
                e5,
                e10: None,
                b7,
                sdv: None,
            },
            last_updated: "2025-02-23 11:51:52".to_string(),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 23).unwrap()
    }

    #[test]
    fn absent_prices_do_not_contribute() {
        let stations = vec![
            station_with(Some(140.0), None),
            station_with(Some(142.0), None),
            station_with(None, None),
        ];
        let avg = compute_national_averages_on(&stations, day());
        assert_eq!(avg.unleaded_avg, Some(141.0));
    }

    #[test]
    fn unreported_grade_is_null_not_zero() {
        let stations = vec![station_with(Some(140.0), Some(150.0))];
        let avg = compute_national_averages_on(&stations, day());
        assert_eq!(avg.premium_avg, None);
        assert_eq!(avg.e10_avg, None);
        assert_eq!(avg.diesel_avg, Some(150.0));
    }

    #[test]
    fn non_positive_prices_are_excluded() {
        let stations = vec![
            station_with(Some(0.0), Some(-1.0)),
            station_with(Some(139.9), None),
        ];
        let avg = compute_national_averages_on(&stations, day());
        assert_eq!(avg.unleaded_avg, Some(139.9));
        assert_eq!(avg.diesel_avg, None);
    }

    #[test]
    fn mean_rounds_half_away_from_zero() {
        // 140.25 is exactly representable, so this exercises the tie rule.
        let stations = vec![
            station_with(Some(140.0), None),
            station_with(Some(140.5), None),
        ];
        let avg = compute_national_averages_on(&stations, day());
        assert_eq!(avg.unleaded_avg, Some(140.3));
    }

    #[test]
    fn empty_input_yields_all_nulls_with_date() {
        let avg = compute_national_averages_on(std::iter::empty::<&CanonicalStation>(), day());
        assert_eq!(avg.date, day());
        for grade in FuelGrade::ALL {
            assert_eq!(avg.get(grade), None, "{grade} should be null");
        }
    }
}
