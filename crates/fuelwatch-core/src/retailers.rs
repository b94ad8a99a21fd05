use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::station::RetailerSource;
use crate::ConfigError;

/// Retailers publishing open fuel-price data under the CMA interim scheme.
const DEFAULT_RETAILERS: [(&str, &str); 15] = [
    ("APPLEGREEN", "https://applegreenstores.com/fuel-prices/data.json"),
    ("ASCONA", "https://fuelprices.asconagroup.co.uk/newfuel.json"),
    ("ASDA", "https://storelocator.asda.com/fuel_prices_data.json"),
    (
        "BP",
        "https://www.bp.com/en_gb/united-kingdom/home/fuelprices/fuel_prices_data.json",
    ),
    ("ESSO", "https://fuelprices.esso.co.uk/latestdata.json"),
    ("JET", "https://jetlocal.co.uk/fuel_prices_data.json"),
    ("KARAN", "https://api2.krlmedia.com/integration/live_price/krl"),
    ("MORRISONS", "https://www.morrisons.com/fuel-prices/fuel.json"),
    ("MOTO", "https://moto-way.com/fuel-price/fuel_prices.json"),
    ("MFG", "https://fuel.motorfuelgroup.com/fuel_prices_data.json"),
    (
        "RONTEC",
        "https://www.rontec-servicestations.co.uk/fuel-prices/data/fuel_prices_data.json",
    ),
    (
        "SAINSBURYS",
        "https://api.sainsburys.co.uk/v1/exports/latest/fuel_prices_data.json",
    ),
    (
        "SGN",
        "https://www.sgnretail.uk/files/data/SGN_daily_fuel_prices.json",
    ),
    ("SHELL", "https://www.shell.co.uk/fuel-prices-data.html"),
    ("TESCO", "https://www.tesco.com/fuel_prices/fuel_prices_data.json"),
];

/// The built-in retailer registry, in visitation order.
#[must_use]
pub fn default_retailers() -> Vec<RetailerSource> {
    DEFAULT_RETAILERS
        .iter()
        .map(|(name, url)| RetailerSource::new(name, url))
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct RetailersFile {
    pub retailers: Vec<RetailerSource>,
}

/// Load and validate a retailer registry override from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_retailers(path: &Path) -> Result<Vec<RetailerSource>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RetailersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: RetailersFile =
        serde_yaml::from_str(&content).map_err(ConfigError::RetailersFileParse)?;

    validate_retailers(&file.retailers)?;

    Ok(file.retailers)
}

/// Resolve the registry for this run: the override file when one is
/// configured, the built-in list otherwise.
///
/// # Errors
///
/// Propagates [`load_retailers`] errors for the override file.
pub fn resolve_retailers(path: Option<&Path>) -> Result<Vec<RetailerSource>, ConfigError> {
    match path {
        Some(path) => load_retailers(path),
        None => Ok(default_retailers()),
    }
}

pub(crate) fn validate_retailers(retailers: &[RetailerSource]) -> Result<(), ConfigError> {
    if retailers.is_empty() {
        return Err(ConfigError::Validation(
            "retailer registry must list at least one retailer".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for retailer in retailers {
        let name = retailer.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "retailer name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(name.to_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate retailer name: '{}'",
                retailer.name
            )));
        }

        if !is_http_url(&retailer.endpoint) {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' has invalid endpoint '{}'; expected an http(s) URL",
                retailer.name, retailer.endpoint
            )));
        }
    }

    Ok(())
}

fn is_http_url(endpoint: &str) -> bool {
    let rest = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"));
    let Some(rest) = rest else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty() && !host.chars().any(char::is_whitespace)
}

#[cfg(test)]
#[path = "retailers_test.rs"]
mod tests;
