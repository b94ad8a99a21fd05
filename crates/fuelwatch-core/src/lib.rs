pub mod app_config;
pub mod averages;
pub mod config;
pub mod dedupe;
pub mod retailers;
pub mod station;

pub use app_config::AppConfig;
pub use averages::{compute_national_averages, compute_national_averages_on, NationalAverages};
pub use config::{load_app_config, load_app_config_from_env};
pub use dedupe::dedupe_stations;
pub use retailers::{default_retailers, load_retailers, resolve_retailers, RetailersFile};
pub use station::{CanonicalStation, Coordinates, FuelGrade, FuelPrices, RetailerSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read retailers file {path}: {source}")]
    RetailersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse retailers file: {0}")]
    RetailersFileParse(#[source] serde_yaml::Error),

    #[error("retailer registry validation failed: {0}")]
    Validation(String),
}
