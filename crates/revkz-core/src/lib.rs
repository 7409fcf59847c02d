//! Shared configuration and Kazakhstan reference data for the `revkz` workspace.

pub mod app_config;
pub mod cities;
pub mod config;
pub mod phone;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, GeocoderConfig};
pub use cities::{load_cities, normalize_city, CityWhitelist, KZ_CITIES};
pub use config::{load_app_config, load_app_config_from_env};
pub use phone::{normalize_kz_phone, PhoneError, KZ_MOBILE_CODES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read cities file {path}: {source}")]
    CitiesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cities file: {0}")]
    CitiesFileParse(#[source] serde_yaml::Error),

    #[error("cities file validation failed: {0}")]
    Validation(String),
}
