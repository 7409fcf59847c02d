use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Outbound geocoding settings shared by both providers.
#[derive(Clone)]
pub struct GeocoderConfig {
    pub nominatim_base_url: String,
    pub nominatim_email: Option<String>,
    pub photon_base_url: String,
    pub user_agent: String,
    pub referer: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("nominatim_base_url", &self.nominatim_base_url)
            .field(
                "nominatim_email",
                &self.nominatim_email.as_ref().map(|_| "[redacted]"),
            )
            .field("photon_base_url", &self.photon_base_url)
            .field("user_agent", &self.user_agent)
            .field("referer", &self.referer)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub cities_path: Option<PathBuf>,
    pub rate_limit_per_minute: usize,
    pub geocoder: GeocoderConfig,
}
