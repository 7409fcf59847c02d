use crate::app_config::{AppConfig, Environment, GeocoderConfig};
use crate::ConfigError;

const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_PHOTON_BASE_URL: &str = "https://photon.komoot.io/api/";
const DEFAULT_USER_AGENT: &str = "review-kz/1.0 (contact: NOMINATIM_EMAIL not set)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("REVKZ_ENV", "development"));
    let bind_addr = parse_addr("REVKZ_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("REVKZ_LOG_LEVEL", "info");
    let cities_path = optional("REVKZ_CITIES_PATH").map(PathBuf::from);
    let rate_limit_per_minute = parse_usize("REVKZ_RATE_LIMIT_PER_MINUTE", "30")?;

    let timeout_secs = parse_u64("REVKZ_GEOCODER_TIMEOUT_SECS", "6")?;
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REVKZ_GEOCODER_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let geocoder = GeocoderConfig {
        nominatim_base_url: optional("NOMINATIM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_NOMINATIM_BASE_URL.to_string()),
        nominatim_email: optional("NOMINATIM_EMAIL"),
        photon_base_url: optional("PHOTON_BASE_URL")
            .unwrap_or_else(|| DEFAULT_PHOTON_BASE_URL.to_string()),
        user_agent: optional("APP_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        referer: optional("APP_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string()),
        timeout_secs,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        cities_path,
        rate_limit_per_minute,
        geocoder,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_uses_defaults_for_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should parse");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.cities_path.is_none());
        assert_eq!(cfg.rate_limit_per_minute, 30);
        assert_eq!(cfg.geocoder.timeout_secs, 6);
        assert_eq!(
            cfg.geocoder.nominatim_base_url,
            "https://nominatim.openstreetmap.org/search"
        );
        assert_eq!(cfg.geocoder.photon_base_url, "https://photon.komoot.io/api/");
        assert!(cfg.geocoder.nominatim_email.is_none());
        assert_eq!(cfg.geocoder.referer, "http://localhost:3000");
        assert!(cfg.geocoder.user_agent.starts_with("review-kz/1.0"));
    }

    #[test]
    fn build_app_config_reads_geocoder_overrides() {
        let mut map = HashMap::new();
        map.insert("NOMINATIM_BASE_URL", "http://127.0.0.1:8080/search");
        map.insert("NOMINATIM_EMAIL", "ops@example.kz");
        map.insert("APP_USER_AGENT", "review-kz/2.0 (ops@example.kz)");
        map.insert("APP_ORIGIN", "https://review.example.kz");
        map.insert("REVKZ_GEOCODER_TIMEOUT_SECS", "10");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.geocoder.nominatim_base_url, "http://127.0.0.1:8080/search");
        assert_eq!(cfg.geocoder.nominatim_email.as_deref(), Some("ops@example.kz"));
        assert_eq!(cfg.geocoder.user_agent, "review-kz/2.0 (ops@example.kz)");
        assert_eq!(cfg.geocoder.referer, "https://review.example.kz");
        assert_eq!(cfg.geocoder.timeout_secs, 10);
    }

    #[test]
    fn build_app_config_treats_blank_email_as_unset() {
        let mut map = HashMap::new();
        map.insert("NOMINATIM_EMAIL", "   ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.geocoder.nominatim_email.is_none());
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("REVKZ_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVKZ_BIND_ADDR"),
            "expected InvalidEnvVar(REVKZ_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("REVKZ_GEOCODER_TIMEOUT_SECS", "six");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVKZ_GEOCODER_TIMEOUT_SECS"),
            "expected InvalidEnvVar(REVKZ_GEOCODER_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_timeout() {
        let mut map = HashMap::new();
        map.insert("REVKZ_GEOCODER_TIMEOUT_SECS", "0");
        assert!(build_app_config(lookup_from_map(&map)).is_err());
    }

    #[test]
    fn debug_output_redacts_contact_email() {
        let mut map = HashMap::new();
        map.insert("NOMINATIM_EMAIL", "ops@example.kz");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("ops@example.kz"), "email leaked: {debug}");
        assert!(debug.contains("[redacted]"));
    }
}
