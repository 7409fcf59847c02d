//! Value types for a single verification call and the provider wire shapes.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Lowercase street-name tokens; ordered so logs and tests are stable.
pub type StreetKeywords = BTreeSet<String>;

/// Raw caller input. Missing JSON fields deserialize as empty strings so
/// that validation, not decoding, reports them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressQuery {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
}

/// WGS84 coordinates of a strictly matched candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoResult {
    pub lat: f64,
    pub lng: f64,
}

/// Classified provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 429.
    RateLimited,
    /// HTTP 403.
    Forbidden,
    /// Any other non-2xx status, or the service could not be reached.
    ServiceUnavailable,
    /// The call exceeded its deadline.
    Timeout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Match(GeoResult),
    NoMatch,
    Failure(FailureKind),
}

/// What every provider is asked: the composite search text plus the strict
/// match targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub text: String,
    pub desired_house: String,
    pub keywords: StreetKeywords,
}

// ---------------------------------------------------------------------------
// Nominatim (`format=jsonv2`, `addressdetails=1`)
// ---------------------------------------------------------------------------

/// One element of the Nominatim search array.
///
/// `lat`/`lon` are strings in the real API; numbers are accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub house_number: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    #[serde(default, deserialize_with = "lenient_string")]
    pub house_number: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub pedestrian: Option<String>,
    #[serde(default)]
    pub footway: Option<String>,
}

impl NominatimPlace {
    /// Structured house number, preferring the `address` object.
    #[must_use]
    pub fn house_number(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|a| a.house_number.as_deref())
            .or(self.house_number.as_deref())
            .filter(|h| !h.trim().is_empty())
    }

    /// Street text used for keyword corroboration: `road`, then
    /// `pedestrian`, then `footway`, then the full display name.
    #[must_use]
    pub fn street_text(&self) -> &str {
        let address = self.address.as_ref();
        address
            .and_then(|a| a.road.as_deref())
            .or_else(|| address.and_then(|a| a.pedestrian.as_deref()))
            .or_else(|| address.and_then(|a| a.footway.as_deref()))
            .or(self.display_name.as_deref())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Photon (GeoJSON feature collection)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PhotonResponse {
    #[serde(default)]
    pub features: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotonFeature {
    #[serde(default)]
    pub properties: PhotonProperties,
    #[serde(default)]
    pub geometry: Option<PhotonGeometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotonProperties {
    #[serde(default)]
    pub countrycode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub housenumber: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
}

/// `coordinates` is `[lng, lat]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotonGeometry {
    #[serde(default)]
    pub coordinates: Vec<serde_json::Value>,
}

impl PhotonFeature {
    #[must_use]
    pub fn is_in_country(&self, country_code: &str) -> bool {
        self.properties
            .countrycode
            .as_deref()
            .is_some_and(|cc| cc.trim().eq_ignore_ascii_case(country_code))
    }

    #[must_use]
    pub fn house_number(&self) -> Option<&str> {
        self.properties
            .housenumber
            .as_deref()
            .filter(|h| !h.trim().is_empty())
    }

    /// Feature name, falling back to the street.
    #[must_use]
    pub fn street_text(&self) -> &str {
        self.properties
            .name
            .as_deref()
            .or(self.properties.street.as_deref())
            .unwrap_or("")
    }

    /// Coordinates as a [`GeoResult`], if both are present and finite.
    #[must_use]
    pub fn position(&self) -> Option<GeoResult> {
        let coords = &self.geometry.as_ref()?.coordinates;
        let lng = value_as_f64(coords.first()?)?;
        let lat = value_as_f64(coords.get(1)?)?;
        Some(GeoResult { lat, lng })
    }
}

fn value_as_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
