//! Primary provider: Nominatim search with structured address details.
//!
//! Non-2xx responses are classified (429 rate limited, 403 forbidden,
//! anything else unavailable) and reported to the orchestrator, which
//! remembers them while it consults the fallback.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use revkz_core::GeocoderConfig;

use super::{
    build_http_client, endpoint_label, is_strict_match, parse_base_url, GeocodingProvider,
    COUNTRY_CODE, RESULT_LIMIT,
};
use crate::error::GeocodeError;
use crate::types::{GeoResult, NominatimPlace, ProviderOutcome, ProviderQuery};

pub struct NominatimClient {
    client: Client,
    base_url: Url,
    email: Option<String>,
    referer: String,
}

impl NominatimClient {
    /// Builds a client for `config.nominatim_base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidBaseUrl`] if the base URL does not
    /// parse, or [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = build_http_client(
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )?;
        Ok(Self {
            client,
            base_url: parse_base_url(&config.nominatim_base_url)?,
            email: config.nominatim_email.clone(),
            referer: config.referer.clone(),
        })
    }

    /// Search URL restricted to Kazakhstan, with address details.
    fn search_url(&self, text: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "jsonv2");
            pairs.append_pair("limit", &RESULT_LIMIT.to_string());
            pairs.append_pair("addressdetails", "1");
            pairs.append_pair("countrycodes", COUNTRY_CODE);
            pairs.append_pair("q", text);
            if let Some(email) = &self.email {
                pairs.append_pair("email", email);
            }
        }
        url
    }

    /// Sends the search request and decodes the candidate array.
    ///
    /// A body that is not a JSON array yields
    /// [`GeocodeError::Deserialize`]; individual candidates that fail to
    /// decode are skipped.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::UnexpectedStatus`] for any non-2xx status.
    /// - [`GeocodeError::Http`] on network failure or timeout. The URL is
    ///   stripped from the error because it carries the contact email.
    /// - [`GeocodeError::Deserialize`] if the body is not a JSON array.
    pub async fn search(&self, text: &str) -> Result<Vec<NominatimPlace>, GeocodeError> {
        let url = self.search_url(text);
        let endpoint = endpoint_label(&url);
        tracing::debug!(endpoint = %endpoint, query = text, "nominatim search");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "ru")
            .header(reqwest::header::REFERER, &self.referer)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint,
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let rows = serde_json::from_str::<Vec<serde_json::Value>>(&body).map_err(|e| {
            GeocodeError::Deserialize {
                context: format!("nominatim search from {endpoint}"),
                source: e,
            }
        })?;

        Ok(rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<NominatimPlace>(row).ok())
            .collect())
    }
}

/// First candidate, in provider order, that has finite coordinates and
/// passes the strict match.
pub(crate) fn select_match(places: &[NominatimPlace], query: &ProviderQuery) -> Option<GeoResult> {
    places.iter().find_map(|place| {
        let (lat, lng) = (place.lat?, place.lon?);
        let house = place.house_number()?;
        is_strict_match(house, place.street_text(), query).then_some(GeoResult { lat, lng })
    })
}

#[async_trait]
impl GeocodingProvider for NominatimClient {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn query(&self, query: &ProviderQuery) -> ProviderOutcome {
        let places = match self.search(&query.text).await {
            Ok(places) => places,
            Err(err) => {
                return match err.failure_kind() {
                    Some(kind) => {
                        tracing::warn!(provider = "nominatim", error = %err, ?kind, "geocoding request failed");
                        ProviderOutcome::Failure(kind)
                    }
                    None => {
                        tracing::warn!(provider = "nominatim", error = %err, "malformed response treated as no match");
                        ProviderOutcome::NoMatch
                    }
                };
            }
        };

        match select_match(&places, query) {
            Some(result) => ProviderOutcome::Match(result),
            None => {
                tracing::debug!(
                    provider = "nominatim",
                    candidates = places.len(),
                    desired_house = %query.desired_house,
                    "no strict match among candidates"
                );
                ProviderOutcome::NoMatch
            }
        }
    }
}
