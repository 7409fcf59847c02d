//! Fallback provider: Photon free-text search.
//!
//! Best effort only. Every failure, including timeouts, collapses to
//! [`ProviderOutcome::NoMatch`] so that an outage here never masks the
//! primary provider's classified error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use revkz_core::GeocoderConfig;

use super::{
    build_http_client, endpoint_label, is_strict_match, parse_base_url, GeocodingProvider,
    COUNTRY_CODE, RESULT_LIMIT,
};
use crate::error::GeocodeError;
use crate::types::{GeoResult, PhotonFeature, PhotonResponse, ProviderOutcome, ProviderQuery};

pub struct PhotonClient {
    client: Client,
    base_url: Url,
}

impl PhotonClient {
    /// Builds a client for `config.photon_base_url`.
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
            base_url: parse_base_url(&config.photon_base_url)?,
        })
    }

    fn search_url(&self, text: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", text)
            .append_pair("limit", &RESULT_LIMIT.to_string())
            .append_pair("lang", "ru");
        url
    }

    /// Sends the search request and decodes the feature collection.
    /// Features that fail to decode are skipped.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::UnexpectedStatus`] for any non-2xx status.
    /// - [`GeocodeError::Http`] on network failure or timeout.
    /// - [`GeocodeError::Deserialize`] if the body is not a feature collection.
    pub async fn search(&self, text: &str) -> Result<Vec<PhotonFeature>, GeocodeError> {
        let url = self.search_url(text);
        let endpoint = endpoint_label(&url);
        tracing::debug!(endpoint = %endpoint, query = text, "photon search");

        let response = self
            .client
            .get(url)
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
        let parsed = serde_json::from_str::<PhotonResponse>(&body).map_err(|e| {
            GeocodeError::Deserialize {
                context: format!("photon search from {endpoint}"),
                source: e,
            }
        })?;

        Ok(parsed
            .features
            .into_iter()
            .filter_map(|f| serde_json::from_value::<PhotonFeature>(f).ok())
            .collect())
    }
}

/// First in-country feature, in provider order, that passes the strict
/// match and carries usable coordinates.
pub(crate) fn select_match(features: &[PhotonFeature], query: &ProviderQuery) -> Option<GeoResult> {
    features
        .iter()
        .filter(|f| f.is_in_country(COUNTRY_CODE))
        .find_map(|f| {
            let house = f.house_number()?;
            if !is_strict_match(house, f.street_text(), query) {
                return None;
            }
            f.position()
        })
}

#[async_trait]
impl GeocodingProvider for PhotonClient {
    fn name(&self) -> &'static str {
        "photon"
    }

    async fn query(&self, query: &ProviderQuery) -> ProviderOutcome {
        match self.search(&query.text).await {
            Ok(features) => select_match(&features, query)
                .map_or(ProviderOutcome::NoMatch, ProviderOutcome::Match),
            Err(err) => {
                tracing::warn!(provider = "photon", error = %err, "fallback geocoding failed; treating as no match");
                ProviderOutcome::NoMatch
            }
        }
    }
}
