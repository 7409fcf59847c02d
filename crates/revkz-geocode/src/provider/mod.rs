//! Geocoding providers queried by [`crate::AddressVerifier`].

mod nominatim;
mod photon;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::normalize::{canonicalize_house_number, fold_case, normalize_whitespace};
use crate::types::{ProviderOutcome, ProviderQuery};

pub use nominatim::NominatimClient;
pub use photon::PhotonClient;

/// Candidates requested from each provider.
pub(crate) const RESULT_LIMIT: u32 = 8;

/// ISO 3166-1 alpha-2 code of the only country addresses are verified in.
pub(crate) const COUNTRY_CODE: &str = "kz";

/// One external geocoding service.
///
/// Implementations own their timeout and must return
/// [`ProviderOutcome::Failure`] with [`crate::FailureKind::Timeout`] rather
/// than block past it. Dropping the returned future aborts the request.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn query(&self, query: &ProviderQuery) -> ProviderOutcome;
}

/// Strict match: the candidate house number canonically equals the desired
/// one and, when keywords exist, the street text contains at least one.
pub(crate) fn is_strict_match(candidate_house: &str, street_text: &str, query: &ProviderQuery) -> bool {
    if canonicalize_house_number(candidate_house) != query.desired_house {
        return false;
    }
    if query.keywords.is_empty() {
        return true;
    }
    let street = fold_case(&normalize_whitespace(street_text));
    query.keywords.iter().any(|k| street.contains(k.as_str()))
}

pub(crate) fn build_http_client(timeout: Duration, user_agent: &str) -> Result<Client, GeocodeError> {
    let client = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, GeocodeError> {
    Url::parse(raw.trim()).map_err(|e| GeocodeError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// Endpoint without query string, safe to log.
pub(crate) fn endpoint_label(url: &Url) -> String {
    let mut bare = url.clone();
    bare.set_query(None);
    bare.to_string()
}
