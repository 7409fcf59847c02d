//! Address verification: local validation followed by strict geocoding
//! against an ordered list of providers.

use revkz_core::{CityWhitelist, GeocoderConfig};

use crate::error::{GeocodeError, VerifyError};
use crate::extract::{
    HouseNumberExtractor, RegexHouseNumberExtractor, StopwordKeywordExtractor,
    StreetKeywordExtractor,
};
use crate::normalize::{canonicalize_house_number, normalize_whitespace};
use crate::provider::{GeocodingProvider, NominatimClient, PhotonClient};
use crate::types::{FailureKind, GeoResult, ProviderOutcome, ProviderQuery};

const MIN_ADDRESS_CHARS: usize = 5;
const COUNTRY_NAME: &str = "Казахстан";

/// Entry point of the verification engine.
///
/// Providers are consulted in order until one returns a strict match. A
/// classified failure does not stop the walk; the first one seen is
/// surfaced only if no later provider matches.
pub struct AddressVerifier {
    cities: CityWhitelist,
    house_numbers: Box<dyn HouseNumberExtractor>,
    keywords: Box<dyn StreetKeywordExtractor>,
    providers: Vec<Box<dyn GeocodingProvider>>,
}

impl AddressVerifier {
    /// Verifier with the default regex and stopword extractors.
    #[must_use]
    pub fn new(cities: CityWhitelist, providers: Vec<Box<dyn GeocodingProvider>>) -> Self {
        Self {
            cities,
            house_numbers: Box::new(RegexHouseNumberExtractor::new()),
            keywords: Box::new(StopwordKeywordExtractor::default()),
            providers,
        }
    }

    /// Production wiring: Nominatim first, Photon as fallback.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if either HTTP client cannot be built.
    pub fn from_config(config: &GeocoderConfig, cities: CityWhitelist) -> Result<Self, GeocodeError> {
        let providers: Vec<Box<dyn GeocodingProvider>> = vec![
            Box::new(NominatimClient::new(config)?),
            Box::new(PhotonClient::new(config)?),
        ];
        Ok(Self::new(cities, providers))
    }

    /// Replaces the extraction strategies.
    #[must_use]
    pub fn with_extractors(
        mut self,
        house_numbers: Box<dyn HouseNumberExtractor>,
        keywords: Box<dyn StreetKeywordExtractor>,
    ) -> Self {
        self.house_numbers = house_numbers;
        self.keywords = keywords;
        self
    }

    #[must_use]
    pub fn cities(&self) -> &CityWhitelist {
        &self.cities
    }

    /// Normalizes the city against the whitelist.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidCity`] for a blank or unlisted city.
    pub fn validate_city(&self, city: &str) -> Result<String, VerifyError> {
        self.cities
            .resolve(city)
            .ok_or_else(|| VerifyError::InvalidCity {
                city: normalize_whitespace(city),
            })
    }

    /// Runs every check that needs no network and builds the provider query.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidCity`], [`VerifyError::AddressTooShort`]
    /// or [`VerifyError::HouseNumberMissing`].
    pub fn prepare(&self, city: &str, address: &str) -> Result<ProviderQuery, VerifyError> {
        let city = self.validate_city(city)?;

        let address = normalize_whitespace(address);
        if address.chars().count() < MIN_ADDRESS_CHARS {
            return Err(VerifyError::AddressTooShort);
        }

        let raw_house = self
            .house_numbers
            .extract(&address)
            .ok_or(VerifyError::HouseNumberMissing)?;
        let desired_house = canonicalize_house_number(&raw_house);
        if desired_house.is_empty() {
            return Err(VerifyError::HouseNumberMissing);
        }

        Ok(ProviderQuery {
            text: format!("{address}, {city}, {COUNTRY_NAME}"),
            desired_house,
            keywords: self.keywords.extract(&address),
        })
    }

    /// Verifies that `address` exists in `city` and returns its coordinates.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any network call. Otherwise the
    /// first classified provider failure is returned when no provider
    /// matched, and [`VerifyError::AddressNotVerifiable`] when every provider
    /// answered without a strict match.
    pub async fn verify(&self, city: &str, address: &str) -> Result<GeoResult, VerifyError> {
        let query = self.prepare(city, address)?;
        tracing::debug!(
            query = %query.text,
            desired_house = %query.desired_house,
            keywords = ?query.keywords,
            "verifying address"
        );

        let mut remembered: Option<FailureKind> = None;
        for provider in &self.providers {
            match provider.query(&query).await {
                ProviderOutcome::Match(result) => {
                    tracing::info!(
                        provider = provider.name(),
                        lat = result.lat,
                        lng = result.lng,
                        "address verified"
                    );
                    return Ok(result);
                }
                ProviderOutcome::Failure(kind) => {
                    tracing::warn!(provider = provider.name(), ?kind, "provider failed; trying next");
                    remembered.get_or_insert(kind);
                }
                ProviderOutcome::NoMatch => {
                    tracing::debug!(provider = provider.name(), "provider found no strict match");
                }
            }
        }

        Err(remembered.map_or(VerifyError::AddressNotVerifiable, VerifyError::from))
    }
}
