pub mod error;
pub mod extract;
pub mod normalize;
pub mod provider;
pub mod types;
pub mod verify;

pub use error::{GeocodeError, VerifyError};
pub use extract::{
    HouseNumberExtractor, RegexHouseNumberExtractor, StopwordKeywordExtractor,
    StreetKeywordExtractor, ADDRESS_STOPWORDS,
};
pub use normalize::{canonicalize_house_number, fold_case, normalize_whitespace};
pub use provider::{GeocodingProvider, NominatimClient, PhotonClient};
pub use types::{
    AddressQuery, FailureKind, GeoResult, ProviderOutcome, ProviderQuery, StreetKeywords,
};
pub use verify::AddressVerifier;
