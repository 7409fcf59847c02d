use thiserror::Error;

use crate::types::FailureKind;

/// Transport and decoding errors raised inside a provider call.
///
/// Providers never return these to the orchestrator; they are classified
/// into a [`crate::ProviderOutcome`] first.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure, including the request deadline.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl GeocodeError {
    /// Maps the error to a classified failure.
    ///
    /// Returns `None` for a malformed response body, which callers treat as
    /// "no match" rather than an outage, and for a base-URL error, which is
    /// raised only while building a client and never by a request.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            GeocodeError::Http(e) if e.is_timeout() => Some(FailureKind::Timeout),
            GeocodeError::Http(_) => Some(FailureKind::ServiceUnavailable),
            GeocodeError::UnexpectedStatus { status: 429, .. } => Some(FailureKind::RateLimited),
            GeocodeError::UnexpectedStatus { status: 403, .. } => Some(FailureKind::Forbidden),
            GeocodeError::UnexpectedStatus { .. } => Some(FailureKind::ServiceUnavailable),
            GeocodeError::Deserialize { .. } | GeocodeError::InvalidBaseUrl { .. } => None,
        }
    }
}

/// Why an address could not be verified. `Display` is user-presentable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("{}", invalid_city_message(.city))]
    InvalidCity { city: String },

    #[error("address: at least 5 characters are required")]
    AddressTooShort,

    #[error("address: include a house number (for example \"Сейфуллина 34\")")]
    HouseNumberMissing,

    #[error("address: the verification service is overloaded (rate limit); wait 1-2 minutes and try again")]
    RateLimited,

    #[error("address: the verification service rejected the request (403); set APP_USER_AGENT and NOMINATIM_EMAIL")]
    Forbidden,

    #[error("address: the verification service is temporarily unavailable")]
    ServiceUnavailable,

    #[error("address: verification took too long, please try again")]
    Timeout,

    #[error("address: not found with this house number; check the street and number (for example \"Сейфуллина 34\")")]
    AddressNotVerifiable,
}

fn invalid_city_message(city: &str) -> String {
    if city.is_empty() {
        "city: choose a city".to_string()
    } else {
        format!("city: choose a city from the Kazakhstan list (got \"{city}\")")
    }
}

impl VerifyError {
    /// Stable machine-readable identifier.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            VerifyError::InvalidCity { .. } => "invalid_city",
            VerifyError::AddressTooShort => "address_too_short",
            VerifyError::HouseNumberMissing => "house_number_missing",
            VerifyError::RateLimited => "rate_limited",
            VerifyError::Forbidden => "forbidden",
            VerifyError::ServiceUnavailable => "service_unavailable",
            VerifyError::Timeout => "timeout",
            VerifyError::AddressNotVerifiable => "address_not_verifiable",
        }
    }

    /// `true` when the caller can fix the input and resubmit.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            VerifyError::InvalidCity { .. }
                | VerifyError::AddressTooShort
                | VerifyError::HouseNumberMissing
                | VerifyError::AddressNotVerifiable
        )
    }

    /// `true` when retrying the same input later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VerifyError::RateLimited | VerifyError::ServiceUnavailable | VerifyError::Timeout
        )
    }
}

impl From<FailureKind> for VerifyError {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::RateLimited => VerifyError::RateLimited,
            FailureKind::Forbidden => VerifyError::Forbidden,
            FailureKind::ServiceUnavailable => VerifyError::ServiceUnavailable,
            FailureKind::Timeout => VerifyError::Timeout,
        }
    }
}
