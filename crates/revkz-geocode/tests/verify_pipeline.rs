//! End-to-end tests for `AddressVerifier` with both providers backed by
//! wiremock servers.

use std::time::{Duration, Instant};

use revkz_core::{CityWhitelist, GeocoderConfig};
use revkz_geocode::{AddressVerifier, GeoResult, VerifyError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Upstreams {
    nominatim: MockServer,
    photon: MockServer,
}

impl Upstreams {
    async fn start() -> Self {
        Self {
            nominatim: MockServer::start().await,
            photon: MockServer::start().await,
        }
    }

    fn verifier(&self) -> AddressVerifier {
        let config = GeocoderConfig {
            nominatim_base_url: format!("{}/search", self.nominatim.uri()),
            nominatim_email: None,
            photon_base_url: format!("{}/api/", self.photon.uri()),
            user_agent: "revkz-test/0.1".to_string(),
            referer: "http://localhost:3000".to_string(),
            timeout_secs: 5,
        };
        AddressVerifier::from_config(&config, CityWhitelist::default())
            .expect("verifier construction should not fail")
    }

    async fn nominatim_responds(&self, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(template)
            .mount(&self.nominatim)
            .await;
    }

    async fn photon_responds(&self, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/"))
            .respond_with(template)
            .mount(&self.photon)
            .await;
    }
}

fn empty_features() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"features": []}))
}

#[tokio::test]
async fn primary_candidate_verifies_avenue_address() {
    let upstreams = Upstreams::start().await;
    upstreams
        .nominatim_responds(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": 43.23, "lon": 76.9, "address": {"house_number": "10", "road": "Абая"}}
        ])))
        .await;
    Mock::given(method("GET"))
        .respond_with(empty_features())
        .expect(0)
        .mount(&upstreams.photon)
        .await;

    let result = upstreams.verifier().verify("Алматы", "пр-т Абая 10").await;
    assert_eq!(
        result,
        Ok(GeoResult {
            lat: 43.23,
            lng: 76.9
        })
    );
}

#[tokio::test]
async fn unmatched_house_number_is_not_verifiable() {
    let upstreams = Upstreams::start().await;
    upstreams
        .nominatim_responds(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "43.23", "lon": "76.9", "address": {"house_number": "99", "road": "Абая"}},
            {"lat": "43.24", "lon": "76.91", "address": {"house_number": "9", "road": "Абая"}}
        ])))
        .await;
    upstreams
        .photon_responds(ResponseTemplate::new(200).set_body_json(json!({
            "features": [{
                "properties": {"countrycode": "KZ", "housenumber": "99А", "street": "Абая"},
                "geometry": {"coordinates": [76.9, 43.23]}
            }]
        })))
        .await;

    let result = upstreams.verifier().verify("Алматы", "Абая 999").await;
    assert_eq!(result, Err(VerifyError::AddressNotVerifiable));
}

#[tokio::test]
async fn fallback_match_masks_rate_limited_primary() {
    let upstreams = Upstreams::start().await;
    upstreams.nominatim_responds(ResponseTemplate::new(429)).await;
    upstreams
        .photon_responds(ResponseTemplate::new(200).set_body_json(json!({
            "features": [{
                "properties": {"countrycode": "KZ", "housenumber": "34", "street": "Абая"},
                "geometry": {"coordinates": [76.92, 43.24]}
            }]
        })))
        .await;

    let result = upstreams.verifier().verify("Алматы", "Абая 34").await;
    assert_eq!(
        result,
        Ok(GeoResult {
            lat: 43.24,
            lng: 76.92
        })
    );
}

#[tokio::test]
async fn forbidden_primary_is_surfaced_when_fallback_misses() {
    let upstreams = Upstreams::start().await;
    upstreams.nominatim_responds(ResponseTemplate::new(403)).await;
    upstreams.photon_responds(empty_features()).await;

    let result = upstreams.verifier().verify("Алматы", "Абая 34").await;
    assert_eq!(result, Err(VerifyError::Forbidden));
}

#[tokio::test]
async fn rate_limited_primary_is_surfaced_when_fallback_fails_too() {
    let upstreams = Upstreams::start().await;
    upstreams.nominatim_responds(ResponseTemplate::new(429)).await;
    upstreams.photon_responds(ResponseTemplate::new(500)).await;

    let result = upstreams.verifier().verify("Алматы", "Абая 34").await;
    assert_eq!(result, Err(VerifyError::RateLimited));
}

#[tokio::test]
async fn invalid_city_makes_no_network_calls() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&upstreams.nominatim)
        .await;
    Mock::given(method("GET"))
        .respond_with(empty_features())
        .expect(0)
        .mount(&upstreams.photon)
        .await;

    let result = upstreams.verifier().verify("Москва", "Абая 34").await;
    assert!(matches!(result, Err(VerifyError::InvalidCity { .. })));
}

#[tokio::test]
async fn dropping_verify_future_aborts_provider_calls() {
    let upstreams = Upstreams::start().await;
    upstreams
        .nominatim_responds(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .await;
    Mock::given(method("GET"))
        .respond_with(empty_features())
        .expect(0)
        .mount(&upstreams.photon)
        .await;

    let verifier = upstreams.verifier();
    let started = Instant::now();
    let result = tokio::time::timeout(
        Duration::from_millis(200),
        verifier.verify("Алматы", "Абая 34"),
    )
    .await;

    assert!(result.is_err(), "verify should still be waiting on the primary");
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "cancellation took {:?}",
        started.elapsed()
    );

    // Give a detached request time to reach the fallback if one survived the drop.
    tokio::time::sleep(Duration::from_millis(300)).await;
    upstreams.photon.verify().await;
}
