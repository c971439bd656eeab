//! Route backend client
//!
//! Fetches computed routes, a user's saved routes and geocoded addresses from
//! the route-planning backend. Every non-success HTTP status becomes a
//! generic [`GreenRouteError::Api`] for the operation; there is no retry.

use std::time::{Duration, Instant};

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::ApiConfig;
use crate::models::{GeoPoint, RoutePreferences, RouteWithStations};
use crate::{GreenRouteError, Result};

const CALCULATE_FAILED: &str = "Failed to calculate route";
const USER_ROUTES_FAILED: &str = "Failed to fetch user routes";
const GEOCODE_FAILED: &str = "Failed to geocode address";

#[derive(Debug, Serialize)]
struct CalculateRouteRequest<'a> {
    start_location: &'a GeoPoint,
    end_location: &'a GeoPoint,
    preferences: &'a RoutePreferences,
}

pub struct RouteApiClient {
    client: Client,
    base_url: String,
}

impl RouteApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("greenroute-map/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GreenRouteError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn calculate_url(&self) -> String {
        format!("{}/routes/calculate", self.base_url)
    }

    fn user_routes_url(&self, user_id: &str) -> String {
        format!("{}/routes/user/{}", self.base_url, urlencoding::encode(user_id))
    }

    fn geocode_url(&self, address: &str) -> String {
        format!("{}/geocode?address={}", self.base_url, urlencoding::encode(address))
    }

    /// Ask the backend for a route between two points plus stations along it
    #[instrument(skip(self, preferences))]
    pub async fn calculate_route(
        &self,
        start: &GeoPoint,
        end: &GeoPoint,
        preferences: &RoutePreferences,
    ) -> Result<RouteWithStations> {
        info!(
            "Calculating route from {} to {}",
            start.format_coordinates(),
            end.format_coordinates()
        );
        let start_time = Instant::now();

        let body = CalculateRouteRequest {
            start_location: start,
            end_location: end,
            preferences,
        };
        let response = self
            .client
            .post(self.calculate_url())
            .json(&body)
            .send()
            .await;
        let result: RouteWithStations = decode(response, CALCULATE_FAILED).await?;

        let total_duration = start_time.elapsed();
        info!(
            "Route calculated in {:.3}s with {} segments and {} stations",
            total_duration.as_secs_f64(),
            result.route.segments.len(),
            result.stations.len()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow route calculation: {:.3}s",
                total_duration.as_secs_f64()
            );
        }
        Ok(result)
    }

    /// Routes previously calculated for `user_id`
    #[instrument(skip(self))]
    pub async fn get_user_routes(&self, user_id: &str) -> Result<Vec<RouteWithStations>> {
        let response = self.client.get(self.user_routes_url(user_id)).send().await;
        let routes: Vec<RouteWithStations> = decode(response, USER_ROUTES_FAILED).await?;
        debug!("Fetched {} routes for user {}", routes.len(), user_id);
        Ok(routes)
    }

    /// Resolve a free-form address to a point
    #[instrument(skip(self))]
    pub async fn geocode_address(&self, address: &str) -> Result<GeoPoint> {
        if address.trim().is_empty() {
            return Err(GreenRouteError::validation("Address cannot be empty"));
        }
        info!("Geocoding address: '{}'", address);
        let response = self.client.get(self.geocode_url(address)).send().await;
        let point: GeoPoint = decode(response, GEOCODE_FAILED).await?;
        debug!("Geocoded '{}' to {}", address, point.format_coordinates());
        Ok(point)
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Result<Response>,
    failure: &'static str,
) -> Result<T> {
    let response = response.map_err(|e| {
        debug!("{}: {}", failure, e);
        GreenRouteError::api(failure)
    })?;

    if !response.status().is_success() {
        debug!("{}: backend answered {}", failure, response.status());
        return Err(GreenRouteError::api(failure));
    }

    response.json::<T>().await.map_err(|e| {
        debug!("{}: unreadable body: {}", failure, e);
        GreenRouteError::api(failure)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> RouteApiClient {
        RouteApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let api = client("http://localhost:8080/api/v1/");
        assert_eq!(api.base_url(), "http://localhost:8080/api/v1");
        assert_eq!(
            api.calculate_url(),
            "http://localhost:8080/api/v1/routes/calculate"
        );
        assert_eq!(
            api.user_routes_url("user 42"),
            "http://localhost:8080/api/v1/routes/user/user%2042"
        );
        assert_eq!(
            api.geocode_url("1 Market St, San Francisco"),
            "http://localhost:8080/api/v1/geocode?address=1%20Market%20St%2C%20San%20Francisco"
        );
    }

    #[test]
    fn test_calculate_request_body() {
        let start = GeoPoint::with_address(37.0, -122.0, "Home");
        let end = GeoPoint::new(37.1, -122.1);
        let preferences = RoutePreferences::default();
        let body = CalculateRouteRequest {
            start_location: &start,
            end_location: &end,
            preferences: &preferences,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["start_location"]["address"], "Home");
        assert_eq!(value["end_location"]["latitude"], 37.1);
        assert_eq!(value["preferences"]["preferred_modes"][0], "car");
    }

    #[test]
    fn test_calculate_response_body() {
        let json = r#"{
            "route": {
                "start_location": {"latitude": 37.0, "longitude": -122.0},
                "end_location": {"latitude": 37.1, "longitude": -122.1},
                "segments": [],
                "total_distance": 0.0,
                "total_duration": 0.0,
                "total_emission": 0.0
            },
            "chargingStations": [
                {"id": 1, "addressInfo": {"title": "Lot", "address": "", "latitude": 37.05, "longitude": -122.05}}
            ]
        }"#;
        let parsed: RouteWithStations = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.stations.len(), 1);
        assert_eq!(parsed.stations[0].title, "Lot");
    }

    #[tokio::test]
    async fn test_empty_address_is_rejected_before_request() {
        let api = client("http://localhost:9/api/v1");
        let err = api.geocode_address("   ").await.unwrap_err();
        assert!(matches!(err, GreenRouteError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_generic_api_error() {
        // Port 9 (discard) is not expected to serve HTTP.
        let api = client("http://127.0.0.1:9/api/v1");
        let err = api.get_user_routes("u-1").await.unwrap_err();
        match err {
            GreenRouteError::Api { message } => assert_eq!(message, USER_ROUTES_FAILED),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
