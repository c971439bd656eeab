//! Directions providers
//!
//! A [`DirectionsProvider`] turns two endpoints into a drawable path. The map
//! engine only needs the status and, on success, the geometry.

use std::fmt::Display;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::DirectionsConfig;
use crate::map::RenderablePath;
use crate::models::{GeoPoint, TransportMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Driving,
    Bicycling,
    Walking,
    Transit,
}

impl From<TransportMode> for TravelMode {
    fn from(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Car => TravelMode::Driving,
            TransportMode::Bicycle => TravelMode::Bicycling,
            TransportMode::Walking => TravelMode::Walking,
            TransportMode::PublicTransit => TravelMode::Transit,
        }
    }
}

/// Outcome reported by a directions provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionsStatus {
    Ok,
    NotFound,
    ZeroResults,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
}

impl Display for DirectionsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DirectionsStatus::Ok => "OK",
            DirectionsStatus::NotFound => "NOT_FOUND",
            DirectionsStatus::ZeroResults => "ZERO_RESULTS",
            DirectionsStatus::InvalidRequest => "INVALID_REQUEST",
            DirectionsStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            DirectionsStatus::RequestDenied => "REQUEST_DENIED",
            DirectionsStatus::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(name)
    }
}

/// Status plus the resolved path, which is only meaningful for `Ok`
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsResponse {
    pub status: DirectionsStatus,
    pub path: Option<RenderablePath>,
}

impl DirectionsResponse {
    #[must_use]
    pub fn ok(path: RenderablePath) -> Self {
        Self {
            status: DirectionsStatus::Ok,
            path: Some(path),
        }
    }

    #[must_use]
    pub fn failed(status: DirectionsStatus) -> Self {
        Self { status, path: None }
    }
}

/// External service computing a path between two points
///
/// Failures are reported through the status, never as a panic or error.
pub trait DirectionsProvider {
    async fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        mode: TravelMode,
    ) -> DirectionsResponse;
}

/// Directions from the GraphHopper routing API
pub struct GraphHopperDirections {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GraphHopperDirections {
    pub fn new(config: &DirectionsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("greenroute-map/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolved_api_key(),
        })
    }

    fn profile(mode: TravelMode) -> Option<&'static str> {
        match mode {
            TravelMode::Driving => Some("car"),
            TravelMode::Bicycling => Some("bike"),
            TravelMode::Walking => Some("foot"),
            TravelMode::Transit => None,
        }
    }

    fn route_url(&self, origin: &GeoPoint, destination: &GeoPoint, profile: &str) -> String {
        let mut url = format!(
            "{}/route?point={}&point={}&profile={}&points_encoded=false&calc_points=true",
            self.base_url,
            urlencoding::encode(&origin.to_query_point()),
            urlencoding::encode(&destination.to_query_point()),
            profile,
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }

    async fn route_call(&self, url: String) -> Result<(StatusCode, Option<ApiResponse>)> {
        debug!("Calling the directions API");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok((status, None));
        }
        let body: ApiResponse = response
            .json()
            .await
            .context("Failed to parse directions response")?;
        Ok((status, Some(body)))
    }
}

impl DirectionsProvider for GraphHopperDirections {
    #[instrument(skip(self))]
    async fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        mode: TravelMode,
    ) -> DirectionsResponse {
        let Some(profile) = Self::profile(mode) else {
            debug!("No routing profile for {:?}", mode);
            return DirectionsResponse::failed(DirectionsStatus::ZeroResults);
        };

        let url = self.route_url(origin, destination, profile);
        match self.route_call(url).await {
            Ok((status, Some(body))) if status.is_success() => {
                body.into_response(origin, destination)
            }
            Ok((status, _)) => DirectionsResponse::failed(status_from_http(status)),
            Err(e) => {
                debug!("Directions request failed: {:#}", e);
                DirectionsResponse::failed(DirectionsStatus::UnknownError)
            }
        }
    }
}

fn status_from_http(status: StatusCode) -> DirectionsStatus {
    match status {
        StatusCode::BAD_REQUEST => DirectionsStatus::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DirectionsStatus::RequestDenied,
        StatusCode::TOO_MANY_REQUESTS => DirectionsStatus::OverQueryLimit,
        s if s.is_client_error() => DirectionsStatus::InvalidRequest,
        _ => DirectionsStatus::UnknownError,
    }
}

#[derive(Debug, Deserialize)]
struct PointList {
    /// `[lng, lat]` pairs
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct PathResponse {
    distance: f64,
    /// Milliseconds
    time: u64,
    points: Option<PointList>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    paths: Vec<PathResponse>,
}

impl ApiResponse {
    fn into_response(self, origin: &GeoPoint, destination: &GeoPoint) -> DirectionsResponse {
        let Some(path) = self.paths.into_iter().next() else {
            return DirectionsResponse::failed(DirectionsStatus::ZeroResults);
        };

        let points = path
            .points
            .map(|p| {
                p.coordinates
                    .into_iter()
                    .map(|[lng, lat]| GeoPoint::new(lat, lng))
                    .collect()
            })
            .unwrap_or_default();

        DirectionsResponse::ok(RenderablePath {
            origin: origin.clone(),
            destination: destination.clone(),
            points,
            distance_meters: path.distance,
            duration_seconds: path.time as f64 / 1000.0,
        })
    }
}
