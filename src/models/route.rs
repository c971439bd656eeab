//! Route models as produced by the route-planning backend

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GeoPoint, Station};

/// Mode of transportation for a route segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Car,
    Bicycle,
    PublicTransit,
    Walking,
}

impl TransportMode {
    /// Wire name of the mode
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bicycle => "bicycle",
            TransportMode::PublicTransit => "public_transit",
            TransportMode::Walking => "walking",
        }
    }

    /// Label for display, e.g. "public transit"
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A portion of a route travelled with a single mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    #[serde(rename = "start_location")]
    pub start: GeoPoint,
    #[serde(rename = "end_location")]
    pub end: GeoPoint,
    pub mode: TransportMode,
    /// Duration in seconds
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
    /// Distance in meters
    #[serde(rename = "distance")]
    pub distance_meters: f64,
    /// Emitted CO2 in grams
    #[serde(rename = "co2_emission")]
    pub co2_grams: f64,
}

/// A complete route, segments ordered from start to end
///
/// Totals are expected to equal the sums over `segments`; the producer
/// upholds that, nothing here checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "start_location")]
    pub start: GeoPoint,
    #[serde(rename = "end_location")]
    pub end: GeoPoint,
    #[serde(default)]
    pub segments: Vec<RouteSegment>,
    #[serde(rename = "total_distance")]
    pub total_distance_meters: f64,
    #[serde(rename = "total_duration")]
    pub total_duration_seconds: f64,
    #[serde(rename = "total_emission")]
    pub total_co2_grams: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Route {
    /// A route between two points with no segments and zero totals
    #[must_use]
    pub fn between(start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            id: None,
            user_id: None,
            start,
            end,
            segments: Vec::new(),
            total_distance_meters: 0.0,
            total_duration_seconds: 0.0,
            total_co2_grams: 0.0,
            created_at: None,
        }
    }

    /// Transport modes used along the route, in order of first use
    #[must_use]
    pub fn modes(&self) -> Vec<TransportMode> {
        let mut modes = Vec::new();
        for segment in &self.segments {
            if !modes.contains(&segment.mode) {
                modes.push(segment.mode);
            }
        }
        modes
    }
}

/// User preferences sent along with a route calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePreferences {
    pub preferred_modes: Vec<TransportMode>,
    pub avoid_highways: bool,
    /// Maximum walking distance in meters
    pub max_walking_distance: f64,
    pub prioritize_emission: bool,
    pub max_transfers: u32,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            preferred_modes: vec![TransportMode::Car],
            avoid_highways: false,
            max_walking_distance: 1000.0,
            prioritize_emission: true,
            max_transfers: 2,
        }
    }
}

/// Backend answer to a route calculation: the route and stations along it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWithStations {
    pub route: Route,
    #[serde(rename = "chargingStations", default)]
    pub stations: Vec<Station>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TransportMode::Car, "\"car\"", "car")]
    #[case(TransportMode::Bicycle, "\"bicycle\"", "bicycle")]
    #[case(TransportMode::PublicTransit, "\"public_transit\"", "public transit")]
    #[case(TransportMode::Walking, "\"walking\"", "walking")]
    fn test_transport_mode_names(
        #[case] mode: TransportMode,
        #[case] wire: &str,
        #[case] label: &str,
    ) {
        assert_eq!(serde_json::to_string(&mode).unwrap(), wire);
        assert_eq!(serde_json::from_str::<TransportMode>(wire).unwrap(), mode);
        assert_eq!(mode.label(), label);
    }

    #[test]
    fn test_route_from_backend_json() {
        let json = r#"{
            "id": "r-1",
            "user_id": "u-7",
            "start_location": {"latitude": 37.0, "longitude": -122.0, "address": "A"},
            "end_location": {"latitude": 37.1, "longitude": -122.1},
            "segments": [
                {
                    "start_location": {"latitude": 37.0, "longitude": -122.0},
                    "end_location": {"latitude": 37.1, "longitude": -122.1},
                    "mode": "car",
                    "duration": 900.0,
                    "distance": 14000.0,
                    "co2_emission": 1680.0
                }
            ],
            "total_distance": 14000.0,
            "total_duration": 900.0,
            "total_emission": 1680.0,
            "created_at": "2024-05-01T12:00:00Z"
        }"#;

        let route: Route = serde_json::from_str(json).unwrap();
        assert_eq!(route.id.as_deref(), Some("r-1"));
        assert_eq!(route.start, GeoPoint::new(37.0, -122.0));
        assert_eq!(route.segments.len(), 1);
        assert_eq!(route.segments[0].mode, TransportMode::Car);
        assert_eq!(route.total_distance_meters, 14000.0);
        assert!(route.created_at.is_some());
    }

    #[test]
    fn test_modes_in_order_of_first_use() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let segment = |mode| RouteSegment {
            start: a.clone(),
            end: b.clone(),
            mode,
            duration_seconds: 1.0,
            distance_meters: 1.0,
            co2_grams: 0.0,
        };
        let mut route = Route::between(a.clone(), b.clone());
        route.segments = vec![
            segment(TransportMode::Walking),
            segment(TransportMode::PublicTransit),
            segment(TransportMode::Walking),
        ];
        assert_eq!(
            route.modes(),
            vec![TransportMode::Walking, TransportMode::PublicTransit]
        );
    }

    #[test]
    fn test_default_preferences_serialize_snake_case() {
        let json = serde_json::to_value(RoutePreferences::default()).unwrap();
        assert_eq!(json["preferred_modes"][0], "car");
        assert_eq!(json["max_transfers"], 2);
        assert!(json.get("avoid_highways").is_some());
    }
}
