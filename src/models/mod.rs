//! Data models for the GreenRoute map client
//!
//! This module contains the domain models organized by concern:
//! - Location: geographic points
//! - Route: routes, segments and routing preferences
//! - Station: charging stations shown along a route
//! - Scene: what the map should currently display

pub mod location;
pub mod route;
pub mod scene;
pub mod station;

// Re-export all public types for convenient access
pub use location::GeoPoint;
pub use route::{Route, RoutePreferences, RouteSegment, RouteWithStations, TransportMode};
pub use scene::Scene;
pub use station::{Connection, Station};
