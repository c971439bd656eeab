//! `greenroute-map` - keeps a route and charging stations drawn on a map
//!
//! This library synchronizes the overlays of an interactive map (route path,
//! start/end pins, station pins) with a declarative scene that changes over
//! time, resolves route geometry through a directions provider, and forwards
//! map clicks to the host.

pub mod api;
pub mod click;
pub mod config;
pub mod directions;
pub mod error;
pub mod map;
pub mod models;
pub mod reconciler;
pub mod resolver;
pub mod route_map;
pub mod summary;

// Re-export core types for public API
pub use api::RouteApiClient;
pub use click::{ClickForwarder, MapClickCallback};
pub use config::GreenRouteConfig;
pub use directions::{
    DirectionsProvider, DirectionsResponse, DirectionsStatus, GraphHopperDirections, TravelMode,
};
pub use error::GreenRouteError;
pub use map::{
    MapClickEvent, MapHandle, MapOptions, MapSurface, RecordingSurface, RenderablePath, Viewport,
};
pub use models::{GeoPoint, Route, RoutePreferences, RouteWithStations, Scene, Station};
pub use reconciler::OverlayReconciler;
pub use resolver::{ResolutionError, ResolutionOrdering, SceneResolver};
pub use route_map::{RouteMap, RouteMapProps};
pub use summary::RouteSummary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GreenRouteError>;
