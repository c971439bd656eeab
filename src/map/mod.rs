//! Map surface abstraction
//!
//! A [`MapSurface`] is the imperative side of the map: it creates and
//! destroys markers, owns path renderers and applies the map options. The rest of
//! the crate only talks to the map through this trait, so the same engine
//! drives a real map widget or the headless [`RecordingSurface`].

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::models::GeoPoint;

pub mod recording;

pub use recording::{MarkerId, RecordedRenderer, RecordingSurface, RendererId};

/// Visual style of a point marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerStyle {
    Start,
    End,
    Station,
}

impl MarkerStyle {
    /// Icon shown for markers of this style
    #[must_use]
    pub fn icon_url(&self) -> &'static str {
        match self {
            MarkerStyle::Start => "http://maps.google.com/mapfiles/ms/icons/green-dot.png",
            MarkerStyle::End => "http://maps.google.com/mapfiles/ms/icons/red-dot.png",
            MarkerStyle::Station => "http://maps.google.com/mapfiles/ms/icons/blue-dot.png",
        }
    }
}

/// Everything needed to place one point marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    pub position: GeoPoint,
    pub title: String,
    pub style: MarkerStyle,
    /// Station shown by this marker, for info lookups on click
    pub station_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRendererOptions {
    /// Do not draw the provider's own origin/destination markers
    pub suppress_markers: bool,
}

/// Geometry of a resolved route, ready to hand to a path renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderablePath {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Polyline vertices from origin to destination
    pub points: Vec<GeoPoint>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Raw click as delivered by the map widget
///
/// `lat_lng` is absent for clicks that did not land on the map itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapClickEvent {
    pub lat_lng: Option<(f64, f64)>,
}

impl MapClickEvent {
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_lng: Some((latitude, longitude)),
        }
    }

    #[must_use]
    pub fn geo_point(&self) -> Option<GeoPoint> {
        self.lat_lng.map(|(lat, lng)| GeoPoint::new(lat, lng))
    }
}

/// Initial camera of a mounted map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(37.7749, -122.4194),
            zoom: 12,
        }
    }
}

/// Initial camera and widget chrome of a mounted map
///
/// Defaults to a clean base map: no POI labels, no fullscreen or
/// street-view controls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapOptions {
    pub viewport: Viewport,
    pub show_poi_labels: bool,
    pub fullscreen_control: bool,
    pub street_view_control: bool,
}

/// Imperative map widget the overlays are drawn on
///
/// All operations are synchronous and infallible against a live surface.
pub trait MapSurface {
    type Marker: PartialEq;
    type PathRenderer: Clone;

    fn create_marker(&mut self, options: MarkerOptions) -> Self::Marker;
    fn remove_marker(&mut self, marker: Self::Marker);
    fn create_path_renderer(&mut self, options: PathRendererOptions) -> Self::PathRenderer;
    /// Replace whatever the renderer currently shows with `path`
    fn set_directions(&mut self, renderer: &Self::PathRenderer, path: RenderablePath);
    fn remove_path_renderer(&mut self, renderer: Self::PathRenderer);

    /// Apply camera and controls once the widget is available
    fn configure(&mut self, _options: &MapOptions) {}
}

/// Shared handle to a mounted surface
///
/// The engine is single threaded: the handle is cloned into pending
/// resolutions so they can update the path renderer when they complete.
#[derive(Debug)]
pub struct MapHandle<S>(Rc<RefCell<S>>);

impl<S> MapHandle<S> {
    pub fn new(surface: S) -> Self {
        Self(Rc::new(RefCell::new(surface)))
    }

    /// # Panics
    /// Panics if the surface is currently borrowed mutably.
    pub fn borrow(&self) -> Ref<'_, S> {
        self.0.borrow()
    }

    /// # Panics
    /// Panics if the surface is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, S> {
        self.0.borrow_mut()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<S> Clone for MapHandle<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_conversion() {
        let event = MapClickEvent::at(40.0, -74.0);
        assert_eq!(event.geo_point(), Some(GeoPoint::new(40.0, -74.0)));
        assert_eq!(MapClickEvent::default().geo_point(), None);
    }

    #[test]
    fn test_marker_styles_are_distinct() {
        let icons = [
            MarkerStyle::Start.icon_url(),
            MarkerStyle::End.icon_url(),
            MarkerStyle::Station.icon_url(),
        ];
        assert!(icons[0].contains("green"));
        assert!(icons[1].contains("red"));
        assert!(icons[2].contains("blue"));
    }

    #[test]
    fn test_handle_clones_share_surface() {
        let handle = MapHandle::new(RecordingSurface::new());
        let other = handle.clone();
        assert!(handle.ptr_eq(&other));
        assert!(!handle.ptr_eq(&MapHandle::new(RecordingSurface::new())));
    }
}
