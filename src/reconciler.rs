//! Overlay reconciliation
//!
//! Makes the live overlays on a map match a [`Scene`]. Point markers are
//! fully torn down and rebuilt on every sync; the path renderer is created
//! once and only has new directions swapped in.

use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::directions::DirectionsProvider;
use crate::map::{MapHandle, MapSurface, MarkerOptions, MarkerStyle, PathRendererOptions};
use crate::models::{GeoPoint, Scene};
use crate::resolver::SceneResolver;

struct PlacedMarker<M> {
    handle: M,
    station_id: Option<i64>,
}

/// Every overlay handle this reconciler owns on the surface
struct OverlaySet<S: MapSurface> {
    path: Option<S::PathRenderer>,
    markers: Vec<PlacedMarker<S::Marker>>,
}

impl<S: MapSurface> OverlaySet<S> {
    fn clear_markers(&mut self, surface: &mut S) {
        for marker in self.markers.drain(..) {
            surface.remove_marker(marker.handle);
        }
    }

    fn place(&mut self, surface: &mut S, options: MarkerOptions) {
        let station_id = options.station_id;
        let handle = surface.create_marker(options);
        self.markers.push(PlacedMarker { handle, station_id });
    }
}

pub struct OverlayReconciler<S: MapSurface, D> {
    overlays: OverlaySet<S>,
    resolver: SceneResolver<D>,
}

impl<S, D> OverlayReconciler<S, D>
where
    S: MapSurface + 'static,
    D: DirectionsProvider + 'static,
{
    pub fn new(resolver: SceneResolver<D>) -> Self {
        Self {
            overlays: OverlaySet {
                path: None,
                markers: Vec::new(),
            },
            resolver,
        }
    }

    /// Bring the surface's overlays in line with `scene`
    ///
    /// Returns the pending route resolution, if one was started. Dropping
    /// the handle does not cancel it.
    ///
    /// # Panics
    /// Must be called from within a [`tokio::task::LocalSet`] when the
    /// scene has a route.
    #[instrument(skip_all, fields(route = scene.route.is_some(), stations = scene.stations().len()))]
    pub fn sync(&mut self, scene: &Scene, surface: &MapHandle<S>) -> Option<JoinHandle<()>> {
        let mut map = surface.borrow_mut();

        if self.overlays.path.is_none() {
            let renderer = map.create_path_renderer(PathRendererOptions {
                suppress_markers: true,
            });
            self.overlays.path = Some(renderer);
        }

        self.overlays.clear_markers(&mut map);

        let mut pending = None;
        if let Some(route) = scene.route() {
            if let Some(renderer) = self.overlays.path.clone() {
                let target = surface.clone();
                pending = Some(self.resolver.resolve(route, move |path| {
                    target.borrow_mut().set_directions(&renderer, path);
                }));
            }

            self.overlays
                .place(&mut map, endpoint(&route.start, "Start", MarkerStyle::Start));
            self.overlays
                .place(&mut map, endpoint(&route.end, "End", MarkerStyle::End));
        }

        for station in scene.stations() {
            self.overlays.place(
                &mut map,
                MarkerOptions {
                    position: station.location.clone(),
                    title: station.title.clone(),
                    style: MarkerStyle::Station,
                    station_id: Some(station.id),
                },
            );
        }

        debug!("Scene synced with {} markers", self.overlays.markers.len());
        pending
    }

    /// Remove every overlay, path renderer included
    ///
    /// Resolutions still in flight are revoked so they never write to the
    /// removed renderer.
    pub fn teardown(&mut self, surface: &MapHandle<S>) {
        self.resolver.revoke_pending();
        let mut map = surface.borrow_mut();
        self.overlays.clear_markers(&mut map);
        if let Some(renderer) = self.overlays.path.take() {
            map.remove_path_renderer(renderer);
        }
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.overlays.markers.len()
    }

    #[must_use]
    pub fn path_renderer(&self) -> Option<&S::PathRenderer> {
        self.overlays.path.as_ref()
    }

    /// Station shown by `marker`, if it is one of this reconciler's station markers
    #[must_use]
    pub fn station_at(&self, marker: &S::Marker) -> Option<i64> {
        self.overlays
            .markers
            .iter()
            .find(|m| &m.handle == marker)
            .and_then(|m| m.station_id)
    }

    #[must_use]
    pub fn resolver(&self) -> &SceneResolver<D> {
        &self.resolver
    }
}

fn endpoint(position: &GeoPoint, title: &str, style: MarkerStyle) -> MarkerOptions {
    MarkerOptions {
        position: position.clone(),
        title: title.to_string(),
        style,
        station_id: None,
    }
}
