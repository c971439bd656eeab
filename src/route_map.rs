//! Mounted route map
//!
//! [`RouteMap`] is what a host embeds: it takes the route, the station list
//! and an optional click callback as props, re-synchronizes the overlays
//! whenever the route or station list identity changes, and forwards clicks.

use std::mem;
use std::rc::Rc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::click::{ClickForwarder, MapClickCallback};
use crate::directions::DirectionsProvider;
use crate::map::{MapClickEvent, MapHandle, MapOptions, MapSurface};
use crate::models::{Route, Scene, Station};
use crate::reconciler::OverlayReconciler;
use crate::resolver::SceneResolver;

#[derive(Default)]
pub struct RouteMapProps {
    pub route: Option<Rc<Route>>,
    pub stations: Option<Rc<[Station]>>,
    pub on_map_click: Option<MapClickCallback>,
}

pub struct RouteMap<S: MapSurface, D> {
    reconciler: OverlayReconciler<S, D>,
    clicks: ClickForwarder,
    scene: Scene,
    options: MapOptions,
    surface: Option<MapHandle<S>>,
    pending: Vec<JoinHandle<()>>,
}

impl<S, D> RouteMap<S, D>
where
    S: MapSurface + 'static,
    D: DirectionsProvider + 'static,
{
    /// Create an unmounted map; nothing is drawn until [`Self::on_map_load`]
    pub fn new(props: RouteMapProps, resolver: SceneResolver<D>, options: MapOptions) -> Self {
        Self {
            reconciler: OverlayReconciler::new(resolver),
            clicks: ClickForwarder::new(props.on_map_click),
            scene: Scene {
                route: props.route,
                stations: props.stations,
            },
            options,
            surface: None,
            pending: Vec::new(),
        }
    }

    /// The map surface became available: position it and draw the current scene
    pub fn on_map_load(&mut self, surface: MapHandle<S>) {
        surface.borrow_mut().configure(&self.options);
        info!(
            "Map loaded at {} (zoom {})",
            self.options.viewport.center.format_coordinates(),
            self.options.viewport.zoom
        );
        self.surface = Some(surface);
        self.resync();
    }

    /// Replace route and stations
    ///
    /// Overlays are re-synchronized only when either prop is a different
    /// allocation than before. Returns whether the scene changed.
    pub fn set_props(
        &mut self,
        route: Option<Rc<Route>>,
        stations: Option<Rc<[Station]>>,
    ) -> bool {
        let next = Scene { route, stations };
        if next.same_identity(&self.scene) {
            return false;
        }
        self.scene = next;
        self.resync();
        true
    }

    pub fn set_on_map_click(&mut self, callback: Option<MapClickCallback>) {
        self.clicks.set_callback(callback);
    }

    /// Forward a raw click from the map widget to the host callback
    pub fn handle_click(&self, event: &MapClickEvent) -> bool {
        self.clicks.handle_click(event)
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn surface(&self) -> Option<&MapHandle<S>> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn reconciler(&self) -> &OverlayReconciler<S, D> {
        &self.reconciler
    }

    /// Number of route resolutions that have not completed yet
    #[must_use]
    pub fn pending_resolutions(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every route resolution started so far
    pub async fn settle(&mut self) {
        for result in join_all(mem::take(&mut self.pending)).await {
            if let Err(e) = result {
                warn!("Route resolution task failed: {}", e);
            }
        }
    }

    /// Remove every overlay from the surface and stop pending resolutions
    pub fn unmount(mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
        if let Some(surface) = self.surface.take() {
            self.reconciler.teardown(&surface);
            debug!("Route map unmounted");
        }
    }

    fn resync(&mut self) {
        let Some(surface) = &self.surface else {
            debug!("Map not loaded yet, deferring sync");
            return;
        };
        self.pending.retain(|h| !h.is_finished());
        if let Some(handle) = self.reconciler.sync(&self.scene, surface) {
            self.pending.push(handle);
        }
    }
}
