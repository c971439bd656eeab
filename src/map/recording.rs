//! Headless map surface
//!
//! Keeps every overlay in an in-memory table instead of drawing it. Used by
//! the CLI to report what a map would show, and by tests to observe the
//! reconciler.

use tracing::{trace, warn};

use super::{
    MapOptions, MapSurface, MarkerOptions, MarkerStyle, PathRendererOptions, RenderablePath,
    Viewport,
};
use crate::models::GeoPoint;

/// Slot index of a marker in the surface's table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(usize);

/// Slot index of a path renderer in the surface's table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(usize);

#[derive(Debug, Clone)]
pub struct RecordedRenderer {
    pub options: PathRendererOptions,
    pub directions: Option<RenderablePath>,
    /// How many times directions were set
    pub updates: usize,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    markers: Vec<Option<MarkerOptions>>,
    renderers: Vec<Option<RecordedRenderer>>,
    options: Option<MapOptions>,
    orphaned_updates: usize,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently on the map, in creation order
    pub fn live_markers(&self) -> impl Iterator<Item = &MarkerOptions> {
        self.markers.iter().flatten()
    }

    pub fn live_marker_ids(&self) -> impl Iterator<Item = (MarkerId, &MarkerOptions)> {
        self.markers
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|m| (MarkerId(i), m)))
    }

    #[must_use]
    pub fn live_marker_count(&self) -> usize {
        self.live_markers().count()
    }

    /// Markers ever created, including removed ones
    #[must_use]
    pub fn created_marker_count(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn markers_at(&self, position: &GeoPoint) -> Vec<&MarkerOptions> {
        self.live_markers()
            .filter(|m| &m.position == position)
            .collect()
    }

    #[must_use]
    pub fn markers_with_style(&self, style: MarkerStyle) -> Vec<&MarkerOptions> {
        self.live_markers().filter(|m| m.style == style).collect()
    }

    #[must_use]
    pub fn marker(&self, id: MarkerId) -> Option<&MarkerOptions> {
        self.markers.get(id.0).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn live_renderer_count(&self) -> usize {
        self.renderers.iter().flatten().count()
    }

    #[must_use]
    pub fn renderer(&self, id: RendererId) -> Option<&RecordedRenderer> {
        self.renderers.get(id.0).and_then(Option::as_ref)
    }

    /// Path shown by the first live renderer
    #[must_use]
    pub fn displayed_path(&self) -> Option<&RenderablePath> {
        self.renderers
            .iter()
            .flatten()
            .next()
            .and_then(|r| r.directions.as_ref())
    }

    /// Directions set on renderers that were already removed
    #[must_use]
    pub fn orphaned_updates(&self) -> usize {
        self.orphaned_updates
    }

    #[must_use]
    pub fn options(&self) -> Option<&MapOptions> {
        self.options.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Option<&Viewport> {
        self.options.as_ref().map(|o| &o.viewport)
    }
}

impl MapSurface for RecordingSurface {
    type Marker = MarkerId;
    type PathRenderer = RendererId;

    fn create_marker(&mut self, options: MarkerOptions) -> MarkerId {
        trace!(title = %options.title, "Placing marker at {}", options.position.format_coordinates());
        self.markers.push(Some(options));
        MarkerId(self.markers.len() - 1)
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        if let Some(slot) = self.markers.get_mut(marker.0) {
            *slot = None;
        }
    }

    fn create_path_renderer(&mut self, options: PathRendererOptions) -> RendererId {
        self.renderers.push(Some(RecordedRenderer {
            options,
            directions: None,
            updates: 0,
        }));
        RendererId(self.renderers.len() - 1)
    }

    fn set_directions(&mut self, renderer: &RendererId, path: RenderablePath) {
        match self.renderers.get_mut(renderer.0) {
            Some(Some(recorded)) => {
                recorded.directions = Some(path);
                recorded.updates += 1;
            }
            _ => {
                warn!("Directions set on removed path renderer {}", renderer.0);
                self.orphaned_updates += 1;
            }
        }
    }

    fn remove_path_renderer(&mut self, renderer: RendererId) {
        if let Some(slot) = self.renderers.get_mut(renderer.0) {
            *slot = None;
        }
    }

    fn configure(&mut self, options: &MapOptions) {
        self.options = Some(options.clone());
    }
}
