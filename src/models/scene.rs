//! The declarative description the map is kept in sync with

use std::rc::Rc;

use super::{Route, Station};

/// Route and stations to render
///
/// Both parts are reference counted so hosts can detect a change by
/// identity instead of comparing whole routes.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub route: Option<Rc<Route>>,
    pub stations: Option<Rc<[Station]>>,
}

impl Scene {
    #[must_use]
    pub fn new(route: Option<Route>, stations: Vec<Station>) -> Self {
        Self {
            route: route.map(Rc::new),
            stations: Some(stations.into()),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        self.route.as_deref()
    }

    /// Stations in input order; empty when absent
    #[must_use]
    pub fn stations(&self) -> &[Station] {
        self.stations.as_deref().unwrap_or(&[])
    }

    /// Number of point markers a full render of this scene produces
    #[must_use]
    pub fn marker_count(&self) -> usize {
        let endpoints = if self.route.is_some() { 2 } else { 0 };
        endpoints + self.stations().len()
    }

    /// True when both parts are the very same allocations (or both absent)
    #[must_use]
    pub fn same_identity(&self, other: &Scene) -> bool {
        let route_same = match (&self.route, &other.route) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        let stations_same = match (&self.stations, &other.stations) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        route_same && stations_same
    }
}
