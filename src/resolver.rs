//! Scene resolution
//!
//! Turns a route's two endpoints into a [`RenderablePath`] through a
//! [`DirectionsProvider`]. Resolutions run as local tasks and hand their
//! result to an apply callback; failures never reach the caller.
//!
//! Superseded requests are not cancelled. With [`ResolutionOrdering::Sequenced`] each
//! request carries a sequence number and a result older than the last one
//! applied is dropped. [`ResolutionOrdering::LastCallbackWins`] applies every
//! successful result in completion order, so a slow stale request can
//! overwrite a newer path.
//!
//! [`SceneResolver::revoke_pending`] retires every request issued so far:
//! their results are dropped in either ordering.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::directions::{DirectionsProvider, DirectionsStatus, TravelMode};
use crate::map::RenderablePath;
use crate::models::{GeoPoint, Route};

/// How completions of overlapping resolutions are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOrdering {
    #[default]
    Sequenced,
    LastCallbackWins,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error("directions request returned status {0}")]
    Status(DirectionsStatus),
    #[error("directions request returned OK without a path")]
    MissingPath,
}

pub type DiagnosticHook = Rc<dyn Fn(&ResolutionError)>;

/// Sequence numbers of issued and applied resolutions
#[derive(Debug, Default)]
struct ResolutionSlot {
    issued: Cell<u64>,
    applied: Cell<u64>,
    /// Requests at or below this sequence are never applied
    revoked: Cell<u64>,
}

impl ResolutionSlot {
    fn issue(&self) -> u64 {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        next
    }

    fn revoke(&self) {
        self.revoked.set(self.issued.get());
    }

    fn admit(&self, sequence: u64, ordering: ResolutionOrdering) -> bool {
        if sequence <= self.revoked.get() {
            return false;
        }
        match ordering {
            ResolutionOrdering::LastCallbackWins => {
                self.applied.set(sequence);
                true
            }
            ResolutionOrdering::Sequenced if sequence >= self.applied.get() => {
                self.applied.set(sequence);
                true
            }
            ResolutionOrdering::Sequenced => false,
        }
    }
}

pub struct SceneResolver<D> {
    provider: Rc<D>,
    ordering: ResolutionOrdering,
    slot: Rc<ResolutionSlot>,
    on_error: Option<DiagnosticHook>,
}

impl<D: DirectionsProvider + 'static> SceneResolver<D> {
    pub fn new(provider: D, ordering: ResolutionOrdering) -> Self {
        Self {
            provider: Rc::new(provider),
            ordering,
            slot: Rc::new(ResolutionSlot::default()),
            on_error: None,
        }
    }

    /// Report swallowed resolution failures to `hook`
    #[must_use]
    pub fn with_diagnostics(mut self, hook: impl Fn(&ResolutionError) + 'static) -> Self {
        self.on_error = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn ordering(&self) -> ResolutionOrdering {
        self.ordering
    }

    /// Sequence number of the most recently issued resolution
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.slot.issued.get()
    }

    /// Sequence number of the most recently applied resolution
    #[must_use]
    pub fn applied(&self) -> u64 {
        self.slot.applied.get()
    }

    /// Drop the results of every resolution issued so far
    ///
    /// Must be called before the target of their apply callbacks goes away.
    pub fn revoke_pending(&self) {
        if self.slot.issued.get() > self.slot.revoked.get() {
            debug!(
                issued = self.slot.issued.get(),
                "Revoking outstanding route resolutions"
            );
        }
        self.slot.revoke();
    }

    /// Resolve the route's geometry once, without applying it anywhere
    pub async fn resolve_path(&self, route: &Route) -> Result<RenderablePath, ResolutionError> {
        request(self.provider.as_ref(), &route.start, &route.end).await
    }

    /// Start resolving `route` and call `apply` with the path on success
    ///
    /// Travel mode is always driving, whatever the segments say. Failures
    /// and superseded results are dropped silently.
    ///
    /// # Panics
    /// Must be called from within a [`tokio::task::LocalSet`].
    pub fn resolve<F>(&self, route: &Route, apply: F) -> JoinHandle<()>
    where
        F: FnOnce(RenderablePath) + 'static,
    {
        let sequence = self.slot.issue();
        let provider = Rc::clone(&self.provider);
        let slot = Rc::clone(&self.slot);
        let ordering = self.ordering;
        let on_error = self.on_error.clone();
        let origin = route.start.coordinates_only();
        let destination = route.end.coordinates_only();

        tokio::task::spawn_local(async move {
            match request(provider.as_ref(), &origin, &destination).await {
                Ok(path) => {
                    if slot.admit(sequence, ordering) {
                        apply(path);
                    } else {
                        debug!(
                            sequence,
                            applied = slot.applied.get(),
                            "Dropping superseded or revoked route resolution"
                        );
                    }
                }
                Err(e) => {
                    debug!(sequence, "Route resolution failed: {}", e);
                    if let Some(hook) = on_error {
                        hook(&e);
                    }
                }
            }
        })
    }
}

async fn request<D: DirectionsProvider>(
    provider: &D,
    origin: &GeoPoint,
    destination: &GeoPoint,
) -> Result<RenderablePath, ResolutionError> {
    let response = provider
        .route(origin, destination, TravelMode::Driving)
        .await;
    match response.status {
        DirectionsStatus::Ok => response.path.ok_or(ResolutionError::MissingPath),
        status => Err(ResolutionError::Status(status)),
    }
}
