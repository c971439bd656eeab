//! Map click forwarding

use std::fmt::Debug;

use tracing::trace;

use crate::map::MapClickEvent;

/// Host callback receiving `(latitude, longitude)` of a map click
pub type MapClickCallback = Box<dyn Fn(f64, f64)>;

/// Forwards map clicks to an optional host callback
#[derive(Default)]
pub struct ClickForwarder {
    callback: Option<MapClickCallback>,
}

impl ClickForwarder {
    #[must_use]
    pub fn new(callback: Option<MapClickCallback>) -> Self {
        Self { callback }
    }

    pub fn set_callback(&mut self, callback: Option<MapClickCallback>) {
        self.callback = callback;
    }

    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Invoke the callback for a click that landed on the map
    ///
    /// Returns whether the callback was called.
    pub fn handle_click(&self, event: &MapClickEvent) -> bool {
        match (&self.callback, event.lat_lng) {
            (Some(callback), Some((lat, lng))) => {
                trace!(lat, lng, "Forwarding map click");
                callback(lat, lng);
                true
            }
            _ => false,
        }
    }
}

impl Debug for ClickForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickForwarder")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_callback() -> (MapClickCallback, Rc<RefCell<Vec<(f64, f64)>>>) {
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        let callback: MapClickCallback = Box::new(move |lat, lng| sink.borrow_mut().push((lat, lng)));
        (callback, clicks)
    }

    #[test]
    fn test_click_forwarded_once() {
        let (callback, clicks) = recording_callback();
        let forwarder = ClickForwarder::new(Some(callback));

        assert!(forwarder.handle_click(&MapClickEvent::at(40.0, -74.0)));
        assert_eq!(*clicks.borrow(), vec![(40.0, -74.0)]);
    }

    #[test]
    fn test_click_without_callback_is_ignored() {
        let forwarder = ClickForwarder::default();
        assert!(!forwarder.handle_click(&MapClickEvent::at(40.0, -74.0)));
    }

    #[test]
    fn test_click_off_map_is_ignored() {
        let (callback, clicks) = recording_callback();
        let forwarder = ClickForwarder::new(Some(callback));

        assert!(!forwarder.handle_click(&MapClickEvent::default()));
        assert!(clicks.borrow().is_empty());
    }

    #[test]
    fn test_callback_can_be_replaced() {
        let (first, first_clicks) = recording_callback();
        let (second, second_clicks) = recording_callback();
        let mut forwarder = ClickForwarder::new(Some(first));
        forwarder.set_callback(Some(second));

        forwarder.handle_click(&MapClickEvent::at(1.0, 2.0));
        assert!(first_clicks.borrow().is_empty());
        assert_eq!(second_clicks.borrow().len(), 1);
        assert_eq!(format!("{forwarder:?}"), "ClickForwarder { callback: true }");
    }
}
