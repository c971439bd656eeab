//! Geographic point model

use serde::{Deserialize, Serialize};

/// A point on the map
///
/// Equality compares coordinates only; the address is descriptive.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Human readable address, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl GeoPoint {
    /// Create a new point without an address
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }

    /// Create a point with a descriptive address
    #[must_use]
    pub fn with_address(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: Some(address.into()),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// `lat,lng` with full precision, as routing services expect it
    #[must_use]
    pub fn to_query_point(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Same coordinates, address dropped
    #[must_use]
    pub fn coordinates_only(&self) -> Self {
        Self::new(self.latitude, self.longitude)
    }
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_address() {
        let plain = GeoPoint::new(37.7749, -122.4194);
        let named = GeoPoint::with_address(37.7749, -122.4194, "San Francisco, CA");
        assert_eq!(plain, named);
        assert_ne!(plain, GeoPoint::new(37.775, -122.4194));
    }

    #[test]
    fn test_format_coordinates() {
        let point = GeoPoint::new(46.818_234, 8.227_456);
        assert_eq!(point.format_coordinates(), "46.8182, 8.2275");
        assert_eq!(point.to_query_point(), "46.818234,8.227456");
    }

    #[test]
    fn test_address_is_optional_on_the_wire() {
        let point: GeoPoint = serde_json::from_str(r#"{"latitude":1.5,"longitude":2.5}"#).unwrap();
        assert_eq!(point, GeoPoint::new(1.5, 2.5));
        assert!(point.address.is_none());

        let json = serde_json::to_string(&point).unwrap();
        assert!(!json.contains("address"));
    }
}
