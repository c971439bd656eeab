//! Charging station model

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A single connector offered by a station
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub connector_type_title: String,
    pub power_kw: f64,
}

/// A charging station along a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StationWire", into = "StationWire")]
pub struct Station {
    pub id: i64,
    pub title: String,
    pub address: String,
    pub location: GeoPoint,
    pub connections: Vec<Connection>,
    pub usage_type_title: String,
}

impl Station {
    /// Highest connector power in kW, if the station lists any connector
    #[must_use]
    pub fn max_power_kw(&self) -> Option<f64> {
        self.connections.iter().map(|c| c.power_kw).reduce(f64::max)
    }
}

// The backend forwards the station registry's nested layout unchanged.

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StationWire {
    id: i64,
    address_info: AddressInfoWire,
    #[serde(default)]
    connections: Vec<ConnectionWire>,
    #[serde(default)]
    usage_type: Option<TitleWire>,
}

#[derive(Serialize, Deserialize)]
struct AddressInfoWire {
    title: String,
    #[serde(default)]
    address: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionWire {
    connection_type: TitleWire,
    #[serde(rename = "powerKW", default)]
    power_kw: f64,
}

#[derive(Serialize, Deserialize)]
struct TitleWire {
    title: String,
}

impl From<StationWire> for Station {
    fn from(wire: StationWire) -> Self {
        let address = wire.address_info.address;
        Self {
            id: wire.id,
            title: wire.address_info.title,
            location: GeoPoint {
                latitude: wire.address_info.latitude,
                longitude: wire.address_info.longitude,
                address: (!address.is_empty()).then(|| address.clone()),
            },
            address,
            connections: wire
                .connections
                .into_iter()
                .map(|c| Connection {
                    connector_type_title: c.connection_type.title,
                    power_kw: c.power_kw,
                })
                .collect(),
            usage_type_title: wire.usage_type.map(|u| u.title).unwrap_or_default(),
        }
    }
}

impl From<Station> for StationWire {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            address_info: AddressInfoWire {
                title: station.title,
                address: station.address,
                latitude: station.location.latitude,
                longitude: station.location.longitude,
            },
            connections: station
                .connections
                .into_iter()
                .map(|c| ConnectionWire {
                    connection_type: TitleWire {
                        title: c.connector_type_title,
                    },
                    power_kw: c.power_kw,
                })
                .collect(),
            usage_type: Some(TitleWire {
                title: station.usage_type_title,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATION_JSON: &str = r#"{
        "id": 4211,
        "addressInfo": {
            "title": "Civic Center Garage",
            "address": "355 McAllister St",
            "latitude": 37.7808,
            "longitude": -122.4177
        },
        "connections": [
            {"connectionType": {"title": "CCS (Type 1)"}, "powerKW": 50.0},
            {"connectionType": {"title": "J1772"}, "powerKW": 7.2}
        ],
        "usageType": {"title": "Public"}
    }"#;

    #[test]
    fn test_station_from_registry_layout() {
        let station: Station = serde_json::from_str(STATION_JSON).unwrap();
        assert_eq!(station.id, 4211);
        assert_eq!(station.title, "Civic Center Garage");
        assert_eq!(station.location, GeoPoint::new(37.7808, -122.4177));
        assert_eq!(station.connections.len(), 2);
        assert_eq!(station.connections[0].connector_type_title, "CCS (Type 1)");
        assert_eq!(station.usage_type_title, "Public");
        assert_eq!(station.max_power_kw(), Some(50.0));
    }

    #[test]
    fn test_station_serializes_back_to_registry_layout() {
        let station: Station = serde_json::from_str(STATION_JSON).unwrap();
        let value = serde_json::to_value(&station).unwrap();
        assert_eq!(value["addressInfo"]["title"], "Civic Center Garage");
        assert_eq!(value["connections"][1]["powerKW"], 7.2);
        assert_eq!(value["usageType"]["title"], "Public");
    }

    #[test]
    fn test_station_without_connections() {
        let json = r#"{"id": 1, "addressInfo": {"title": "Lot", "latitude": 1.0, "longitude": 2.0}}"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert!(station.connections.is_empty());
        assert_eq!(station.max_power_kw(), None);
        assert!(station.usage_type_title.is_empty());
        assert!(station.location.address.is_none());
    }
}
