//! Text rendering of a computed route

use std::fmt::Display;

use crate::models::{Route, Station};

/// `"{h}h {m}m"`, seconds truncated
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    format!("{hours}h {minutes}m")
}

#[must_use]
pub fn format_distance(meters: f64) -> String {
    format!("{:.1} km", meters / 1000.0)
}

#[must_use]
pub fn format_emission(grams: f64) -> String {
    format!("{grams:.1} g")
}

/// Route totals, segments and nearby stations, one item per line
pub struct RouteSummary<'a> {
    pub route: &'a Route,
    pub stations: &'a [Station],
}

impl<'a> RouteSummary<'a> {
    #[must_use]
    pub fn new(route: &'a Route, stations: &'a [Station]) -> Self {
        Self { route, stations }
    }
}

impl Display for RouteSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let route = self.route;
        writeln!(f, "Route Summary")?;
        writeln!(
            f,
            "   Total Distance: {}",
            format_distance(route.total_distance_meters)
        )?;
        writeln!(
            f,
            "   Total Duration: {}",
            format_duration(route.total_duration_seconds)
        )?;
        writeln!(
            f,
            "   CO2 Emissions: {}",
            format_emission(route.total_co2_grams)
        )?;

        if !route.segments.is_empty() {
            writeln!(f, "Route Segments")?;
            for segment in &route.segments {
                writeln!(
                    f,
                    "   {} {} ({}, {} CO2)",
                    segment.mode.label(),
                    format_distance(segment.distance_meters),
                    format_duration(segment.duration_seconds),
                    format_emission(segment.co2_grams)
                )?;
            }
        }

        if !self.stations.is_empty() {
            writeln!(f, "Nearby Charging Stations")?;
            for station in self.stations {
                writeln!(f, "   {}", station.title)?;
                if !station.address.is_empty() {
                    writeln!(f, "      {}", station.address)?;
                }
                if !station.usage_type_title.is_empty() {
                    writeln!(f, "      Usage: {}", station.usage_type_title)?;
                }
                for connection in &station.connections {
                    writeln!(
                        f,
                        "      {} - {} kW",
                        connection.connector_type_title, connection.power_kw
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Connection, GeoPoint, RouteSegment, TransportMode};
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0h 0m")]
    #[case(59.0, "0h 0m")]
    #[case(3_660.0, "1h 1m")]
    #[case(9_000.9, "2h 30m")]
    fn test_format_duration(#[case] seconds: f64, #[case] expected: &str) {
        assert_eq!(format_duration(seconds), expected);
    }

    #[rstest]
    #[case(0.0, "0.0 km")]
    #[case(14_260.0, "14.3 km")]
    #[case(999.0, "1.0 km")]
    fn test_format_distance(#[case] meters: f64, #[case] expected: &str) {
        assert_eq!(format_distance(meters), expected);
    }

    #[test]
    fn test_summary_lists_segments_and_stations() {
        let start = GeoPoint::new(37.0, -122.0);
        let end = GeoPoint::new(37.1, -122.1);
        let mut route = Route::between(start.clone(), end.clone());
        route.segments.push(RouteSegment {
            start,
            end: end.clone(),
            mode: TransportMode::PublicTransit,
            duration_seconds: 1_800.0,
            distance_meters: 12_000.0,
            co2_grams: 720.0,
        });
        route.total_distance_meters = 12_000.0;
        route.total_duration_seconds = 1_800.0;
        route.total_co2_grams = 720.0;

        let stations = vec![Station {
            id: 3,
            title: "Depot".to_string(),
            address: "1 Depot Rd".to_string(),
            location: end,
            connections: vec![Connection {
                connector_type_title: "CCS".to_string(),
                power_kw: 150.0,
            }],
            usage_type_title: "Public".to_string(),
        }];

        let text = RouteSummary::new(&route, &stations).to_string();
        assert!(text.contains("Total Distance: 12.0 km"));
        assert!(text.contains("Total Duration: 0h 30m"));
        assert!(text.contains("CO2 Emissions: 720.0 g"));
        assert!(text.contains("public transit 12.0 km (0h 30m, 720.0 g CO2)"));
        assert!(text.contains("Depot"));
        assert!(text.contains("CCS - 150 kW"));
    }

    #[test]
    fn test_summary_without_stations_has_no_station_section() {
        let route = Route::between(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0));
        let text = RouteSummary::new(&route, &[]).to_string();
        assert!(!text.contains("Charging Stations"));
        assert!(!text.contains("Route Segments"));
    }
}
