use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the coordinate as a `geo_types::Point` with x = longitude, y = latitude.
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.7}, {:.7}", self.latitude, self.longitude)
    }
}

impl From<Point<f64>> for LatLon {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// Trait for types that can provide a latitude and longitude.
///
/// Implemented for [`LatLon`], `geo_types::Point<f64>` and `geo_types::Coord<f64>`.
/// The `geo_types` impls follow the GeoJSON/WKT axis order: x is longitude,
/// y is latitude.
pub trait Coordinate {
    /// Returns the latitude in decimal degrees.
    fn latitude(&self) -> f64;
    /// Returns the longitude in decimal degrees.
    fn longitude(&self) -> f64;
}

impl Coordinate for LatLon {
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Coordinate for Point<f64> {
    fn latitude(&self) -> f64 {
        self.y()
    }
    fn longitude(&self) -> f64 {
        self.x()
    }
}

impl Coordinate for Coord<f64> {
    fn latitude(&self) -> f64 {
        self.y
    }
    fn longitude(&self) -> f64 {
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, point};

    #[test]
    fn test_coordinate_trait_latlon() {
        let c = LatLon::new(13.0, 77.5);
        assert_eq!(c.latitude(), 13.0);
        assert_eq!(c.longitude(), 77.5);
    }

    #[test]
    fn test_coordinate_trait_point_axis_order() {
        let pt = point! { x: 77.5, y: 13.0 };
        assert_eq!(pt.latitude(), 13.0);
        assert_eq!(pt.longitude(), 77.5);

        let c = coord! { x: 77.5, y: 13.0 };
        assert_eq!(c.latitude(), 13.0);
        assert_eq!(c.longitude(), 77.5);
    }

    #[test]
    fn test_point_conversion() {
        let c = LatLon::new(13.006003, 77.751144);
        let back = LatLon::from(c.to_point());
        assert_eq!(c, back);
    }

    #[test]
    fn test_display_seven_decimals() {
        let c = LatLon::new(13.0, 77.5);
        assert_eq!(c.to_string(), "13.0000000, 77.5000000");
    }
}
