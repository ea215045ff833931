use crate::core::bounds::Bounds;
use geo_types::{Coord, LineString, Polygon};

/// Builds the closed rectangle for a cell, x = longitude, y = latitude.
///
/// Vertices run top-left, top-right, bottom-right, bottom-left, then repeat
/// the first to close the ring.
pub fn create_cell_polygon(bounds: &Bounds) -> Polygon<f64> {
    let mut coords = Vec::with_capacity(5);
    coords.push(Coord {
        x: bounds.lon_min,
        y: bounds.lat_max,
    });
    coords.push(Coord {
        x: bounds.lon_max,
        y: bounds.lat_max,
    });
    coords.push(Coord {
        x: bounds.lon_max,
        y: bounds.lat_min,
    });
    coords.push(Coord {
        x: bounds.lon_min,
        y: bounds.lat_min,
    });
    coords.push(coords[0]);

    Polygon::new(LineString::from(coords), vec![])
}
