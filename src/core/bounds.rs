use crate::core::constants::{GRID_SIZE, LAT_MAX, LAT_MIN, LON_MAX, LON_MIN};
use crate::core::geometry::create_cell_polygon;
use crate::util::coord::{Coordinate, LatLon};
use geo_types::{Coord, Polygon, Rect, coord};

/// A latitude/longitude rectangle being subdivided.
///
/// Every encode and decode starts from [`Bounds::REGION`] and replaces it with
/// the selected sub-cell once per level, so a `Bounds` is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Bounds {
    /// The full DIGIPIN region.
    pub const REGION: Bounds = Bounds {
        lat_min: LAT_MIN,
        lat_max: LAT_MAX,
        lon_min: LON_MIN,
        lon_max: LON_MAX,
    };

    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Height of one of the 16 sub-cells.
    pub fn lat_step(&self) -> f64 {
        (self.lat_max - self.lat_min) / GRID_SIZE as f64
    }

    /// Width of one of the 16 sub-cells.
    pub fn lon_step(&self) -> f64 {
        (self.lon_max - self.lon_min) / GRID_SIZE as f64
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Symbol-grid row for a latitude inside these bounds.
    ///
    /// The latitude band counts up from the southern edge while grid rows count
    /// down from the northern edge, so the band index is inverted. A latitude
    /// exactly on a band edge belongs to the band above it.
    pub fn latitude_row(&self, latitude: f64) -> usize {
        let band = band_index(latitude - self.lat_min, self.lat_step());
        (GRID_SIZE - 1) - band
    }

    /// Symbol-grid column for a longitude inside these bounds.
    pub fn longitude_col(&self, longitude: f64) -> usize {
        band_index(longitude - self.lon_min, self.lon_step())
    }

    /// Returns the `(row, col)` of the sub-cell containing the coordinate.
    pub fn locate(&self, latitude: f64, longitude: f64) -> (usize, usize) {
        (self.latitude_row(latitude), self.longitude_col(longitude))
    }

    /// Returns the sub-cell at `(row, col)`.
    ///
    /// All four edges are computed from the current bounds, never from a
    /// previously narrowed edge.
    pub fn narrow(&self, row: usize, col: usize) -> Bounds {
        debug_assert!(row < GRID_SIZE && col < GRID_SIZE);
        let lat_step = self.lat_step();
        let lon_step = self.lon_step();

        Bounds {
            lat_min: self.lat_min + lat_step * (GRID_SIZE - 1 - row) as f64,
            lat_max: self.lat_min + lat_step * (GRID_SIZE - row) as f64,
            lon_min: self.lon_min + lon_step * col as f64,
            lon_max: self.lon_min + lon_step * (col + 1) as f64,
        }
    }

    /// Midpoint of the rectangle.
    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// Closed containment test.
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        (self.lat_min..=self.lat_max).contains(&coord.latitude())
            && (self.lon_min..=self.lon_max).contains(&coord.longitude())
    }

    /// True when the interiors overlap; shared edges alone do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.lat_min < other.lat_max
            && self.lat_max > other.lat_min
            && self.lon_min < other.lon_max
            && self.lon_max > other.lon_min
    }

    /// Overlapping part of two bounds, if their interiors intersect.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        if !self.intersects(other) {
            return None;
        }
        Some(Bounds {
            lat_min: self.lat_min.max(other.lat_min),
            lat_max: self.lat_max.min(other.lat_max),
            lon_min: self.lon_min.max(other.lon_min),
            lon_max: self.lon_max.min(other.lon_max),
        })
    }

    /// Clips the segment `start..end` (x = longitude) to these bounds.
    ///
    /// Returns `None` when the segment misses the bounds or has a non-finite
    /// coordinate. Clipped endpoints are clamped onto the edges.
    pub fn clip_segment(
        &self,
        start: Coord<f64>,
        end: Coord<f64>,
    ) -> Option<(Coord<f64>, Coord<f64>)> {
        if ![start.x, start.y, end.x, end.y].iter().all(|v| v.is_finite()) {
            return None;
        }

        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;

        // Liang-Barsky: (p, q) per edge, left, right, bottom, top
        for (p, q) in [
            (-dx, start.x - self.lon_min),
            (dx, self.lon_max - start.x),
            (-dy, start.y - self.lat_min),
            (dy, self.lat_max - start.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    t0 = t0.max(t);
                } else {
                    t1 = t1.min(t);
                }
            }
        }

        if t0 > t1 {
            return None;
        }

        let at = |t: f64| coord! {
            x: (start.x + t * dx).clamp(self.lon_min, self.lon_max),
            y: (start.y + t * dy).clamp(self.lat_min, self.lat_max),
        };
        Some((at(t0), at(t1)))
    }

    /// Returns the bounds as a `geo_types::Rect` with x = longitude.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.lon_min, y: self.lat_min },
            coord! { x: self.lon_max, y: self.lat_max },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        create_cell_polygon(self)
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Bounds::new(rect.min().y, rect.max().y, rect.min().x, rect.max().x)
    }
}

fn band_index(offset: f64, step: f64) -> usize {
    (offset / step).floor().clamp(0.0, (GRID_SIZE - 1) as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_row_is_inverted() {
        let b = Bounds::REGION;
        // Southernmost band is the bottom row of the table
        assert_eq!(b.latitude_row(3.0), 3);
        // Northernmost band is the top row
        assert_eq!(b.latitude_row(38.0), 0);
        assert_eq!(b.latitude_row(15.0), 2);
        assert_eq!(b.latitude_row(25.0), 1);
    }

    #[test]
    fn test_band_edges_and_clamping() {
        let b = Bounds::REGION;
        // 11.5 is the edge between the two southern bands
        assert_eq!(b.latitude_row(11.5), 2);
        assert_eq!(b.latitude_row(LAT_MIN), 3);
        assert_eq!(b.latitude_row(LAT_MAX), 0);
        assert_eq!(b.longitude_col(72.5), 1);
        assert_eq!(b.longitude_col(LON_MIN), 0);
        assert_eq!(b.longitude_col(LON_MAX), 3);
    }

    #[test]
    fn test_narrow_selects_exact_cell() {
        let b = Bounds::REGION;

        let top_left = b.narrow(0, 0);
        assert_eq!(top_left, Bounds::new(29.5, 38.5, 63.5, 72.5));

        let bottom_right = b.narrow(3, 3);
        assert_eq!(bottom_right, Bounds::new(2.5, 11.5, 90.5, 99.5));

        let inner = b.narrow(1, 2);
        assert_eq!(inner, Bounds::new(20.5, 29.5, 81.5, 90.5));
    }

    #[test]
    fn test_narrow_contains_located_point() {
        let b = Bounds::REGION;
        let pt = LatLon::new(13.006003, 77.751144);
        let (row, col) = b.locate(pt.latitude, pt.longitude);
        assert!(b.narrow(row, col).contains(&pt));
    }

    #[test]
    fn test_center() {
        let c = Bounds::REGION.center();
        assert_eq!(c, LatLon::new(20.5, 81.5));
    }

    #[test]
    fn test_intersection() {
        let a = Bounds::new(0.0, 10.0, 0.0, 10.0);
        let b = Bounds::new(5.0, 15.0, 5.0, 15.0);
        assert_eq!(a.intersection(&b), Some(Bounds::new(5.0, 10.0, 5.0, 10.0)));

        let edge = Bounds::new(10.0, 20.0, 0.0, 10.0);
        assert!(!a.intersects(&edge));
        assert_eq!(a.intersection(&edge), None);
    }

    #[test]
    fn test_rect_round_trip() {
        let b = Bounds::new(2.5, 11.5, 90.5, 99.5);
        assert_eq!(Bounds::from(b.to_rect()), b);
    }

    #[test]
    fn test_clip_segment_crossing_region() {
        let b = Bounds::REGION;
        let clipped = b.clip_segment(coord! { x: -1.0e6, y: 20.0 }, coord! { x: 1.0e6, y: 20.0 });
        let Some((start, end)) = clipped else {
            panic!("segment crosses the region");
        };
        assert!((start.x - LON_MIN).abs() < 1e-6);
        assert!((end.x - LON_MAX).abs() < 1e-6);
        assert_eq!(start.y, 20.0);
        assert!(b.contains(&start) && b.contains(&end));
    }

    #[test]
    fn test_clip_segment_inside_is_unchanged() {
        let start = coord! { x: 77.5, y: 13.0 };
        let end = coord! { x: 77.6, y: 13.1 };
        let Some((a, b)) = Bounds::REGION.clip_segment(start, end) else {
            panic!("segment lies inside the region");
        };
        assert_eq!(a, start);
        assert!((b.x - end.x).abs() < 1e-12 && (b.y - end.y).abs() < 1e-12);
    }

    #[test]
    fn test_clip_segment_outside_or_non_finite() {
        let b = Bounds::REGION;
        assert_eq!(
            b.clip_segment(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0e300, y: 0.0 }),
            None
        );
        assert_eq!(
            b.clip_segment(coord! { x: -0.1, y: 51.5 }, coord! { x: 0.1, y: 51.6 }),
            None
        );
        assert_eq!(
            b.clip_segment(coord! { x: 77.0, y: 13.0 }, coord! { x: f64::INFINITY, y: 13.0 }),
            None
        );
        assert_eq!(
            b.clip_segment(coord! { x: f64::NAN, y: 13.0 }, coord! { x: 77.0, y: 13.0 }),
            None
        );
    }
}
