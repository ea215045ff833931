use crate::api::arrow::DigipinCellsToArrow;
use crate::api::parquet::DigipinCellsToGeoParquet;
use crate::core::bounds::Bounds;
use crate::core::codec::{encode_symbols, is_in_region, prefix_bounds, validate_coordinate};
use crate::core::constants::{LAT_SPANS, MAX_LEVEL};
use crate::core::dimensions::{CellDims, cell_dims};
use crate::core::format::{format_symbols, validate_prefix};
use crate::core::grid::grid_cells;
use crate::util::coord::{Coordinate, LatLon};
use crate::util::error::DigipinError;
use crate::util::urls::{apple_maps_url, google_maps_url};
use arrow_array::RecordBatch;
use geo_types::{LineString, Point, Polygon, Rect};
use geoarrow_array::array::{PointArray, PolygonArray};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// A single cell of the DIGIPIN grid at some level.
///
/// A level-`n` cell is identified by the first `n` symbols of the code of any
/// point inside it. Level 10 cells correspond to full DIGIPINs.
///
/// # Example
///
/// ```
/// use digipin_rs::{DigipinCell, LatLon};
///
/// # fn main() -> Result<(), digipin_rs::DigipinError> {
/// let cell = DigipinCell::from_coordinate(&LatLon::new(13.006003, 77.751144), 10)?;
/// assert_eq!(cell.formatted(), "4P3-33C-4635");
///
/// let district = cell.parent().unwrap();
/// assert_eq!(district.code, "4P333C463");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DigipinCell {
    /// Symbols identifying the cell, uppercase and without separators
    pub code: String,
    /// Level (1-10); equal to the number of symbols in `code`
    pub level: u8,
    /// Latitude/longitude extent of the cell
    pub bounds: Bounds,
}

impl DigipinCell {
    pub(crate) fn new(code: String, bounds: Bounds) -> Self {
        let level = code.chars().count() as u8;
        Self {
            code,
            level,
            bounds,
        }
    }

    /// Create the cell at `level` containing a coordinate.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::DigipinCell;
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), digipin_rs::DigipinError> {
    /// // x = longitude, y = latitude
    /// let cell = DigipinCell::from_coordinate(&Point::new(77.751144, 13.006003), 3)?;
    /// assert_eq!(cell.code, "4P3");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_coordinate(coord: &impl Coordinate, level: u8) -> Result<Self, DigipinError> {
        Self::from_lat_lon(coord.latitude(), coord.longitude(), level)
    }

    pub fn from_lat_lon(latitude: f64, longitude: f64, level: u8) -> Result<Self, DigipinError> {
        let code = encode_symbols(latitude, longitude, level)?;
        let bounds = prefix_bounds(&code)?;
        Ok(Self::new(code, bounds))
    }

    /// Create a cell from a code or code prefix (1-10 symbols).
    ///
    /// Separators, whitespace and lowercase are accepted.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::DigipinCell;
    ///
    /// # fn main() -> Result<(), digipin_rs::DigipinError> {
    /// let cell = DigipinCell::from_code("4p3-33")?;
    /// assert_eq!(cell.level, 5);
    /// assert_eq!(cell.formatted(), "4P3-33");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_code(code: &str) -> Result<Self, DigipinError> {
        let symbols = validate_prefix(code)?;
        let bounds = prefix_bounds(&symbols)?;
        Ok(Self::new(symbols, bounds))
    }

    /// Create the cells a line passes through, in order of first visit.
    ///
    /// Each segment is clipped to the DIGIPIN region and sampled at half the
    /// cell height for `level`, so parts of the line outside the region are
    /// ignored. A line that never enters the region is an error, as is an
    /// empty one. A single-coordinate line is treated as a point.
    pub fn from_line_string(line: &LineString, level: u8) -> Result<Vec<Self>, DigipinError> {
        if level == 0 || level > MAX_LEVEL {
            return Err(DigipinError::InvalidLevel(level));
        }
        let first = line.0.first().ok_or_else(|| {
            DigipinError::GeometryParseError("line string has no coordinates".to_string())
        })?;
        if line.0.len() == 1 {
            return Ok(vec![Self::from_lat_lon(first.y, first.x, level)?]);
        }

        let step_size = LAT_SPANS[level as usize] * 0.5;

        let mut seen: HashSet<String> = HashSet::new();
        let mut cells: Vec<DigipinCell> = Vec::new();

        for window in line.0.windows(2) {
            let Some((start, end)) = Bounds::REGION.clip_segment(window[0], window[1]) else {
                continue;
            };

            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let segment_length = (dx * dx + dy * dy).sqrt();
            // A clipped segment is no longer than the region diagonal
            let steps = (segment_length / step_size).ceil() as usize;

            for i in 0..=steps {
                let t = if steps == 0 {
                    0.0
                } else {
                    i as f64 / steps as f64
                };
                let lon = start.x + t * dx;
                let lat = start.y + t * dy;

                if !is_in_region(lat, lon) {
                    continue;
                }

                let code = encode_symbols(lat, lon, level)?;
                if seen.insert(code.clone()) {
                    let bounds = prefix_bounds(&code)?;
                    cells.push(DigipinCell::new(code, bounds));
                }
            }
        }

        if cells.is_empty() {
            validate_coordinate(first.y, first.x)?;
            return Err(DigipinError::GeometryParseError(
                "line string does not enter the DIGIPIN region".to_string(),
            ));
        }

        Ok(cells)
    }

    /// Returns the code rendered with separators, e.g. `4P3-33C-4635`.
    pub fn formatted(&self) -> String {
        format_symbols(&self.code)
    }

    /// Returns the centroid of the cell.
    pub fn center(&self) -> LatLon {
        self.bounds.center()
    }

    pub fn latitude(&self) -> f64 {
        self.center().latitude
    }

    pub fn longitude(&self) -> f64 {
        self.center().longitude
    }

    /// Centroid as a `geo_types::Point` (x = longitude).
    pub fn center_point(&self) -> Point<f64> {
        self.center().to_point()
    }

    /// The enclosing cell one level up, or `None` at level 1.
    pub fn parent(&self) -> Option<Self> {
        if self.level <= 1 {
            return None;
        }
        let code: String = self.code.chars().take(self.level as usize - 1).collect();
        let bounds = prefix_bounds(&code).ok()?;
        Some(Self::new(code, bounds))
    }

    /// The 16 cells one level down, in symbol-grid order (north-west first).
    ///
    /// Empty for level-10 cells.
    pub fn children(&self) -> Vec<Self> {
        if self.level >= MAX_LEVEL {
            return Vec::new();
        }
        grid_cells()
            .map(|(row, col, symbol)| {
                let mut code = self.code.clone();
                code.push(symbol);
                Self::new(code, self.bounds.narrow(row, col))
            })
            .collect()
    }

    /// True if the coordinate encodes into this cell.
    ///
    /// Uses the encoder itself, so points on a shared edge belong to exactly
    /// one of the neighbouring cells.
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        encode_symbols(coord.latitude(), coord.longitude(), self.level)
            .map(|code| code == self.code)
            .unwrap_or(false)
    }

    /// Returns the approximate size of this cell at its centre latitude.
    pub fn dims(&self) -> Result<CellDims, DigipinError> {
        cell_dims(self.level, self.latitude())
    }

    pub fn to_rect(&self) -> Rect<f64> {
        self.bounds.to_rect()
    }

    /// Converts this cell to a rectangular polygon (x = longitude, y = latitude).
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.bounds.to_polygon()
    }

    pub fn google_maps_url(&self) -> String {
        let c = self.center();
        google_maps_url(c.latitude, c.longitude)
    }

    pub fn apple_maps_url(&self) -> String {
        let c = self.center();
        apple_maps_url(c.latitude, c.longitude)
    }

    /// Converts this cell's center to an Arrow PointArray.
    pub fn to_arrow_points(&self) -> PointArray {
        std::slice::from_ref(self).to_arrow_points()
    }

    /// Converts this cell to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this cell to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, DigipinError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this cell to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), DigipinError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

impl fmt::Display for DigipinCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}
