use crate::api::cell::DigipinCell;
use crate::core::bounds::Bounds;
use crate::core::codec::encode_symbols;
use crate::core::constants::MAX_LEVEL;
use crate::core::grid::grid_cells;
use crate::util::coord::Coordinate;
use crate::util::error::DigipinError;
use geo_types::{Polygon, Rect};

/// All cells at one level that overlap an extent.
///
/// # Example
///
/// ```
/// use digipin_rs::{DigipinGrid, LatLon};
///
/// # fn main() -> Result<(), digipin_rs::DigipinError> {
/// let grid = DigipinGrid::builder()
///     .level(4)
///     .extent(12.9, 77.5, 13.1, 77.8)
///     .build()?;
///
/// if let Some(cell) = grid.get_cell_at(&LatLon::new(13.0, 77.6)) {
///     println!("{}", cell);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DigipinGrid {
    cells: Vec<DigipinCell>,
    level: u8,
}

impl DigipinGrid {
    pub fn builder() -> DigipinGridBuilder {
        DigipinGridBuilder::new()
    }

    /// Collects the level-`level` cells whose interiors overlap the extent.
    ///
    /// The extent is clipped to the DIGIPIN region first.
    pub fn from_extent(
        lat_min: f64,
        lon_min: f64,
        lat_max: f64,
        lon_max: f64,
        level: u8,
    ) -> Result<Self, DigipinError> {
        if level == 0 || level > MAX_LEVEL {
            return Err(DigipinError::InvalidLevel(level));
        }
        // Negated comparisons also reject NaN
        if !(lat_min < lat_max) || !(lon_min < lon_max) {
            return Err(DigipinError::InvalidExtent(format!(
                "min must be below max: lat {}..{}, lon {}..{}",
                lat_min, lat_max, lon_min, lon_max
            )));
        }

        let extent = Bounds::new(lat_min, lat_max, lon_min, lon_max);
        let clipped = Bounds::REGION.intersection(&extent).ok_or_else(|| {
            DigipinError::InvalidExtent("extent does not overlap the DIGIPIN region".to_string())
        })?;

        let mut cells = Vec::new();
        collect_cells(String::new(), Bounds::REGION, &clipped, level, &mut cells);

        Ok(Self { cells, level })
    }

    /// Builds a grid from a `geo_types::Rect` with x = longitude, y = latitude.
    pub fn from_rect(rect: &Rect<f64>, level: u8) -> Result<Self, DigipinError> {
        Self::from_extent(
            rect.min().y,
            rect.min().x,
            rect.max().y,
            rect.max().x,
            level,
        )
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[DigipinCell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &DigipinCell> {
        self.cells.iter()
    }

    pub fn get_cell_at(&self, coord: &impl Coordinate) -> Option<&DigipinCell> {
        let code = encode_symbols(coord.latitude(), coord.longitude(), self.level).ok()?;
        self.cells.iter().find(|cell| cell.code == code)
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.cells.iter().map(|cell| cell.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&DigipinCell>
    where
        F: Fn(&DigipinCell) -> bool,
    {
        self.cells.iter().filter(|cell| predicate(cell)).collect()
    }
}

#[derive(Debug, Default)]
pub struct DigipinGridBuilder {
    level: Option<u8>,
    extent: Option<Bounds>,
}

impl DigipinGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn extent(mut self, lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> Self {
        self.extent = Some(Bounds::new(lat_min, lat_max, lon_min, lon_max));
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.extent = Some(Bounds::from(*rect));
        self
    }

    pub fn build(self) -> Result<DigipinGrid, DigipinError> {
        let level = self.level.ok_or(DigipinError::InvalidLevel(0))?;
        let extent = self
            .extent
            .ok_or_else(|| DigipinError::InvalidExtent("extent must be set".to_string()))?;

        DigipinGrid::from_extent(
            extent.lat_min,
            extent.lon_min,
            extent.lat_max,
            extent.lon_max,
            level,
        )
    }
}

/// Depth-first descent that only enters sub-cells overlapping the extent.
fn collect_cells(
    code: String,
    bounds: Bounds,
    extent: &Bounds,
    level: u8,
    out: &mut Vec<DigipinCell>,
) {
    if code.len() == level as usize {
        out.push(DigipinCell::new(code, bounds));
        return;
    }

    for (row, col, symbol) in grid_cells() {
        let child = bounds.narrow(row, col);
        if !child.intersects(extent) {
            continue;
        }
        let mut child_code = code.clone();
        child_code.push(symbol);
        collect_cells(child_code, child, extent, level, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::coord::LatLon;
    use geo_types::coord;

    #[test]
    fn test_grid_from_extent() -> Result<(), DigipinError> {
        let grid = DigipinGrid::from_extent(12.9, 77.5, 13.1, 77.8, 4)?;
        assert!(!grid.is_empty());
        assert_eq!(grid.level(), 4);

        for cell in grid.iter() {
            assert_eq!(cell.level, 4);
        }
        Ok(())
    }

    #[test]
    fn test_exact_cell_extent_yields_one_cell() -> Result<(), DigipinError> {
        let cell = DigipinCell::from_code("3")?;
        let b = cell.bounds;
        let grid = DigipinGrid::from_extent(b.lat_min, b.lon_min, b.lat_max, b.lon_max, 1)?;
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.cells()[0], cell);

        let grid = DigipinGrid::from_extent(b.lat_min, b.lon_min, b.lat_max, b.lon_max, 2)?;
        assert_eq!(grid.len(), 16);
        Ok(())
    }

    #[test]
    fn test_whole_region_level_one() -> Result<(), DigipinError> {
        let grid = DigipinGrid::from_extent(0.0, 60.0, 40.0, 100.0, 1)?;
        assert_eq!(grid.len(), 16);
        Ok(())
    }

    #[test]
    fn test_grid_from_rect() -> Result<(), DigipinError> {
        let rect = Rect::new(coord! { x: 77.5, y: 12.9 }, coord! { x: 77.8, y: 13.1 });
        let from_rect = DigipinGrid::from_rect(&rect, 4)?;
        let from_extent = DigipinGrid::from_extent(12.9, 77.5, 13.1, 77.8, 4)?;
        assert_eq!(from_rect.cells(), from_extent.cells());
        Ok(())
    }

    #[test]
    fn test_grid_builder() -> Result<(), DigipinError> {
        let grid = DigipinGrid::builder()
            .level(3)
            .extent(12.9, 77.5, 13.1, 77.8)
            .build()?;
        assert!(!grid.is_empty());
        assert_eq!(grid.level(), 3);

        let rect = Rect::new(coord! { x: 77.5, y: 12.9 }, coord! { x: 77.8, y: 13.1 });
        let with_rect = DigipinGrid::builder().level(3).rect(&rect).build()?;
        assert_eq!(with_rect.cells(), grid.cells());
        Ok(())
    }

    #[test]
    fn test_builder_missing_fields() {
        assert!(matches!(
            DigipinGrid::builder().extent(1.0, 2.0, 3.0, 4.0).build(),
            Err(DigipinError::InvalidLevel(0))
        ));
        assert!(matches!(
            DigipinGrid::builder().level(3).build(),
            Err(DigipinError::InvalidExtent(_))
        ));
    }

    #[test]
    fn test_invalid_extents() {
        assert!(matches!(
            DigipinGrid::from_extent(13.0, 77.0, 12.0, 78.0, 3),
            Err(DigipinError::InvalidExtent(_))
        ));
        assert!(matches!(
            DigipinGrid::from_extent(50.0, 0.0, 51.0, 1.0, 3),
            Err(DigipinError::InvalidExtent(_))
        ));
        assert!(matches!(
            DigipinGrid::from_extent(12.0, 77.0, 13.0, 78.0, 11),
            Err(DigipinError::InvalidLevel(11))
        ));
    }

    #[test]
    fn test_get_cell_at() -> Result<(), DigipinError> {
        let grid = DigipinGrid::from_extent(12.9, 77.5, 13.1, 77.8, 4)?;
        let pt = LatLon::new(13.0, 77.6);

        let cell = grid.get_cell_at(&pt);
        assert!(cell.is_some());
        assert!(cell.is_some_and(|c| c.contains(&pt)));

        assert!(grid.get_cell_at(&LatLon::new(30.0, 90.0)).is_none());
        Ok(())
    }

    #[test]
    fn test_cells_cover_extent_corners() -> Result<(), DigipinError> {
        let grid = DigipinGrid::from_extent(12.9, 77.5, 13.1, 77.8, 5)?;
        for corner in [
            LatLon::new(12.9001, 77.5001),
            LatLon::new(13.0999, 77.7999),
            LatLon::new(12.9001, 77.7999),
            LatLon::new(13.0999, 77.5001),
        ] {
            assert!(grid.get_cell_at(&corner).is_some(), "{corner} not covered");
        }
        Ok(())
    }

    #[test]
    fn test_filter_and_polygons() -> Result<(), DigipinError> {
        let grid = DigipinGrid::from_extent(12.9, 77.5, 13.1, 77.8, 4)?;

        let northern = grid.filter(|cell| cell.latitude() > 13.0);
        assert!(northern.len() <= grid.len());

        let polygons = grid.to_polygons();
        assert_eq!(polygons.len(), grid.len());
        Ok(())
    }
}
