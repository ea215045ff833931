use crate::core::constants::{LAT_SPANS, LON_SPANS, MAX_LEVEL};
use crate::util::error::DigipinError;

/// Approximate length of one degree of latitude in meters.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Length of one degree of longitude at the equator in meters.
pub const METERS_PER_DEGREE_LON_EQUATOR: f64 = 111_320.0;

/// Size of a cell at a given level.
///
/// Metric sizes use a spherical approximation and are meant for display,
/// not surveying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellDims {
    pub level: u8,
    /// Height in degrees
    pub lat_span: f64,
    /// Width in degrees
    pub lon_span: f64,
    /// Approximate height in meters
    pub height_m: f64,
    /// Approximate width in meters at the reference latitude
    pub width_m: f64,
    /// Approximate area in square meters
    pub area_m2: f64,
}

/// Meters per degree of longitude at `latitude`.
pub fn meters_per_degree_lon(latitude: f64) -> f64 {
    METERS_PER_DEGREE_LON_EQUATOR * latitude.to_radians().cos()
}

/// Computes the size of a level's cells around `latitude`.
///
/// Level 0 is the whole region.
///
/// # Example
/// ```
/// use digipin_rs::cell_dims;
///
/// let dims = cell_dims(10, 13.0).unwrap();
/// assert!(dims.height_m > 3.0 && dims.height_m < 4.0);
/// ```
pub fn cell_dims(level: u8, latitude: f64) -> Result<CellDims, DigipinError> {
    if level > MAX_LEVEL {
        return Err(DigipinError::InvalidLevel(level));
    }

    let lat_span = LAT_SPANS[level as usize];
    let lon_span = LON_SPANS[level as usize];
    let height_m = lat_span * METERS_PER_DEGREE_LAT;
    let width_m = lon_span * meters_per_degree_lon(latitude);

    Ok(CellDims {
        level,
        lat_span,
        lon_span,
        height_m,
        width_m,
        area_m2: height_m * width_m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_zero_is_region() -> Result<(), DigipinError> {
        let dims = cell_dims(0, 0.0)?;
        assert_eq!(dims.lat_span, 36.0);
        assert_eq!(dims.lon_span, 36.0);
        assert!((dims.height_m - 3_996_000.0).abs() < 0.001);
        assert!((dims.width_m - 4_007_520.0).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_each_level_quarters_span() -> Result<(), DigipinError> {
        for level in 1..=MAX_LEVEL {
            let parent = cell_dims(level - 1, 20.0)?;
            let child = cell_dims(level, 20.0)?;
            assert!((parent.lat_span / child.lat_span - 4.0).abs() < 1e-12);
            assert!((parent.area_m2 / child.area_m2 - 16.0).abs() < 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_width_shrinks_with_latitude() -> Result<(), DigipinError> {
        let south = cell_dims(10, 5.0)?;
        let north = cell_dims(10, 35.0)?;
        assert!(north.width_m < south.width_m);
        assert_eq!(north.height_m, south.height_m);
        Ok(())
    }

    #[test]
    fn test_invalid_level() {
        assert!(matches!(
            cell_dims(11, 20.0),
            Err(DigipinError::InvalidLevel(11))
        ));
    }
}
