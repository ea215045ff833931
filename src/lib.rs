//! # digipin-rs
//!
//! DIGIPIN is India's 10-symbol geocode. The box from 2.5°N to 38.5°N and
//! 63.5°E to 99.5°E is split into a 4x4 grid ten times over, and each split
//! contributes one symbol. A full code such as `4P3-33C-4635` names a cell
//! of roughly 3.8 m x 3.8 m.
//!
//! There are currently four main entry points.
//!
//! ### 1. `encode` / `decode` - The Codec
//!
//! ```
//! use digipin_rs::{decode, encode, is_valid_digipin};
//!
//! # fn main() -> Result<(), digipin_rs::DigipinError> {
//! let code = encode(13.006003, 77.751144)?;
//! assert_eq!(code, "4P3-33C-4635");
//! assert!(is_valid_digipin(&code));
//!
//! let center = decode("4p333c4635")?;
//! assert!((center.latitude - 13.006003).abs() < 1e-4);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `DigipinCell` - Single Cell Operations
//!
//! ```
//! use digipin_rs::{DigipinCell, LatLon};
//!
//! # fn main() -> Result<(), digipin_rs::DigipinError> {
//! let cell = DigipinCell::from_coordinate(&LatLon::new(28.622788, 77.213033), 4)?;
//! println!("{} covers {:?}", cell, cell.bounds);
//! let polygon = cell.to_polygon();
//! let children = cell.children();
//! assert_eq!(children.len(), 16);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `DigipinGrid` - Collections of Cells
//!
//! ```
//! use digipin_rs::DigipinGrid;
//! use geo_types::point;
//!
//! # fn main() -> Result<(), digipin_rs::DigipinError> {
//! let grid = DigipinGrid::builder()
//!     .level(5)
//!     .extent(12.9, 77.5, 13.1, 77.8)
//!     .build()?;
//!
//! let pt = point! { x: 77.6, y: 13.0 };
//! if let Some(cell) = grid.get_cell_at(&pt) {
//!     println!("{}", cell.code);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. `CsvToDigipin` - CSV File Conversion
//!
//! ```no_run
//! use digipin_rs::{CsvDigipinConfig, CsvToDigipin, GeometryFormat};
//!
//! let config = CsvDigipinConfig::from_coords("Latitude", "Longitude")
//!     .with_cell_geometry(GeometryFormat::Wkt)
//!     .skip_invalid(true);
//!
//! "post_offices.csv".to_digipin_csv("post_offices_digipin.csv", &config).unwrap();
//! ```
//!

pub mod api;
pub mod core;
pub mod util;

pub use api::{
    ConversionSummary, CoordinateSource, CsvDecodeConfig, CsvDigipinConfig, CsvToDigipin,
    DigipinCell, DigipinCellsToArrow, DigipinCellsToGeoParquet, DigipinGrid, DigipinGridBuilder,
    ExportDocument, ExportFormat, ExportItem, ExportVersion, GeometryFormat, csv_to_digipin_csv,
    digipin_csv_to_coords_csv, import_document, write_geoparquet,
};
pub use core::{
    ALPHABET, Bounds, CODE_LENGTH, CellDims, FORMATTED_LENGTH, LAT_MAX, LAT_MIN, LON_MAX, LON_MIN,
    MAX_LEVEL, SEPARATOR, SYMBOL_GRID, cell_dims, decode, decode_bounds, encode, encode_coordinate,
    encode_many, encode_symbols, format_code, format_symbols, is_in_region, is_valid_digipin,
    normalize, prefix_bounds, strip, symbol_at, symbol_position, validate_coordinate,
    validate_symbols,
};
pub use util::{
    Axis, Coordinate, DigipinError, LatLon, apple_maps_url, google_maps_url, parse_coordinate,
    parse_geometry,
};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{Rect, coord, point};

    #[test]
    fn test_end_to_end_workflow() -> Result<(), DigipinError> {
        let grid = DigipinGrid::builder()
            .level(6)
            .extent(28.6, 77.2, 28.65, 77.25)
            .build()?;

        assert!(!grid.is_empty());
        assert_eq!(grid.level(), 6);

        let pt = point! { x: 77.213033, y: 28.622788 };
        let cell = grid.get_cell_at(&pt);
        assert!(cell.is_some());

        if let Some(cell) = cell {
            let full = encode_coordinate(&pt)?;
            assert!(strip(&full).starts_with(&cell.code));

            let polygon = cell.to_polygon();
            assert_eq!(polygon.exterior().coords().count(), 5);
        }
        Ok(())
    }

    #[test]
    fn test_using_geo_types_macros() -> Result<(), DigipinError> {
        let pt = point! { x: 72.8777, y: 19.076 };
        assert_eq!(encode_coordinate(&pt)?, "4FK-595-8823");

        let rect = Rect::new(coord! { x: 72.8, y: 19.0 }, coord! { x: 72.9, y: 19.1 });
        let grid = DigipinGrid::from_rect(&rect, 5)?;
        assert!(!grid.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_then_encode() -> Result<(), DigipinError> {
        let coord = parse_coordinate("28.622788 77.213033")?;
        assert_eq!(encode_coordinate(&coord)?, "39J-49L-L8T4");
        Ok(())
    }

    #[test]
    fn test_dimensions_workflow() -> Result<(), DigipinError> {
        let cell = DigipinCell::from_code("4P3-33C-4635")?;
        let dims = cell.dims()?;

        assert_eq!(dims.level, 10);
        assert!((dims.lat_span - cell.bounds.lat_span()).abs() < 1e-15);
        assert!(dims.height_m > 3.0 && dims.height_m < 4.5);
        Ok(())
    }

    #[test]
    fn test_grid_iteration() -> Result<(), DigipinError> {
        let grid = DigipinGrid::from_extent(12.9, 77.5, 13.1, 77.8, 5)?;

        let mut count = 0;
        for cell in grid.iter() {
            assert_eq!(cell.level, 5);
            count += 1;
        }

        assert_eq!(count, grid.len());
        Ok(())
    }

    #[test]
    fn test_cell_consistency_with_grid() -> Result<(), DigipinError> {
        let cell_direct = DigipinCell::from_lat_lon(13.0, 77.6, 5)?;

        let grid = DigipinGrid::from_extent(12.9, 77.5, 13.1, 77.8, 5)?;
        let pt = LatLon::new(13.0, 77.6);
        let cell_from_grid = grid.get_cell_at(&pt);

        assert_eq!(cell_from_grid, Some(&cell_direct));
        Ok(())
    }

    #[test]
    fn test_saved_pins_workflow() -> Result<(), DigipinError> {
        let code = encode(19.076, 72.8777)?;
        let item = ExportItem::from_code(&code, "Mumbai", "", false, chrono::Utc::now())?;
        let doc = ExportDocument::new(vec![item]);

        let back = import_document(&doc.to_csv()?, ExportFormat::Csv)?;
        assert_eq!(back.items[0].digipin, code);
        Ok(())
    }
}
