pub mod arrow;
pub mod cell;
pub mod csv;
pub mod export;
pub mod grid;
pub mod parquet;

pub use arrow::DigipinCellsToArrow;
pub use cell::DigipinCell;
pub use self::csv::{
    ConversionSummary, CoordinateSource, CsvDecodeConfig, CsvDigipinConfig, CsvToDigipin,
    GeometryFormat, csv_to_digipin_csv, digipin_csv_to_coords_csv,
};
pub use export::{ExportDocument, ExportFormat, ExportItem, ExportVersion, import_document};
pub use grid::{DigipinGrid, DigipinGridBuilder};
pub use self::parquet::{DigipinCellsToGeoParquet, write_geoparquet};
