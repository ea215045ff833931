use crate::api::cell::DigipinCell;
use crate::core::codec::decode;
use crate::core::constants::MAX_LEVEL;
use crate::util::error::DigipinError;
use crate::util::parse::parse_geometry;
use csv::StringRecord;
use geo::Centroid;
use geo_types::{Geometry, Polygon};
use log::{info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// For the type of geometry source in the file
enum SourceIndices {
    Geometry(usize),
    Coordinates { lat_idx: usize, lon_idx: usize },
}

/// Output format for cell polygon geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Specifies how to extract location data from CSV rows.
#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry (x = longitude)
    GeometryColumn(String),
    /// Separate latitude and longitude columns
    CoordinateColumns {
        lat_column: String,
        lon_column: String,
    },
}

/// Configuration for CSV to DIGIPIN conversion.
#[derive(Debug, Clone)]
pub struct CsvDigipinConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub level: u8,
    pub include_cell_geometry: Option<GeometryFormat>,
    pub formatted: bool,
    pub skip_invalid: bool,
}

impl CsvDigipinConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use digipin_rs::CsvDigipinConfig;
    ///
    /// let config = CsvDigipinConfig::new("geometry");
    /// assert_eq!(config.level, 10);
    /// ```
    pub fn new(geometry_column: impl Into<String>) -> Self {
        Self::with_source(CoordinateSource::GeometryColumn(geometry_column.into()))
    }

    /// Create config for a CSV with separate latitude/longitude columns.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::{CsvDigipinConfig, GeometryFormat};
    ///
    /// let config = CsvDigipinConfig::from_coords("Latitude", "Longitude")
    ///     .level(8)
    ///     .with_cell_geometry(GeometryFormat::Wkt)
    ///     .skip_invalid(true);
    /// ```
    pub fn from_coords(lat_column: impl Into<String>, lon_column: impl Into<String>) -> Self {
        Self::with_source(CoordinateSource::CoordinateColumns {
            lat_column: lat_column.into(),
            lon_column: lon_column.into(),
        })
    }

    fn with_source(source: CoordinateSource) -> Self {
        Self {
            source,
            exclude_columns: Vec::new(),
            level: MAX_LEVEL,
            include_cell_geometry: None,
            formatted: true,
            skip_invalid: false,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    /// Include the cell polygon in output.
    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_cell_geometry = Some(format);
        self
    }

    /// Write `XXX-XXX-XXXX` (true) or bare symbols (false).
    pub fn formatted(mut self, formatted: bool) -> Self {
        self.formatted = formatted;
        self
    }

    /// Log and skip rows that cannot be converted instead of failing.
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

/// Configuration for DIGIPIN CSV to coordinate CSV conversion.
#[derive(Debug, Clone)]
pub struct CsvDecodeConfig {
    pub code_column: String,
    pub skip_invalid: bool,
}

impl CsvDecodeConfig {
    pub fn new(code_column: impl Into<String>) -> Self {
        Self {
            code_column: code_column.into(),
            skip_invalid: false,
        }
    }

    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

/// Row counts reported by a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub rows_written: usize,
    pub rows_skipped: usize,
}

pub trait CsvToDigipin {
    fn to_digipin_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvDigipinConfig,
    ) -> Result<ConversionSummary, DigipinError>;

    fn to_coords_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvDecodeConfig,
    ) -> Result<ConversionSummary, DigipinError>;
}

impl<P: AsRef<Path>> CsvToDigipin for P {
    fn to_digipin_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvDigipinConfig,
    ) -> Result<ConversionSummary, DigipinError> {
        csv_to_digipin_csv(self, output_path, config)
    }

    fn to_coords_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvDecodeConfig,
    ) -> Result<ConversionSummary, DigipinError> {
        digipin_csv_to_coords_csv(self, output_path, config)
    }
}

fn polygon_to_wkt(polygon: &Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

fn centroid_cell(polygon: &Polygon<f64>, level: u8) -> Result<Vec<DigipinCell>, DigipinError> {
    match polygon.centroid() {
        Some(centroid) => Ok(vec![DigipinCell::from_coordinate(&centroid, level)?]),
        None => Err(DigipinError::GeometryParseError(
            "polygon has no centroid".to_string(),
        )),
    }
}

/// Maps a geometry to the cells it touches.
///
/// Every part of a multi-part geometry must touch the region: a point,
/// polygon centroid or whole line outside it fails the geometry. A line that
/// leaves and re-enters the region keeps the cells of its inside stretches.
fn geometry_to_cells(geom: Geometry<f64>, level: u8) -> Result<Vec<DigipinCell>, DigipinError> {
    match geom {
        Geometry::Point(pt) => Ok(vec![DigipinCell::from_coordinate(&pt, level)?]),
        Geometry::MultiPoint(mp) => mp
            .0
            .iter()
            .map(|pt| DigipinCell::from_coordinate(pt, level))
            .collect(),
        Geometry::LineString(line) => DigipinCell::from_line_string(&line, level),
        Geometry::MultiLineString(mls) => {
            let mut all_cells = Vec::new();
            for line in &mls.0 {
                all_cells.extend(DigipinCell::from_line_string(line, level)?);
            }
            Ok(all_cells)
        }
        Geometry::Polygon(poly) => centroid_cell(&poly, level),
        Geometry::MultiPolygon(mp) => {
            let mut cells = Vec::new();
            for poly in &mp.0 {
                cells.extend(centroid_cell(poly, level)?);
            }
            Ok(cells)
        }
        Geometry::GeometryCollection(gc) => {
            let mut all_cells = Vec::new();
            for g in gc.0 {
                all_cells.extend(geometry_to_cells(g, level)?);
            }
            Ok(all_cells)
        }
        _ => Err(DigipinError::GeometryParseError(
            "Unsupported geometry type".to_string(),
        )),
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize, DigipinError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DigipinError::CsvError(format!("Column '{}' not found", name)))
}

fn parse_field(record: &StringRecord, idx: usize, name: &str) -> Result<f64, DigipinError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| DigipinError::CsvError(format!("Missing {} column at index {}", name, idx)))?
        .trim();
    raw.parse()
        .map_err(|_| DigipinError::InvalidCoordinate(format!("invalid {}: '{}'", name, raw)))
}

fn row_cells(
    record: &StringRecord,
    source: &SourceIndices,
    level: u8,
) -> Result<Vec<DigipinCell>, DigipinError> {
    match source {
        SourceIndices::Geometry(idx) => {
            let geom_str = record.get(*idx).ok_or_else(|| {
                DigipinError::CsvError(format!("Missing geometry column at index {}", idx))
            })?;
            let cells = geometry_to_cells(parse_geometry(geom_str)?, level)?;
            if cells.is_empty() {
                return Err(DigipinError::GeometryParseError(format!(
                    "geometry '{}' yields no cells",
                    geom_str.trim()
                )));
            }
            Ok(cells)
        }
        SourceIndices::Coordinates { lat_idx, lon_idx } => {
            let latitude = parse_field(record, *lat_idx, "latitude")?;
            let longitude = parse_field(record, *lon_idx, "longitude")?;
            Ok(vec![DigipinCell::from_lat_lon(latitude, longitude, level)?])
        }
    }
}

fn kept_fields<'a>(
    record: &'a StringRecord,
    exclude: &'a HashSet<usize>,
) -> impl Iterator<Item = &'a str> + 'a {
    record
        .iter()
        .enumerate()
        .filter(move |(i, _)| !exclude.contains(i))
        .map(|(_, field)| field)
}

/// Converts a CSV file with coordinate or geometry columns to a CSV file of DIGIPINs.
///
/// Streams output row by row. Each source row yields one output row per cell.
///
/// # Example with coordinate columns
///
/// ```no_run
/// use digipin_rs::{csv_to_digipin_csv, CsvDigipinConfig};
///
/// let config = CsvDigipinConfig::from_coords("Latitude", "Longitude");
/// let summary = csv_to_digipin_csv("offices.csv", "offices_digipin.csv", &config).unwrap();
/// println!("{} rows written", summary.rows_written);
/// ```
///
/// # Example with geometry column
///
/// ```no_run
/// use digipin_rs::{csv_to_digipin_csv, CsvDigipinConfig, GeometryFormat};
///
/// let config = CsvDigipinConfig::new("Geo Shape")
///     .level(8)
///     .exclude(vec!["Geo Point".into()])
///     .with_cell_geometry(GeometryFormat::GeoJson);
///
/// csv_to_digipin_csv("roads.csv", "roads_digipin.csv", &config).unwrap();
/// ```
pub fn csv_to_digipin_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvDigipinConfig,
) -> Result<ConversionSummary, DigipinError> {
    if config.level == 0 || config.level > MAX_LEVEL {
        return Err(DigipinError::InvalidLevel(config.level));
    }

    let csv_path = csv_path.as_ref();
    info!(
        "converting {} to DIGIPIN level {}",
        csv_path.display(),
        config.level
    );

    let file = File::open(csv_path).map_err(|e| DigipinError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| DigipinError::CsvError(e.to_string()))?
        .clone();

    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = find_column(&headers, col)?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns {
            lat_column,
            lon_column,
        } => {
            let lat_idx = find_column(&headers, lat_column)?;
            let lon_idx = find_column(&headers, lon_column)?;
            (
                SourceIndices::Coordinates { lat_idx, lon_idx },
                HashSet::from([lat_idx, lon_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file = File::create(output_path).map_err(|e| DigipinError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["digipin"];
    if config.include_cell_geometry.is_some() {
        header_row.push("cell_geometry");
    }
    header_row.extend(kept_fields(&headers, &exclude_indices));
    writer
        .write_record(&header_row)
        .map_err(|e| DigipinError::CsvError(e.to_string()))?;

    let mut summary = ConversionSummary::default();

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DigipinError::CsvError(e.to_string()))?;

        let cells = match row_cells(&record, &source_indices, config.level) {
            Ok(cells) => cells,
            Err(e) if config.skip_invalid => {
                warn!("skipping row {}: {}", line + 1, e);
                summary.rows_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        for cell in cells {
            let code = if config.formatted {
                cell.formatted()
            } else {
                cell.code.clone()
            };
            let mut row: Vec<String> = vec![code];

            if let Some(format) = config.include_cell_geometry {
                let polygon = cell.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            row.extend(kept_fields(&record, &exclude_indices).map(str::to_string));
            writer
                .write_record(&row)
                .map_err(|e| DigipinError::CsvError(e.to_string()))?;
            summary.rows_written += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    info!(
        "wrote {} rows, skipped {}",
        summary.rows_written, summary.rows_skipped
    );
    Ok(summary)
}

/// Converts a CSV file with a DIGIPIN column to one with `latitude,longitude` centroids.
///
/// The code column is dropped and the remaining columns follow the coordinates.
pub fn digipin_csv_to_coords_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvDecodeConfig,
) -> Result<ConversionSummary, DigipinError> {
    let csv_path = csv_path.as_ref();
    info!("decoding DIGIPINs in {}", csv_path.display());

    let file = File::open(csv_path).map_err(|e| DigipinError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| DigipinError::CsvError(e.to_string()))?
        .clone();

    let code_idx = find_column(&headers, &config.code_column)?;
    let exclude_indices = HashSet::from([code_idx]);

    let out_file = File::create(output_path).map_err(|e| DigipinError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["latitude", "longitude"];
    header_row.extend(kept_fields(&headers, &exclude_indices));
    writer
        .write_record(&header_row)
        .map_err(|e| DigipinError::CsvError(e.to_string()))?;

    let mut summary = ConversionSummary::default();

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DigipinError::CsvError(e.to_string()))?;

        let code = record.get(code_idx).unwrap_or_default();
        let center = match decode(code) {
            Ok(center) => center,
            Err(e) if config.skip_invalid => {
                warn!("skipping row {}: {}", line + 1, e);
                summary.rows_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut row = vec![
            format!("{:.7}", center.latitude),
            format!("{:.7}", center.longitude),
        ];
        row.extend(kept_fields(&record, &exclude_indices).map(str::to_string));
        writer
            .write_record(&row)
            .map_err(|e| DigipinError::CsvError(e.to_string()))?;
        summary.rows_written += 1;
    }

    writer
        .flush()
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    info!(
        "wrote {} rows, skipped {}",
        summary.rows_written, summary.rows_skipped
    );
    Ok(summary)
}
