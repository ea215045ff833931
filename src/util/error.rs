use std::fmt;

/// Coordinate axis that failed a range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// Error type for digipin-rs operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DigipinError {
    /// The coordinate lies outside the supported region.
    #[error("{axis} {value} is outside the supported DIGIPIN region")]
    OutOfRange { axis: Axis, value: f64 },
    /// The code does not have exactly 10 symbols once separators are removed.
    #[error("invalid DIGIPIN length: expected 10 symbols, got {length}")]
    InvalidFormat { length: usize },
    /// The code contains a character outside the 16-symbol alphabet.
    #[error("invalid DIGIPIN symbol '{symbol}' at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    /// The level is outside the valid range (1-10, or 0-10 for dimensions).
    #[error("invalid level: {0}")]
    InvalidLevel(u8),
    /// A grid extent is empty or misses the region.
    #[error("invalid extent: {0}")]
    InvalidExtent(String),
    /// Coordinate text could not be parsed.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("geometry parse error: {0}")]
    GeometryParseError(String),
    /// CSV parsing or reading error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// File I/O or serialization error.
    #[error("IO error: {0}")]
    IoError(String),
    /// A saved-pin document could not be built or read.
    #[error("export error: {0}")]
    ExportError(String),
    /// The saved-pin document version is not supported.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),
}
