use crate::util::coord::LatLon;
use crate::util::error::DigipinError;
use geo_types::Geometry;
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses `"lat, lon"` (or `"lat lon"`) into a [`LatLon`].
///
/// No range check is applied here; the codec rejects out-of-region values.
///
/// # Example
/// ```
/// use digipin_rs::parse_coordinate;
///
/// let c = parse_coordinate("13.006003, 77.751144").unwrap();
/// assert_eq!(c.latitude, 13.006003);
/// assert_eq!(c.longitude, 77.751144);
/// ```
pub fn parse_coordinate(s: &str) -> Result<LatLon, DigipinError> {
    let trimmed = s.trim();
    let parts: Vec<&str> = if trimmed.contains(',') {
        trimmed.split(',').map(str::trim).collect()
    } else {
        trimmed.split_whitespace().collect()
    };

    if parts.len() != 2 {
        return Err(DigipinError::InvalidCoordinate(format!(
            "expected 'latitude, longitude', got '{}'",
            trimmed
        )));
    }

    let latitude: f64 = parts[0]
        .parse()
        .map_err(|_| DigipinError::InvalidCoordinate(format!("invalid latitude '{}'", parts[0])))?;
    let longitude: f64 = parts[1].parse().map_err(|_| {
        DigipinError::InvalidCoordinate(format!("invalid longitude '{}'", parts[1]))
    })?;

    Ok(LatLon::new(latitude, longitude))
}

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, DigipinError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON string into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, DigipinError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| DigipinError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => {
            Geometry::try_from(geom).map_err(|e| DigipinError::GeometryParseError(e.to_string()))
        }
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| DigipinError::GeometryParseError("Feature has no geometry".to_string()))
            .and_then(|g| {
                Geometry::try_from(g).map_err(|e| DigipinError::GeometryParseError(e.to_string()))
            }),
        GeoJson::FeatureCollection(_) => Err(DigipinError::GeometryParseError(
            "FeatureCollection not supported, use individual geometries".to_string(),
        )),
    }
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, DigipinError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| DigipinError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        DigipinError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}
