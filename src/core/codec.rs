use crate::core::bounds::Bounds;
use crate::core::constants::{LAT_MAX, LAT_MIN, LON_MAX, LON_MIN, MAX_LEVEL, SYMBOL_GRID};
use crate::core::format::{format_symbols, validate_prefix, validate_symbols};
use crate::core::grid::symbol_position;
use crate::util::coord::{Coordinate, LatLon};
use crate::util::error::{Axis, DigipinError};
use rayon::prelude::*;

/// Returns true if the coordinate lies inside the DIGIPIN region (edges included).
pub fn is_in_region(latitude: f64, longitude: f64) -> bool {
    validate_coordinate(latitude, longitude).is_ok()
}

/// Checks a coordinate against the region bounds.
///
/// NaN fails the check on whichever axis carries it.
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<(), DigipinError> {
    if !(LAT_MIN..=LAT_MAX).contains(&latitude) {
        return Err(DigipinError::OutOfRange {
            axis: Axis::Latitude,
            value: latitude,
        });
    }
    if !(LON_MIN..=LON_MAX).contains(&longitude) {
        return Err(DigipinError::OutOfRange {
            axis: Axis::Longitude,
            value: longitude,
        });
    }
    Ok(())
}

/// Encodes a coordinate as a formatted DIGIPIN (`XXX-XXX-XXXX`).
///
/// # Example
/// ```
/// use digipin_rs::encode;
///
/// let code = encode(13.006003, 77.751144).unwrap();
/// assert_eq!(code, "4P3-33C-4635");
/// ```
///
/// # Errors
///
/// [`DigipinError::OutOfRange`] if either axis is outside the region. The check
/// runs before any subdivision.
pub fn encode(latitude: f64, longitude: f64) -> Result<String, DigipinError> {
    let symbols = encode_symbols(latitude, longitude, MAX_LEVEL)?;
    Ok(format_symbols(&symbols))
}

/// Encodes anything implementing [`Coordinate`].
pub fn encode_coordinate(coord: &impl Coordinate) -> Result<String, DigipinError> {
    encode(coord.latitude(), coord.longitude())
}

/// Encodes the first `levels` symbols of a coordinate's code, without separators.
///
/// `levels` must be between 1 and 10. At 10 this is the unformatted full code.
///
/// # Process
///
/// For each level:
///
/// 1. Splits the current bounds into 4×4 bands
/// 2. Picks the latitude row (inverted, row 0 is north) and longitude column
/// 3. Emits the symbol at that grid position
/// 4. Narrows the bounds to exactly that cell
pub fn encode_symbols(latitude: f64, longitude: f64, levels: u8) -> Result<String, DigipinError> {
    if levels == 0 || levels > MAX_LEVEL {
        return Err(DigipinError::InvalidLevel(levels));
    }
    validate_coordinate(latitude, longitude)?;

    let mut bounds = Bounds::REGION;
    let mut symbols = String::with_capacity(levels as usize);
    for _ in 0..levels {
        let (row, col) = bounds.locate(latitude, longitude);
        symbols.push(SYMBOL_GRID[row][col]);
        bounds = bounds.narrow(row, col);
    }

    Ok(symbols)
}

/// Encodes many coordinates in parallel, one result per input in input order.
pub fn encode_many(coords: &[LatLon]) -> Vec<Result<String, DigipinError>> {
    coords.par_iter().map(encode_coordinate).collect()
}

/// Decodes a DIGIPIN to the centroid of its cell.
///
/// Separators, surrounding whitespace and lowercase input are accepted. The
/// result is the cell centre, not the originally encoded point; a round trip
/// is off by at most half a level-10 cell on each axis.
///
/// # Example
/// ```
/// use digipin_rs::{decode, encode};
///
/// let c = decode("4p3-33c-4635").unwrap();
/// assert!((c.latitude - 13.006003).abs() < 0.0001);
/// assert!((c.longitude - 77.751144).abs() < 0.0001);
/// assert_eq!(encode(c.latitude, c.longitude).unwrap(), "4P3-33C-4635");
/// ```
///
/// # Errors
///
/// - [`DigipinError::InvalidFormat`] - not 10 symbols after removing separators
/// - [`DigipinError::InvalidSymbol`] - a character outside the alphabet
pub fn decode(code: &str) -> Result<LatLon, DigipinError> {
    Ok(decode_bounds(code)?.center())
}

/// Decodes a DIGIPIN to the bounds of its level-10 cell.
pub fn decode_bounds(code: &str) -> Result<Bounds, DigipinError> {
    let symbols = validate_symbols(code)?;
    narrow_symbols(&symbols)
}

/// Bounds of the cell identified by a prefix of 1 to 10 symbols.
pub fn prefix_bounds(prefix: &str) -> Result<Bounds, DigipinError> {
    let symbols = validate_prefix(prefix)?;
    narrow_symbols(&symbols)
}

fn narrow_symbols(symbols: &str) -> Result<Bounds, DigipinError> {
    let mut bounds = Bounds::REGION;
    for (position, symbol) in symbols.chars().enumerate() {
        let (row, col) =
            symbol_position(symbol).ok_or(DigipinError::InvalidSymbol { symbol, position })?;
        bounds = bounds.narrow(row, col);
    }
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{ALPHABET, LAT_SPANS, LON_SPANS};
    use crate::core::format::strip;

    /// Deterministic sweep over the region, including the four edges.
    fn sample_coordinates() -> Vec<LatLon> {
        let mut coords = Vec::new();
        let steps = 37;
        for i in 0..=steps {
            for j in 0..=steps {
                let lat = LAT_MIN + (LAT_MAX - LAT_MIN) * (i as f64 / steps as f64);
                let lon = LON_MIN + (LON_MAX - LON_MIN) * (j as f64 / steps as f64);
                coords.push(LatLon::new(lat, lon));
            }
        }
        coords.push(LatLon::new(13.006003, 77.751144));
        coords.push(LatLon::new(28.622788, 77.213033));
        coords.push(LatLon::new(19.076, 72.8777));
        coords
    }

    #[test]
    fn test_regression_fixtures() -> Result<(), DigipinError> {
        assert_eq!(encode(13.006003, 77.751144)?, "4P3-33C-4635");
        assert_eq!(encode(28.622788, 77.213033)?, "39J-49L-L8T4");
        assert_eq!(encode(19.076, 72.8777)?, "4FK-595-8823");
        Ok(())
    }

    #[test]
    fn test_region_corners() -> Result<(), DigipinError> {
        assert_eq!(encode(LAT_MIN, LON_MIN)?, "LLL-LLL-LLLL");
        assert_eq!(encode(LAT_MAX, LON_MAX)?, "888-888-8888");
        assert_eq!(encode(LAT_MAX, LON_MIN)?, "FFF-FFF-FFFF");
        assert_eq!(encode(LAT_MIN, LON_MAX)?, "TTT-TTT-TTTT");
        Ok(())
    }

    #[test]
    fn test_internal_edge_assignment() -> Result<(), DigipinError> {
        // Centre of the region sits on level-1 edges on both axes
        assert_eq!(encode_symbols(20.5, 81.5, 1)?, "2");
        assert_eq!(encode(20.5, 81.5)?, "2LL-LLL-LLLL");
        Ok(())
    }

    #[test]
    fn test_range_rejection() {
        assert_eq!(
            encode(2.4, 80.0),
            Err(DigipinError::OutOfRange {
                axis: Axis::Latitude,
                value: 2.4
            })
        );
        assert!(matches!(
            encode(38.6, 80.0),
            Err(DigipinError::OutOfRange {
                axis: Axis::Latitude,
                ..
            })
        ));
        assert!(matches!(
            encode(20.0, 63.4),
            Err(DigipinError::OutOfRange {
                axis: Axis::Longitude,
                ..
            })
        ));
        assert!(matches!(
            encode(20.0, 99.6),
            Err(DigipinError::OutOfRange {
                axis: Axis::Longitude,
                ..
            })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(matches!(
            encode(f64::NAN, 80.0),
            Err(DigipinError::OutOfRange {
                axis: Axis::Latitude,
                ..
            })
        ));
        assert!(matches!(
            encode(20.0, f64::NAN),
            Err(DigipinError::OutOfRange {
                axis: Axis::Longitude,
                ..
            })
        ));
        assert!(!is_in_region(f64::NAN, f64::NAN));
    }

    #[test]
    fn test_exact_boundaries_accepted() {
        assert!(encode(2.5, 63.5).is_ok());
        assert!(encode(38.5, 99.5).is_ok());
        assert!(is_in_region(2.5, 99.5));
        assert!(!is_in_region(2.4999, 99.5));
    }

    #[test]
    fn test_invalid_level() {
        assert_eq!(
            encode_symbols(13.0, 77.0, 0),
            Err(DigipinError::InvalidLevel(0))
        );
        assert_eq!(
            encode_symbols(13.0, 77.0, 11),
            Err(DigipinError::InvalidLevel(11))
        );
    }

    #[test]
    fn test_determinism_alphabet_and_length() -> Result<(), DigipinError> {
        for c in sample_coordinates() {
            let first = encode_coordinate(&c)?;
            let second = encode_coordinate(&c)?;
            assert_eq!(first, second);
            assert_eq!(first.chars().count(), 12);

            let symbols = strip(&first);
            assert_eq!(symbols.chars().count(), 10);
            assert!(symbols.chars().all(|s| ALPHABET.contains(&s)));
            assert_eq!(&first[3..4], "-");
            assert_eq!(&first[7..8], "-");
        }
        Ok(())
    }

    #[test]
    fn test_bounded_round_trip() -> Result<(), DigipinError> {
        let lat_tolerance = (LAT_MAX - LAT_MIN) / 4f64.powi(10);
        let lon_tolerance = (LON_MAX - LON_MIN) / 4f64.powi(10);

        for c in sample_coordinates() {
            let code = encode_coordinate(&c)?;
            let back = decode(&code)?;
            assert!(
                (c.latitude - back.latitude).abs() <= lat_tolerance,
                "latitude drift for {c}: {back}"
            );
            assert!(
                (c.longitude - back.longitude).abs() <= lon_tolerance,
                "longitude drift for {c}: {back}"
            );
            // The centroid re-encodes to the same cell
            assert_eq!(encode_coordinate(&back)?, code);
        }
        Ok(())
    }

    #[test]
    fn test_prefix_consistency() -> Result<(), DigipinError> {
        let full = encode_symbols(13.006003, 77.751144, 10)?;
        for level in 1..=10u8 {
            let prefix = encode_symbols(13.006003, 77.751144, level)?;
            assert_eq!(prefix, full[..level as usize]);

            let bounds = prefix_bounds(&prefix)?;
            assert!((bounds.lat_span() - LAT_SPANS[level as usize]).abs() < 1e-12);
            assert!((bounds.lon_span() - LON_SPANS[level as usize]).abs() < 1e-12);
            assert!(bounds.contains(&LatLon::new(13.006003, 77.751144)));
        }
        Ok(())
    }

    #[test]
    fn test_decode_known_codes() -> Result<(), DigipinError> {
        let c = decode("4P3-33C-4635")?;
        assert!((c.latitude - 13.006002426147461).abs() < 1e-12);
        assert!((c.longitude - 77.75113868713379).abs() < 1e-12);

        let c = decode("39J-429-L4T4")?;
        assert!((c.latitude - 28.612905502319336).abs() < 1e-12);
        assert!((c.longitude - 77.22952842712402).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_decode_returns_centroid() -> Result<(), DigipinError> {
        let bounds = decode_bounds("LLLLLLLLLL")?;
        assert_eq!(bounds.lat_min, LAT_MIN);
        assert_eq!(bounds.lon_min, LON_MIN);

        let c = decode("LLLLLLLLLL")?;
        assert_eq!(c.latitude, (bounds.lat_min + bounds.lat_max) / 2.0);
        assert_eq!(c.longitude, (bounds.lon_min + bounds.lon_max) / 2.0);
        Ok(())
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("ABC"), Err(DigipinError::InvalidFormat { length: 3 }));
        assert!(matches!(
            decode("ABCDEFGHIJ"),
            Err(DigipinError::InvalidSymbol {
                symbol: 'A',
                position: 0
            })
        ));
        assert!(matches!(
            decode("4P3-33C-46Z5"),
            Err(DigipinError::InvalidSymbol {
                symbol: 'Z',
                position: 8
            })
        ));
    }

    #[test]
    fn test_case_and_whitespace_tolerance() -> Result<(), DigipinError> {
        assert_eq!(decode(" 4p3-33c-4635 ")?, decode("4P3-33C-4635")?);
        assert_eq!(decode("4P333C4635")?, decode("4P3-33C-4635")?);
        Ok(())
    }

    #[test]
    fn test_encode_many_preserves_order() -> Result<(), DigipinError> {
        let coords = vec![
            LatLon::new(13.006003, 77.751144),
            LatLon::new(50.0, 77.0),
            LatLon::new(28.622788, 77.213033),
        ];
        let results = encode_many(&coords);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].clone()?, "4P3-33C-4635");
        assert!(results[1].is_err());
        assert_eq!(results[2].clone()?, "39J-49L-L8T4");
        Ok(())
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let coords = sample_coordinates();
        let expected: Vec<_> = coords.iter().map(encode_coordinate).collect();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| coords.iter().map(encode_coordinate).collect::<Vec<_>>()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().ok(), Some(expected.clone()));
            }
        });
    }
}
