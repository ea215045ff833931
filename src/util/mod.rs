pub mod coord;
pub mod error;
pub mod parse;
pub mod urls;

pub use coord::{Coordinate, LatLon};
pub use error::{Axis, DigipinError};
pub use parse::{parse_coordinate, parse_geojson, parse_geometry, parse_wkt};
pub use urls::{apple_maps_url, google_maps_url};
