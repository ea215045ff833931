pub mod bounds;
pub mod codec;
pub mod constants;
pub mod dimensions;
pub mod format;
pub mod geometry;
pub mod grid;

pub use bounds::Bounds;
pub use codec::{
    decode, decode_bounds, encode, encode_coordinate, encode_many, encode_symbols, is_in_region,
    prefix_bounds, validate_coordinate,
};
pub use constants::{
    ALPHABET, CODE_LENGTH, FORMATTED_LENGTH, LAT_MAX, LAT_MIN, LAT_SPANS, LON_MAX, LON_MIN,
    LON_SPANS, MAX_LEVEL, SEPARATOR, SYMBOL_GRID,
};
pub use dimensions::{CellDims, cell_dims, meters_per_degree_lon};
pub use format::{format_code, format_symbols, is_valid_digipin, normalize, strip, validate_symbols};
pub use geometry::create_cell_polygon;
pub use grid::{grid_cells, is_symbol, symbol_at, symbol_position};
