/// Southern edge of the DIGIPIN region (degrees)
pub const LAT_MIN: f64 = 2.5;

/// Northern edge of the DIGIPIN region (degrees)
pub const LAT_MAX: f64 = 38.5;

/// Western edge of the DIGIPIN region (degrees)
pub const LON_MIN: f64 = 63.5;

/// Eastern edge of the DIGIPIN region (degrees)
pub const LON_MAX: f64 = 99.5;

/// Number of symbols in a full code
pub const CODE_LENGTH: usize = 10;

/// Length of a full code rendered as `XXX-XXX-XXXX`
pub const FORMATTED_LENGTH: usize = 12;

/// Display separator
pub const SEPARATOR: char = '-';

/// Deepest subdivision level; one symbol per level
pub const MAX_LEVEL: u8 = 10;

/// Rows and columns per subdivision
pub(crate) const GRID_SIZE: usize = 4;

/// Symbol table, row 0 is the northernmost band and column 0 the westernmost.
pub const SYMBOL_GRID: [[char; 4]; 4] = [
    ['F', 'C', '9', '8'],
    ['J', '3', '2', '7'],
    ['K', '4', '5', '6'],
    ['L', 'M', 'P', 'T'],
];

/// The 16 symbols in grid order
pub const ALPHABET: [char; 16] = [
    'F', 'C', '9', '8', 'J', '3', '2', '7', 'K', '4', '5', '6', 'L', 'M', 'P', 'T',
];

/// Cell height in degrees for each level (0-10)
pub const LAT_SPANS: [f64; 11] = [
    36.0,
    9.0,
    2.25,
    0.5625,
    0.140625,
    0.03515625,
    0.0087890625,
    0.002197265625,
    0.00054931640625,
    0.0001373291015625,
    0.000034332275390625,
];

/// Cell width in degrees for each level (0-10)
pub const LON_SPANS: [f64; 11] = LAT_SPANS;
