use crate::core::constants::{CODE_LENGTH, SEPARATOR};
use crate::core::grid::is_symbol;
use crate::util::error::DigipinError;

/// Positions (in symbols) before which a separator is rendered.
const SEPARATOR_POSITIONS: [usize; 2] = [3, 6];

fn symbols_of(code: &str) -> impl Iterator<Item = char> + '_ {
    code.chars()
        .filter(|c| !c.is_whitespace() && *c != SEPARATOR)
        .map(|c| c.to_ascii_uppercase())
}

/// Uppercases a code and removes whitespace and separators.
///
/// Separators are dropped wherever they appear; their positions are not checked.
///
/// # Example
/// ```
/// use digipin_rs::normalize;
///
/// assert_eq!(normalize(" 4p3-33c-4635 "), "4P333C4635");
/// ```
pub fn normalize(code: &str) -> String {
    symbols_of(code).collect()
}

/// Removes display separators from a formatted code.
///
/// Inverse of [`format_code`]: `strip(&format_code(x)?) == x` for any
/// canonical 10-symbol string.
pub fn strip(formatted: &str) -> String {
    normalize(formatted)
}

/// Normalizes a full code and checks its length and alphabet.
///
/// Returns the 10 uppercase symbols without separators.
///
/// # Errors
///
/// - [`DigipinError::InvalidFormat`] - not exactly 10 symbols after normalization
/// - [`DigipinError::InvalidSymbol`] - a character outside the alphabet, with its
///   0-based position in the normalized code
pub fn validate_symbols(code: &str) -> Result<String, DigipinError> {
    let normalized = normalize(code);
    let length = normalized.chars().count();
    if length != CODE_LENGTH {
        return Err(DigipinError::InvalidFormat { length });
    }
    check_alphabet(&normalized)?;
    Ok(normalized)
}

/// Like [`validate_symbols`] but accepts any cell prefix of 1 to 10 symbols.
pub(crate) fn validate_prefix(code: &str) -> Result<String, DigipinError> {
    let normalized = normalize(code);
    let length = normalized.chars().count();
    if length == 0 || length > CODE_LENGTH {
        return Err(DigipinError::InvalidFormat { length });
    }
    check_alphabet(&normalized)?;
    Ok(normalized)
}

fn check_alphabet(symbols: &str) -> Result<(), DigipinError> {
    match symbols
        .chars()
        .enumerate()
        .find(|(_, symbol)| !is_symbol(*symbol))
    {
        Some((position, symbol)) => Err(DigipinError::InvalidSymbol { symbol, position }),
        None => Ok(()),
    }
}

/// Returns true if `code` is a well-formed full DIGIPIN.
///
/// Runs the same checks as decoding without computing a coordinate.
///
/// # Example
/// ```
/// use digipin_rs::is_valid_digipin;
///
/// assert!(is_valid_digipin("4P3-33C-4635"));
/// assert!(is_valid_digipin("4p333c4635"));
/// assert!(!is_valid_digipin("4P3-33C-463"));
/// assert!(!is_valid_digipin("ABCDEFGHIJ"));
/// ```
pub fn is_valid_digipin(code: &str) -> bool {
    let mut length = 0;
    for symbol in symbols_of(code) {
        if !is_symbol(symbol) {
            return false;
        }
        length += 1;
    }
    length == CODE_LENGTH
}

/// Validates a full code and renders it as `XXX-XXX-XXXX`.
///
/// # Example
/// ```
/// use digipin_rs::format_code;
///
/// assert_eq!(format_code("4p333c4635").unwrap(), "4P3-33C-4635");
/// ```
pub fn format_code(code: &str) -> Result<String, DigipinError> {
    let symbols = validate_symbols(code)?;
    Ok(format_symbols(&symbols))
}

/// Inserts separators into an already-normalized symbol string.
///
/// Works for prefixes too; a separator is only written when a symbol follows
/// it, so `"4P3"` stays `"4P3"` and `"4P33"` becomes `"4P3-3"`.
pub fn format_symbols(symbols: &str) -> String {
    let mut out = String::with_capacity(symbols.len() + SEPARATOR_POSITIONS.len());
    for (i, symbol) in symbols.chars().enumerate() {
        if SEPARATOR_POSITIONS.contains(&i) {
            out.push(SEPARATOR);
        }
        out.push(symbol);
    }
    out
}
