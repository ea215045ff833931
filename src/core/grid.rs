use crate::core::constants::{ALPHABET, GRID_SIZE, SYMBOL_GRID};
use std::sync::LazyLock;

/// Reverse lookup from ASCII byte to `(row, col)`, built once on first use.
static SYMBOL_LOOKUP: LazyLock<[Option<(u8, u8)>; 128]> = LazyLock::new(|| {
    let mut table = [None; 128];
    for (row, symbols) in SYMBOL_GRID.iter().enumerate() {
        for (col, &symbol) in symbols.iter().enumerate() {
            table[symbol as usize] = Some((row as u8, col as u8));
        }
    }
    table
});

/// Returns the symbol at `(row, col)`, or `None` outside the 4×4 table.
pub fn symbol_at(row: usize, col: usize) -> Option<char> {
    if row >= GRID_SIZE || col >= GRID_SIZE {
        return None;
    }
    Some(SYMBOL_GRID[row][col])
}

/// Returns the `(row, col)` of an uppercase symbol.
///
/// Lowercase letters are not accepted here; callers normalize first.
///
/// # Example
/// ```
/// use digipin_rs::symbol_position;
///
/// assert_eq!(symbol_position('F'), Some((0, 0)));
/// assert_eq!(symbol_position('T'), Some((3, 3)));
/// assert_eq!(symbol_position('A'), None);
/// ```
pub fn symbol_position(symbol: char) -> Option<(usize, usize)> {
    if !symbol.is_ascii() {
        return None;
    }
    SYMBOL_LOOKUP[symbol as usize].map(|(row, col)| (row as usize, col as usize))
}

/// Returns true if `symbol` is one of the 16 grid symbols.
pub fn is_symbol(symbol: char) -> bool {
    symbol_position(symbol).is_some()
}

/// Iterates the grid as `(row, col, symbol)` in table order.
pub fn grid_cells() -> impl Iterator<Item = (usize, usize, char)> {
    (0..GRID_SIZE)
        .flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col, SYMBOL_GRID[row][col])))
}
