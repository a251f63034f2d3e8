// Vkbd Matrix Layout
// Physical key positions and the dense 1-based key index space

use std::fmt;

/// Number of rows in the virtual keyswitch matrix
pub const MATRIX_ROWS: u8 = 4;
/// Number of columns in the virtual keyswitch matrix
pub const MATRIX_COLUMNS: u8 = 16;
/// Number of physical key positions
pub const KEY_COUNT: usize = MATRIX_ROWS as usize * MATRIX_COLUMNS as usize;
/// Number of addressable LEDs
pub const LED_COUNT: usize = 64;

/// Errors for coordinates outside the fixed-size matrix and LED array
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Key position out of range: row {row}, column {col}")]
    PositionOutOfRange { row: u8, col: u8 },

    #[error("Key index out of range: {0} (valid indexes are 1..=64)")]
    IndexOutOfRange(u8),

    #[error("LED index out of range: {0} (valid indexes are 0..64)")]
    LedOutOfRange(usize),
}

/// A (row, column) coordinate inside the keyswitch matrix.
///
/// Construction is bounds-checked, so every `KeyPosition` addresses a real
/// slot of the matrix grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPosition {
    row: u8,
    col: u8,
}

impl KeyPosition {
    /// Create a position, rejecting coordinates outside the matrix
    pub fn new(row: u8, col: u8) -> Result<Self, LayoutError> {
        if row < MATRIX_ROWS && col < MATRIX_COLUMNS {
            Ok(Self { row, col })
        } else {
            Err(LayoutError::PositionOutOfRange { row, col })
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The 1-based key index of this position
    pub fn index(self) -> KeyIndex {
        key_index(self.row, self.col)
    }

    /// Offset into row-major storage (0-based)
    pub(crate) fn offset(self) -> usize {
        self.row as usize * MATRIX_COLUMNS as usize + self.col as usize
    }

    /// Iterate over every position in row-major order
    pub fn all() -> impl Iterator<Item = KeyPosition> {
        (0..MATRIX_ROWS).flat_map(|row| (0..MATRIX_COLUMNS).map(move |col| KeyPosition { row, col }))
    }
}

impl fmt::Display for KeyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}C{}", self.row, self.col)
    }
}

/// Dense, 1-based scalar index of a key position.
///
/// Index 0 is never produced; it is reserved as the "no key" sentinel so
/// that zero-filled arrays of indexes are naturally terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct KeyIndex(u8);

impl KeyIndex {
    /// The "no key" sentinel
    pub const NONE: u8 = 0;

    /// Validate a raw index
    pub fn new(raw: u8) -> Result<Self, LayoutError> {
        if raw >= 1 && (raw as usize) <= KEY_COUNT {
            Ok(Self(raw))
        } else {
            Err(LayoutError::IndexOutOfRange(raw))
        }
    }

    /// Get the raw numeric index
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Recover the (row, column) this index was computed from
    pub fn position(self) -> KeyPosition {
        let offset = self.0 - 1;
        KeyPosition {
            row: offset / MATRIX_COLUMNS,
            col: offset % MATRIX_COLUMNS,
        }
    }
}

impl From<KeyIndex> for u8 {
    fn from(index: KeyIndex) -> Self {
        index.0
    }
}

impl TryFrom<u8> for KeyIndex {
    type Error = LayoutError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        KeyIndex::new(raw)
    }
}

impl fmt::Display for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a (row, column) pair to its key index: `row * MATRIX_COLUMNS + col + 1`.
///
/// Usable in const context. Panics if the coordinate lies outside the matrix;
/// use [`KeyPosition::new`] for coordinates that come from untrusted input.
pub const fn key_index(row: u8, col: u8) -> KeyIndex {
    assert!(row < MATRIX_ROWS && col < MATRIX_COLUMNS, "key position out of range");
    KeyIndex(row * MATRIX_COLUMNS + col + 1)
}

include!(concat!(env!("OUT_DIR"), "/key_positions.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_position_bijection() {
        for pos in KeyPosition::all() {
            let index = pos.index();
            assert!(index.get() >= 1);
            assert_eq!(index.position(), pos);
            assert_eq!(KeyIndex::new(index.get()), Ok(index));
        }
    }

    #[test]
    fn test_index_formula() {
        assert_eq!(key_index(0, 0).get(), 1);
        assert_eq!(key_index(0, 15).get(), 16);
        assert_eq!(key_index(1, 0).get(), 17);
        assert_eq!(key_index(3, 15).get(), 64);
    }

    #[test]
    fn test_generated_constants() {
        assert_eq!(R0C0, key_index(0, 0));
        assert_eq!(R2C9, key_index(2, 9));
        assert_eq!(R3C15.get() as usize, KEY_COUNT);
        assert_eq!(ALL_POSITIONS.len(), KEY_COUNT);
        for (i, index) in ALL_POSITIONS.iter().enumerate() {
            assert_eq!(index.get() as usize, i + 1);
        }
    }

    #[test]
    fn test_position_bounds() {
        assert!(KeyPosition::new(3, 15).is_ok());
        assert_eq!(
            KeyPosition::new(4, 0),
            Err(LayoutError::PositionOutOfRange { row: 4, col: 0 })
        );
        assert!(KeyPosition::new(0, 16).is_err());
    }

    #[test]
    fn test_index_bounds() {
        assert_eq!(KeyIndex::new(0), Err(LayoutError::IndexOutOfRange(0)));
        assert_eq!(KeyIndex::new(65), Err(LayoutError::IndexOutOfRange(65)));
        assert!(KeyIndex::try_from(64).is_ok());
    }

    #[test]
    fn test_position_display() {
        let pos = KeyPosition::new(2, 11).unwrap();
        assert_eq!(pos.to_string(), "R2C11");
    }
}
