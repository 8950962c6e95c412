/// Number of row words, enough for the largest supported symbol (version 3).
pub const QR_LINES: usize = 29;

/// A QR symbol stored as one 32-bit word per row.
///
/// Module `x` of row `y` lives in bit `31 - x` of `rows[y]` (MSB first).
/// Only the first `size` rows and the top `size` bits of each row are
/// meaningful; the rest stay light.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bitmap {
    rows: [u32; QR_LINES],
}

impl Bitmap {
    /// An all-light bitmap.
    pub const fn new() -> Self {
        Self { rows: [0; QR_LINES] }
    }

    /// The packed row words.
    pub fn rows(&self) -> &[u32; QR_LINES] {
        &self.rows
    }

    /// Returns the color of the module at the given coordinates (`true` is dark).
    ///
    /// Coordinates must lie inside the symbol. Anything else is a caller
    /// error: `y >= QR_LINES` panics on the index, `x >= 32` overflows the
    /// shift.
    #[inline]
    pub fn get(&self, x: u8, y: u8) -> bool {
        (self.rows[usize::from(y)] << x) >> 31 != 0
    }

    pub(crate) fn set(&mut self, x: u8, y: u8, isdark: bool) {
        let row = &mut self.rows[usize::from(y)];
        if isdark {
            *row |= bit(x);
        } else {
            *row &= !bit(x);
        }
    }

    pub(crate) fn row(&self, y: u8) -> u32 {
        self.rows[usize::from(y)]
    }

    pub(crate) fn xor_row(&mut self, y: u8, pattern: u32) {
        self.rows[usize::from(y)] ^= pattern;
    }

    pub(crate) fn fill_rectangle(&mut self, left: u8, top: u8, width: u8, height: u8) {
        let span = line_mask(width) >> left;
        for row in &mut self.rows[usize::from(top)..usize::from(top + height)] {
            *row |= span;
        }
    }

    /// Number of dark modules inside a `size`×`size` symbol.
    pub fn count_dark(&self, size: u8) -> u32 {
        let valid = line_mask(size);
        self.rows[..usize::from(size)]
            .iter()
            .map(|row| (row & valid).count_ones())
            .sum()
    }

    /// Swaps rows and columns, so column scans can reuse the row code.
    pub(crate) fn transpose(&self, size: u8) -> Self {
        let mut result = Self::new();
        for y in 0..size {
            let mut row = self.row(y) & line_mask(size);
            while row != 0 {
                let x = row.leading_zeros() as u8;
                result.rows[usize::from(x)] |= bit(y);
                row &= !bit(x);
            }
        }
        result
    }
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

/// The row bit holding module `x`.
#[inline]
pub(crate) const fn bit(x: u8) -> u32 {
    0x8000_0000 >> x
}

/// The top `width` bits of a row word.
#[inline]
pub(crate) const fn line_mask(width: u8) -> u32 {
    if width == 0 {
        0
    } else {
        !0u32 << (32 - width as u32)
    }
}
