//! QR code encoding for versions 1 to 3 at error correction level L.
//!
//! A [`QrContext`] is evaluated once against a version and a byte slice, then
//! encoded into a fixed-size [`Bitmap`]. Nothing is allocated; all working
//! storage is sized for version 3.
use core::convert::TryFrom;

use log::{debug, error, trace};

use crate::bitmap::Bitmap;
use crate::codewords;
use crate::config::{Arithmetic, Scoring, Speed};
use crate::ecc::{self, Bitwise, Tables};
use crate::error::EvalError;
use crate::mask::{Mask, ModuleScan, Scorer, WordScan};

/// Total codewords of the largest supported version.
pub const MAX_CODEWORDS: usize = 70;

/// Format information bits of error correction level L.
const ECL_LOW_FORMAT_BITS: u32 = 1;

/// XOR pattern applied to the 15 format information bits.
const FORMAT_MASK: u32 = 0x5412;

/// Byte-mode capacity per version at level L.
const CAPACITY: [u8; 3] = [17, 32, 53];

const LAYOUTS: [Layout; 3] = [
    Layout {
        total_codewords: 26,
        data_codewords: 19,
        ecc_per_block: 7,
        num_blocks: 1,
        remainder_bits: 0,
    },
    Layout {
        total_codewords: 44,
        data_codewords: 34,
        ecc_per_block: 10,
        num_blocks: 1,
        remainder_bits: 7,
    },
    Layout {
        total_codewords: 70,
        data_codewords: 55,
        ecc_per_block: 15,
        num_blocks: 1,
        remainder_bits: 7,
    },
];

/// A QR code version (1–3).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Version(u8);

impl Version {
    /// The smallest symbol, 21×21 modules.
    pub const MIN: Version = Version(1);

    /// The largest supported symbol, 29×29 modules.
    pub const MAX: Version = Version(3);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 3].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 3].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Width and height in modules: `4 * version + 17`.
    pub const fn size(self) -> u8 {
        self.0 * 4 + 17
    }

    /// Maximum number of input bytes.
    pub const fn capacity(self) -> usize {
        CAPACITY[self.index()] as usize
    }

    /// Codeword layout of this version.
    pub const fn layout(self) -> Layout {
        LAYOUTS[self.index()]
    }

    /// Center of the single alignment pattern, on the diagonal.
    pub const fn alignment_center(self) -> Option<u8> {
        if self.0 >= 2 {
            Some(self.size() - 7)
        } else {
            None
        }
    }

    const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u8> for Version {
    type Error = EvalError;

    fn try_from(ver: u8) -> Result<Self, Self::Error> {
        if (Version::MIN.value()..=Version::MAX.value()).contains(&ver) {
            Ok(Version(ver))
        } else {
            Err(EvalError::UnsupportedVersion(ver))
        }
    }
}

/// Codeword layout parameters of a version.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Layout {
    /// Data plus error correction codewords.
    pub total_codewords: u8,
    pub data_codewords: u8,
    pub ecc_per_block: u8,
    pub num_blocks: u8,
    /// Data modules left over after the last codeword; they stay light
    /// before masking.
    pub remainder_bits: u8,
}

impl Layout {
    pub const fn ecc_codewords(&self) -> u8 {
        self.ecc_per_block * self.num_blocks
    }

    /// Blocks holding one data codeword less than the others.
    pub const fn num_short_blocks(&self) -> usize {
        let numblocks = self.num_blocks as usize;
        numblocks - (self.total_codewords as usize % numblocks)
    }

    pub const fn short_block_data_len(&self) -> usize {
        self.total_codewords as usize / self.num_blocks as usize - self.ecc_per_block as usize
    }
}

/// Encoder state: the evaluated parameters, a borrowed view of the input and
/// the symbol bitmap.
///
/// # Example
///
/// ```rust
/// use qrmcu::{QrContext, Speed};
///
/// let mut ctx = QrContext::new(Speed::Small);
/// assert!(ctx.evaluate(1, b"hello"));
/// ctx.encode();
/// assert_eq!(ctx.size(), 21);
/// assert!(ctx.get_module(0, 0));
/// ```
#[derive(Clone, Debug)]
pub struct QrContext<'a> {
    /// 21, 25 or 29 once evaluated, 0 before.
    size: u8,
    speed: Speed,
    data: &'a [u8],
    layout: Option<Layout>,
    /// Set by a completed encode, cleared by every evaluation.
    encoded: bool,
    bitmap: Bitmap,
}

impl<'a> QrContext<'a> {
    /// An unevaluated context using the given speed tier.
    pub const fn new(speed: Speed) -> Self {
        Self {
            size: 0,
            speed,
            data: &[],
            layout: None,
            encoded: false,
            bitmap: Bitmap::new(),
        }
    }

    /// Returns `false` if `data` does not fit the chosen version (17, 32 or 53
    /// bytes for versions 1, 2 and 3) or the version is not 1 to 3.
    ///
    /// Must succeed before [`encode`](Self::encode). A failed evaluation
    /// leaves the context unevaluated.
    pub fn evaluate(&mut self, version: u8, data: &'a [u8]) -> bool {
        match self.try_evaluate(version, data) {
            Ok(_) => true,
            Err(e) => {
                debug!("evaluation rejected: {}", e);
                false
            }
        }
    }

    /// Same as [`evaluate`](Self::evaluate) but reports why the input was
    /// rejected. On success returns the codeword layout now stored in the
    /// context.
    pub fn try_evaluate(&mut self, version: u8, data: &'a [u8]) -> Result<Layout, EvalError> {
        self.size = 0;
        self.layout = None;
        self.encoded = false;

        let ver = Version::try_from(version)?;
        let capacity = ver.capacity();
        if data.len() > capacity {
            return Err(EvalError::DataOverCapacity {
                len: data.len(),
                capacity,
            });
        }

        let layout = ver.layout();
        self.size = ver.size();
        self.data = data;
        self.layout = Some(layout);
        debug!(
            "version {} holds {} of {} bytes, {} data + {} ecc codewords",
            ver.value(),
            data.len(),
            capacity,
            layout.data_codewords,
            layout.ecc_codewords()
        );
        Ok(layout)
    }

    /// Encodes the evaluated input, picking the mask with the lowest penalty.
    /// Repeated calls produce the same bitmap.
    ///
    /// Calling this on a context that was not successfully evaluated is a
    /// caller bug; it is logged and the bitmap is left as it was.
    pub fn encode(&mut self) {
        self.encode_codewords(None);
    }

    /// Encodes the evaluated input with a fixed mask instead of searching.
    pub fn encode_with_mask(&mut self, mask: Mask) {
        self.encode_codewords(Some(mask));
    }

    /// Returns the color of the module at the given coordinates (`true` is
    /// dark). Only meaningful for `x, y < size()` after encoding.
    #[inline]
    pub fn get_module(&self, x: u8, y: u8) -> bool {
        self.bitmap.get(x, y)
    }

    /// Symbol width in modules, 0 if not evaluated.
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn version(&self) -> Option<Version> {
        self.layout.map(|_| Version((self.size - 17) / 4))
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// The mask recorded in the format information of the encoded symbol.
    ///
    /// `None` until [`encode`](Self::encode) or
    /// [`encode_with_mask`](Self::encode_with_mask) has run for the current
    /// evaluation.
    pub fn mask(&self) -> Option<Mask> {
        if !self.encoded {
            return None;
        }
        let bits = read_format_bits(&self.bitmap) ^ FORMAT_MASK;
        Some(Mask::new(((bits >> 10) & 7) as u8))
    }

    /// Penalty score of the encoded symbol under the four masking rules, 0 if
    /// the current evaluation has not been encoded.
    pub fn penalty(&self) -> u32 {
        if !self.encoded {
            return 0;
        }
        match self.speed.scoring() {
            Scoring::Modules => ModuleScan::penalty(&self.bitmap, self.size, u32::MAX),
            Scoring::Words => WordScan::penalty(&self.bitmap, self.size, u32::MAX),
        }
    }

    fn encode_codewords(&mut self, msk: Option<Mask>) {
        let (Some(layout), Some(version)) = (self.layout, self.version()) else {
            error!("encode called on a context that was not evaluated");
            return;
        };
        let size = self.size;

        // Compute ECC
        let datalen = usize::from(layout.data_codewords);
        let mut datacodewords = [0u8; MAX_CODEWORDS];
        codewords::assemble(self.data, &mut datacodewords[..datalen]);
        let mut allbuffer = [0u8; MAX_CODEWORDS];
        let allcodewords = &mut allbuffer[..usize::from(layout.total_codewords)];
        let data = &datacodewords[..datalen];
        match self.speed.arithmetic() {
            Arithmetic::Bitwise => ecc::add_ecc_and_interleave::<Bitwise>(data, &layout, allcodewords),
            Arithmetic::Tables => ecc::add_ecc_and_interleave::<Tables>(data, &layout, allcodewords),
        }

        // Draw modules
        let funcmods = function_modules_marked(version);
        let mut result = funcmods.clone();
        draw_codewords(&mut result, &funcmods, allcodewords, size);
        draw_light_function_modules(&mut result, version);

        // Do masking
        let msk = msk.unwrap_or_else(|| match self.speed.scoring() {
            Scoring::Modules => select_mask::<ModuleScan>(&mut result, &funcmods, size),
            Scoring::Words => select_mask::<WordScan>(&mut result, &funcmods, size),
        });
        msk.apply(&mut result, &funcmods, size);
        draw_format_bits(&mut result, msk, size);
        self.bitmap = result;
        self.encoded = true;
    }
}

impl Default for QrContext<'_> {
    fn default() -> Self {
        Self::new(Speed::default())
    }
}

/// Tries all eight masks in order and keeps the first with the lowest
/// penalty. `grid` is returned unmasked.
fn select_mask<S: Scorer>(grid: &mut Bitmap, funcmods: &Bitmap, size: u8) -> Mask {
    let mut best = Mask::new(0);
    let mut minpenalty = u32::MAX;
    for msk in Mask::ALL {
        msk.apply(grid, funcmods, size);
        draw_format_bits(grid, msk, size);
        let penalty: u32 = S::penalty(grid, size, minpenalty);
        trace!("mask {} scored {}", msk.value(), penalty);
        if penalty < minpenalty {
            best = msk;
            minpenalty = penalty;
        }
        msk.apply(grid, funcmods, size); // Undoes the mask due to XOR
    }
    debug!("selected mask {} with penalty {}", best.value(), minpenalty);
    best
}

/// Marks every function module of `ver` dark: finders with separators and
/// format areas, timing patterns and the alignment pattern.
fn function_modules_marked(ver: Version) -> Bitmap {
    let size: u8 = ver.size();
    let mut result = Bitmap::new();
    result.fill_rectangle(6, 0, 1, size);
    result.fill_rectangle(0, 6, size, 1);
    result.fill_rectangle(0, 0, 9, 9);
    result.fill_rectangle(size - 8, 0, 8, 9);
    result.fill_rectangle(0, size - 8, 9, 8);
    if let Some(pos) = ver.alignment_center() {
        result.fill_rectangle(pos - 2, pos - 2, 5, 5);
    }
    result
}

/// Clears the light modules of the function patterns drawn dark by
/// [`function_modules_marked`]. Format bits are drawn separately.
fn draw_light_function_modules(grid: &mut Bitmap, ver: Version) {
    let size: u8 = ver.size();
    for i in (7..size - 7).step_by(2) {
        grid.set(6, i, false);
        grid.set(i, 6, false);
    }

    // Finder rings and separators
    let mut clear = |x: i32, y: i32| {
        let range = 0..i32::from(size);
        if range.contains(&x) && range.contains(&y) {
            grid.set(x as u8, y as u8, false);
        }
    };
    for dy in -4i32..=4 {
        for dx in -4i32..=4 {
            let dist: i32 = dx.abs().max(dy.abs());
            if dist == 2 || dist == 4 {
                clear(3 + dx, 3 + dy);
                clear(i32::from(size) - 4 + dx, 3 + dy);
                clear(3 + dx, i32::from(size) - 4 + dy);
            }
        }
    }

    if let Some(pos) = ver.alignment_center() {
        for dy in 0..3u8 {
            for dx in 0..3u8 {
                grid.set(pos - 1 + dx, pos - 1 + dy, dx == 1 && dy == 1);
            }
        }
    }
}

/// The 15 format information bits for level L and `mask`, BCH protected and
/// masked.
fn format_bits(mask: Mask) -> u32 {
    let data = (ECL_LOW_FORMAT_BITS << 3) | u32::from(mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ FORMAT_MASK
}

fn draw_format_bits(grid: &mut Bitmap, mask: Mask, size: u8) {
    let bits: u32 = format_bits(mask);

    // First copy, around the top left finder
    for i in 0..6 {
        grid.set(8, i, get_bit(bits, i));
    }
    grid.set(8, 7, get_bit(bits, 6));
    grid.set(8, 8, get_bit(bits, 7));
    grid.set(7, 8, get_bit(bits, 8));
    for i in 9..15 {
        grid.set(14 - i, 8, get_bit(bits, i));
    }

    // Second copy, split between the other two finders
    for i in 0..8 {
        grid.set(size - 1 - i, 8, get_bit(bits, i));
    }
    for i in 8..15 {
        grid.set(8, size - 15 + i, get_bit(bits, i));
    }
    grid.set(8, size - 8, true);
}

fn read_format_bits(grid: &Bitmap) -> u32 {
    let mut bits: u32 = 0;
    let mut put = |i: u8, x: u8, y: u8| bits |= u32::from(grid.get(x, y)) << i;
    for i in 0..6 {
        put(i, 8, i);
    }
    put(6, 8, 7);
    put(7, 8, 8);
    put(8, 7, 8);
    for i in 9..15 {
        put(i, 14 - i, 8);
    }
    bits
}

/// Threads the codeword bits through the non-function modules in zig-zag
/// order: column pairs from the right, alternating upward and downward,
/// skipping the vertical timing column.
fn draw_codewords(grid: &mut Bitmap, funcmods: &Bitmap, data: &[u8], size: u8) {
    let size = i32::from(size);
    let mut i: usize = 0;
    let mut right: i32 = size - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        for vert in 0..size {
            for j in 0..2 {
                let x = (right - j) as u8;
                let upward: bool = ((right + 1) & 2) == 0;
                let y = (if upward { size - 1 - vert } else { vert }) as u8;
                if !funcmods.get(x, y) && i < data.len() * 8 {
                    grid.set(x, y, get_bit(data[i >> 3].into(), 7 - ((i as u8) & 7)));
                    i += 1;
                }
            }
        }
        right -= 2;
    }
    debug_assert_eq!(i, data.len() * 8);
}

fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads the non-function modules back in placement order.
    fn read_codewords(grid: &Bitmap, funcmods: &Bitmap, size: u8, out: &mut [u8]) -> usize {
        out.fill(0);
        let size = i32::from(size);
        let mut i: usize = 0;
        let mut right: i32 = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x = (right - j) as u8;
                    let upward: bool = ((right + 1) & 2) == 0;
                    let y = (if upward { size - 1 - vert } else { vert }) as u8;
                    if !funcmods.get(x, y) {
                        if i < out.len() * 8 && grid.get(x, y) {
                            out[i >> 3] |= 0x80 >> (i & 7);
                        }
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        i
    }

    fn encoded(version: u8, data: &[u8], speed: Speed) -> QrContext<'_> {
        let mut ctx = QrContext::new(speed);
        assert!(ctx.evaluate(version, data));
        ctx.encode();
        ctx
    }

    fn assert_finder(ctx: &QrContext, left: u8, top: u8) {
        for dy in 0..7u8 {
            for dx in 0..7u8 {
                let dist = (i32::from(dx) - 3).abs().max((i32::from(dy) - 3).abs());
                assert_eq!(ctx.get_module(left + dx, top + dy), dist != 2, "finder at ({}, {})", left + dx, top + dy);
            }
        }
    }

    #[test]
    fn test_capacity_boundaries() {
        let buf = [0u8; 54];
        for (version, capacity) in [(1u8, 17usize), (2, 32), (3, 53)] {
            let mut ctx = QrContext::default();
            assert!(ctx.evaluate(version, &buf[..0]));
            assert!(ctx.evaluate(version, &buf[..capacity]));
            assert_eq!(ctx.size(), version * 4 + 17);
            assert!(!ctx.evaluate(version, &buf[..capacity + 1]));
            assert_eq!(ctx.size(), 0);
            assert!(ctx.layout().is_none());
        }
    }

    #[test]
    fn test_capacity_matches_layout() {
        for ver in 1..=3 {
            let ver = Version::new(ver);
            let layout = ver.layout();
            assert_eq!(ver.capacity(), usize::from(layout.data_codewords) - 2);
            assert_eq!(layout.data_codewords + layout.ecc_codewords(), layout.total_codewords);
        }
    }

    #[test]
    fn test_unsupported_versions() {
        let mut ctx = QrContext::default();
        assert!(!ctx.evaluate(0, b"A"));
        assert!(!ctx.evaluate(4, b"A"));
        assert_eq!(ctx.try_evaluate(4, b"A"), Err(EvalError::UnsupportedVersion(4)));
        assert_eq!(
            ctx.try_evaluate(1, &[0u8; 18]),
            Err(EvalError::DataOverCapacity { len: 18, capacity: 17 })
        );
    }

    #[test]
    fn test_failed_evaluation_discards_previous() {
        let mut ctx = QrContext::default();
        assert!(ctx.evaluate(2, b"first"));
        assert_eq!(ctx.version(), Some(Version::new(2)));
        assert!(!ctx.evaluate(1, &[0u8; 20]));
        assert_eq!(ctx.version(), None);
    }

    #[test]
    fn test_encode_without_evaluation_is_a_no_op() {
        let mut ctx = QrContext::default();
        ctx.encode();
        assert_eq!(ctx.bitmap(), &Bitmap::new());
    }

    #[test]
    fn test_raw_module_counts() {
        // 208, 359 and 567 data modules for versions 1 to 3
        for ver in 1..=3 {
            let ver = Version::new(ver);
            let layout = ver.layout();
            let size = ver.size();
            let funcmods = function_modules_marked(ver);
            let free = u32::from(size) * u32::from(size) - funcmods.count_dark(size);
            assert_eq!(free, u32::from(layout.total_codewords) * 8 + u32::from(layout.remainder_bits));
        }
    }

    #[test]
    fn test_single_byte_version1() {
        let ctx = encoded(1, b"A", Speed::default());
        assert_eq!(ctx.size(), 21);
        assert_finder(&ctx, 0, 0);
        assert_finder(&ctx, 14, 0);
        assert_finder(&ctx, 0, 14);
        assert!(ctx.get_module(8, 13));
        assert!(ctx.bitmap().rows()[21..].iter().all(|&row| row == 0));
        assert!(ctx.bitmap().rows()[..21].iter().all(|&row| row & 0x7ff == 0));
    }

    #[test]
    fn test_separators_and_timing() {
        for version in 1..=3u8 {
            let ctx = encoded(version, b"timing", Speed::Small);
            let size = ctx.size();
            for i in 0..8 {
                assert!(!ctx.get_module(7, i));
                assert!(!ctx.get_module(i, 7));
                assert!(!ctx.get_module(size - 8, i));
                assert!(!ctx.get_module(size - 1 - i, 7));
                assert!(!ctx.get_module(7, size - 1 - i));
                assert!(!ctx.get_module(i, size - 8));
            }
            for i in 8..size - 8 {
                assert_eq!(ctx.get_module(i, 6), i % 2 == 0);
                assert_eq!(ctx.get_module(6, i), i % 2 == 0);
            }
        }
    }

    #[test]
    fn test_alignment_pattern_version3() {
        let data = [0u8; 53];
        let ctx = encoded(3, &data, Speed::Fast);
        assert_eq!(ctx.size(), 29);
        assert_finder(&ctx, 0, 0);
        assert_finder(&ctx, 22, 0);
        assert_finder(&ctx, 0, 22);
        for dy in 0..5u8 {
            for dx in 0..5u8 {
                let dist = (i32::from(dx) - 2).abs().max((i32::from(dy) - 2).abs());
                assert_eq!(ctx.get_module(20 + dx, 20 + dy), dist != 1);
            }
        }
        assert_eq!(Version::new(2).alignment_center(), Some(18));
        assert_eq!(Version::new(1).alignment_center(), None);
    }

    #[test]
    fn test_format_bits_known_values() {
        // Level L format words from the standard's table
        assert_eq!(format_bits(Mask::new(0)), 0x77c4);
        assert_eq!(format_bits(Mask::new(7)), 0x6976);
    }

    #[test]
    fn test_format_information_decodes_to_mask() {
        for version in 1..=3u8 {
            let ctx = encoded(version, b"format", Speed::Balanced);
            let size = ctx.size();
            let first = read_format_bits(ctx.bitmap());
            let mut second: u32 = 0;
            for i in 0..8 {
                second |= u32::from(ctx.get_module(size - 1 - i, 8)) << i;
            }
            for i in 8..15u8 {
                second |= u32::from(ctx.get_module(8, size - 15 + i)) << i;
            }
            assert_eq!(first, second);
            assert_eq!(Some(first), ctx.mask().map(format_bits));
            let unmasked = first ^ FORMAT_MASK;
            assert_eq!(unmasked >> 13, ECL_LOW_FORMAT_BITS);
            assert!(ctx.get_module(8, size - 8));
        }
    }

    #[test]
    fn test_mask_requires_encoding() {
        let mut ctx = QrContext::default();
        assert_eq!(ctx.mask(), None);
        assert_eq!(ctx.penalty(), 0);
        assert!(ctx.evaluate(1, b"first"));
        assert_eq!(ctx.mask(), None);
        ctx.encode_with_mask(Mask::new(3));
        assert_eq!(ctx.mask(), Some(Mask::new(3)));
        assert!(ctx.penalty() > 0);

        // a new evaluation invalidates the previous symbol
        assert!(ctx.evaluate(2, b"second"));
        assert_eq!(ctx.mask(), None);
        assert_eq!(ctx.penalty(), 0);
        assert!(!ctx.evaluate(4, b"third"));
        assert_eq!(ctx.mask(), None);
    }

    #[test]
    fn test_deterministic() {
        let data = b"repeatable";
        let mut ctx = encoded(2, data, Speed::default());
        let first = ctx.bitmap().clone();
        ctx.encode();
        assert_eq!(ctx.bitmap(), &first);
    }

    #[test]
    fn test_tiers_are_bit_identical() {
        let inputs: [&[u8]; 5] = [b"", b"A", b"0123456789abcdef", &[0xff; 32], &[0x00; 53]];
        for data in inputs {
            let version = match data.len() {
                0..=17 => 1,
                18..=32 => 2,
                _ => 3,
            };
            let reference = encoded(version, data, Speed::Small);
            for speed in Speed::ALL {
                let ctx = encoded(version, data, speed);
                assert_eq!(ctx.bitmap(), reference.bitmap(), "{:?}", speed);
                assert_eq!(ctx.mask(), reference.mask());
            }
        }
    }

    #[test]
    fn test_selected_mask_has_lowest_penalty() {
        for (version, data) in [(1u8, &b"Hello"[..]), (2, &b"mask selection check"[..]), (3, &[0u8; 40][..])] {
            let mut ctx = encoded(version, data, Speed::Fast);
            let chosen = ctx.mask().unwrap();
            let chosen_penalty = ctx.penalty();
            for msk in Mask::ALL {
                ctx.encode_with_mask(msk);
                assert_eq!(ctx.mask(), Some(msk));
                let penalty = ctx.penalty();
                assert!(chosen_penalty <= penalty);
                if msk < chosen {
                    assert!(chosen_penalty < penalty);
                }
            }
        }
    }

    #[test]
    fn test_codewords_round_trip() {
        let data = b"zig-zag order";
        for version in 1..=3u8 {
            let ctx = encoded(version, data, Speed::Small);
            let ver = Version::new(version);
            let layout = ver.layout();
            let size = ver.size();
            let funcmods = function_modules_marked(ver);

            let mut grid = ctx.bitmap().clone();
            ctx.mask().unwrap().apply(&mut grid, &funcmods, size);
            let mut read = [0u8; MAX_CODEWORDS];
            let total = usize::from(layout.total_codewords);
            let placed = read_codewords(&grid, &funcmods, size, &mut read[..total]);
            assert_eq!(placed, total * 8 + usize::from(layout.remainder_bits));

            let datalen = usize::from(layout.data_codewords);
            let mut expected = [0u8; MAX_CODEWORDS];
            codewords::assemble(data, &mut expected[..datalen]);
            let mut all = [0u8; MAX_CODEWORDS];
            ecc::add_ecc_and_interleave::<Bitwise>(&expected[..datalen], &layout, &mut all[..total]);
            assert_eq!(&read[..total], &all[..total]);
        }
    }
}
