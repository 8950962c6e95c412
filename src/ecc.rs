//! Reed-Solomon error correction over GF(2^8/0x11D).

use crate::qrcode::Layout;

/// Largest error correction codeword count per block among versions 1 to 3.
pub const MAX_ECC_PER_BLOCK: usize = 15;

/// Multiplication in GF(256) modulo x^8 + x^4 + x^3 + x^2 + 1.
pub trait Field {
    fn multiply(x: u8, y: u8) -> u8;
}

/// Russian-peasant multiply, no tables.
pub struct Bitwise;

impl Field for Bitwise {
    #[inline]
    fn multiply(x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}

/// Multiply through the log/antilog tables.
pub struct Tables;

impl Field for Tables {
    #[inline]
    fn multiply(x: u8, y: u8) -> u8 {
        if x == 0 || y == 0 {
            return 0;
        }
        let sum = usize::from(LOG_TABLE[usize::from(x)]) + usize::from(LOG_TABLE[usize::from(y)]);
        EXP_TABLE[sum % 255]
    }
}

/// Powers of the generator 0x02. `EXP_TABLE[255]` wraps back to 1.
pub static EXP_TABLE: [u8; 256] = build_exp_table();

/// Discrete logarithms; `LOG_TABLE[0]` is unused.
pub static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut value: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = value as u8;
        value <<= 1;
        if value & 0x100 != 0 {
            value ^= 0x11d;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Divisor polynomial for a fixed number of error correction codewords.
pub struct ReedSolomonGenerator<F: Field> {
    divisor: [u8; MAX_ECC_PER_BLOCK],
    degree: usize,
    _field: core::marker::PhantomData<F>,
}

impl<F: Field> ReedSolomonGenerator<F> {
    /// Builds the product (x - 2^0)(x - 2^1)...(x - 2^(degree-1)), leading
    /// term dropped, coefficients from highest to lowest power.
    pub fn new(degree: usize) -> Self {
        assert!((1..=MAX_ECC_PER_BLOCK).contains(&degree), "Degree out of range");
        let mut result = Self {
            divisor: [0u8; MAX_ECC_PER_BLOCK],
            degree,
            _field: core::marker::PhantomData,
        };
        let divisor: &mut [u8] = &mut result.divisor[..degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = F::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = F::multiply(root, 0x02);
        }
        result
    }

    pub fn divisor(&self) -> &[u8] {
        &self.divisor[..self.degree]
    }

    /// Writes the remainder of `data` times x^degree divided by the generator.
    pub fn compute_remainder(&self, data: &[u8], result: &mut [u8]) {
        assert_eq!(result.len(), self.degree);
        result.fill(0);
        for b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            result[self.degree - 1] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= F::multiply(y, factor);
            }
        }
    }
}

/// Splits `data` into the blocks of `layout`, appends each block's error
/// correction codewords and interleaves everything into `result`.
///
/// Short blocks come first; long blocks carry one extra data codeword.
pub fn add_ecc_and_interleave<F: Field>(data: &[u8], layout: &Layout, result: &mut [u8]) {
    assert_eq!(data.len(), usize::from(layout.data_codewords));
    assert_eq!(result.len(), usize::from(layout.total_codewords));
    let numblocks: usize = layout.num_blocks.into();
    let blockecclen: usize = layout.ecc_per_block.into();
    let numshortblocks: usize = layout.num_short_blocks();
    let shortblockdatalen: usize = layout.short_block_data_len();

    let rs = ReedSolomonGenerator::<F>::new(blockecclen);
    let mut eccbuf = [0u8; MAX_ECC_PER_BLOCK];
    let ecc: &mut [u8] = &mut eccbuf[..blockecclen];
    let mut dat: &[u8] = data;
    for i in 0..numblocks {
        let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
        rs.compute_remainder(&dat[..datlen], ecc);
        let mut k: usize = i;
        for (j, &cw) in dat[..datlen].iter().enumerate() {
            if j == shortblockdatalen {
                k -= numshortblocks;
            }
            result[k] = cw;
            k += numblocks;
        }
        let mut k: usize = data.len() + i;
        for &cw in ecc.iter() {
            result[k] = cw;
            k += numblocks;
        }
        dat = &dat[datlen..];
    }
    debug_assert!(dat.is_empty());
}
