//! Data codeword assembly for byte mode.

/// Mode indicator for 8-bit byte data.
const MODE_BYTE: u32 = 0x4;

/// Padding codewords, repeated until the data capacity is reached.
const PAD_BYTES: [u32; 2] = [0xec, 0x11];

/// Appends bits MSB-first into a borrowed byte buffer.
pub struct BitBuffer<'a> {
    data: &'a mut [u8],
    length: usize,
}

impl<'a> BitBuffer<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            data: buffer,
            length: 0,
        }
    }

    /// Number of bits written so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`. Bytes are overwritten as they are
    /// first touched, so the buffer does not need to be cleared beforehand.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0);
        assert!(self.length + usize::from(len) <= self.data.len() * 8, "Bit buffer overflow");
        for i in (0..len).rev() {
            let index: usize = self.length >> 3;
            let shift: u8 = 7 - ((self.length as u8) & 7);
            let bit: u8 = ((val >> i) as u8) & 1;
            if shift == 7 {
                self.data[index] = bit << shift;
            } else {
                self.data[index] |= bit << shift;
            }
            self.length += 1;
        }
    }
}

/// Fills `out` with the data codewords for `data`: mode indicator, 8-bit
/// length, the bytes, terminator, bit padding and pad codewords.
///
/// `out.len()` is the data codeword count of the version, and `data` must
/// leave room for the 12 header bits.
pub fn assemble(data: &[u8], out: &mut [u8]) {
    let capacitybits: usize = out.len() * 8;
    debug_assert!(data.len() * 8 + 12 <= capacitybits);
    let mut bb = BitBuffer::new(out);
    bb.append_bits(MODE_BYTE, 4);
    bb.append_bits(data.len() as u32, 8);
    for &b in data {
        bb.append_bits(b.into(), 8);
    }

    // Terminator, cut short when the capacity ends first
    let numzerobits: usize = core::cmp::min(4, capacitybits - bb.len());
    bb.append_bits(0, numzerobits as u8);
    let numzerobits: usize = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    for &padbyte in PAD_BYTES.iter().cycle() {
        if bb.len() >= capacitybits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }
    debug_assert_eq!(bb.len(), capacitybits);
}
