//! Mask patterns and the four penalty rules used to pick one.

use crate::bitmap::{bit, line_mask, Bitmap, QR_LINES};

const PENALTY_N1: u32 = 3;
const PENALTY_N2: u32 = 3;
const PENALTY_N3: u32 = 40;
const PENALTY_N4: u32 = 10;

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Mask(u8);

impl Mask {
    /// All patterns in selection order.
    pub const ALL: [Mask; 8] = [
        Mask(0),
        Mask(1),
        Mask(2),
        Mask(3),
        Mask(4),
        Mask(5),
        Mask(6),
        Mask(7),
    ];

    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this pattern flips the module at (x, y).
    pub fn inverts(self, x: u8, y: u8) -> bool {
        let x = u32::from(x);
        let y = u32::from(y);
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => ((x * y) % 2) + ((x * y) % 3) == 0,
            6 => (((x * y) % 2) + ((x * y) % 3)) % 2 == 0,
            7 => (((x + y) % 2) + ((x * y) % 3)) % 2 == 0,
            _ => unreachable!(),
        }
    }

    /// The flipped modules of row `y` as a packed word.
    pub fn row_pattern(self, y: u8, size: u8) -> u32 {
        (0..size)
            .filter(|&x| self.inverts(x, y))
            .fold(0, |word, x| word | bit(x))
    }

    /// XORs the pattern into every module not marked in `reserved`.
    /// Applying the same mask twice restores the grid.
    pub fn apply(self, grid: &mut Bitmap, reserved: &Bitmap, size: u8) {
        for y in 0..size {
            grid.xor_row(y, self.row_pattern(y, size) & !reserved.row(y));
        }
    }
}

/// Computes the penalty score of a finished grid.
pub trait Scorer {
    /// Returns the penalty of `grid`. Once the score is known to reach
    /// `bound` the scorer may stop and return any value `>= bound`.
    fn penalty(grid: &Bitmap, size: u8, bound: u32) -> u32;
}

/// Reads the grid module by module and always returns the full score.
pub struct ModuleScan;

/// Works on packed row words and a transposed copy for columns, stopping
/// early once `bound` is reached.
pub struct WordScan;

impl Scorer for ModuleScan {
    fn penalty(grid: &Bitmap, size: u8, _bound: u32) -> u32 {
        let mut result: u32 = 0;
        let mut runs = Runs::new();
        for y in 0..size {
            runs.scan(size, |x| grid.get(x, y));
            result += runs.penalty(size);
        }
        for x in 0..size {
            runs.scan(size, |y| grid.get(x, y));
            result += runs.penalty(size);
        }
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color: bool = grid.get(x, y);
                if color == grid.get(x + 1, y)
                    && color == grid.get(x, y + 1)
                    && color == grid.get(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }
        let mut dark: u32 = 0;
        for y in 0..size {
            for x in 0..size {
                dark += u32::from(grid.get(x, y));
            }
        }
        result + balance_penalty(dark, size)
    }
}

impl Scorer for WordScan {
    fn penalty(grid: &Bitmap, size: u8, bound: u32) -> u32 {
        let mut result: u32 = balance_penalty(grid.count_dark(size), size);

        let valid = line_mask(size - 1);
        for y in 0..size - 1 {
            let a = grid.row(y);
            let same_below = !(a ^ grid.row(y + 1));
            let same_right = !(a ^ (a << 1));
            let blocks = same_below & (same_below << 1) & same_right & valid;
            result += blocks.count_ones() * PENALTY_N2;
        }
        if result >= bound {
            return result;
        }

        let mut runs = Runs::new();
        for y in 0..size {
            runs.split_word(grid.row(y), size);
            result += runs.penalty(size);
        }
        if result >= bound {
            return result;
        }

        let columns = grid.transpose(size);
        for x in 0..size {
            runs.split_word(columns.row(x), size);
            result += runs.penalty(size);
        }
        result
    }
}

/// Rule 4: 10 points per full 5% step the dark ratio is away from 50%.
fn balance_penalty(dark: u32, size: u8) -> u32 {
    let total = u32::from(size) * u32::from(size);
    (dark * 20).abs_diff(total * 10) / total * PENALTY_N4
}

/// Run lengths of one line, alternating light and dark and always starting
/// with a light run, which is empty when the line starts dark.
struct Runs {
    lens: [u8; QR_LINES + 1],
    count: usize,
}

impl Runs {
    fn new() -> Self {
        Self {
            lens: [0; QR_LINES + 1],
            count: 0,
        }
    }

    fn push(&mut self, len: u8) {
        self.lens[self.count] = len;
        self.count += 1;
    }

    fn scan(&mut self, size: u8, mut module: impl FnMut(u8) -> bool) {
        self.count = 0;
        let mut runcolor = false;
        let mut run: u8 = 0;
        for i in 0..size {
            let color = module(i);
            if color == runcolor {
                run += 1;
            } else {
                self.push(run);
                runcolor = color;
                run = 1;
            }
        }
        self.push(run);
    }

    fn split_word(&mut self, word: u32, size: u8) {
        self.count = 0;
        let word = word & line_mask(size);
        let mut dark = false;
        let mut pos: u8 = 0;
        while pos < size {
            // Bits of the opposite color end the current run
            let stops = if dark { !word } else { word };
            let run = ((stops << pos).leading_zeros() as u8).min(size - pos);
            self.push(run);
            pos += run;
            dark = !dark;
        }
    }

    /// Rules 1 and 3 for this line.
    fn penalty(&self, size: u8) -> u32 {
        let runs = &self.lens[..self.count];
        let last = runs.len() - 1;
        let mut result: u32 = 0;
        let mut history = RunHistory::new(size);
        for (i, &run) in runs.iter().enumerate() {
            if run >= 5 {
                result += PENALTY_N1 + u32::from(run - 5);
            }
            if i < last {
                history.add(run);
                if i % 2 == 0 {
                    result += history.count_patterns() * PENALTY_N3;
                }
            }
        }
        result + history.terminate_and_count(last % 2 == 1, runs[last]) * PENALTY_N3
    }
}

/// The last seven run lengths of a line, newest first. The symbol border
/// counts as a light run as wide as the symbol.
struct RunHistory {
    qr_size: u16,
    run_history: [u16; 7],
}

impl RunHistory {
    fn new(size: u8) -> Self {
        Self {
            qr_size: u16::from(size),
            run_history: [0; 7],
        }
    }

    fn add(&mut self, run: u8) {
        let mut len = u16::from(run);
        if self.run_history[0] == 0 {
            len += self.qr_size;
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = len;
    }

    /// 1 if the runs ending with the newest light run form a dark 1:1:3:1:1
    /// group with 4 light units on at least one side.
    fn count_patterns(&self) -> u32 {
        let rh = &self.run_history;
        let n = rh[1];
        u32::from(
            n > 0
                && rh[2] == n
                && rh[3] == n * 3
                && rh[4] == n
                && rh[5] == n
                && (rh[0] >= n * 4 || rh[6] >= n * 4),
        )
    }

    fn terminate_and_count(mut self, dark: bool, run: u8) -> u32 {
        let mut len = run;
        if dark {
            self.add(len);
            len = 0;
        }
        // the trailing border is light
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = u16::from(len) + self.qr_size;
        self.count_patterns()
    }
}
