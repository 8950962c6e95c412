/// Speed/footprint trade-off of the encoder.
///
/// The tier only picks internal algorithms. Every tier produces the exact
/// same symbol for the same input.
///
/// | Tier       | GF(256) multiply      | Mask scoring                      |
/// |------------|-----------------------|-----------------------------------|
/// | `Small`    | shift and reduce      | module by module, every candidate |
/// | `Balanced` | shift and reduce      | word parallel, early exit         |
/// | `Fast`     | log/antilog tables    | word parallel, early exit         |
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Speed {
    /// Least code and table data, slowest.
    Small,
    /// Word-parallel mask scoring on top of the small arithmetic.
    #[default]
    Balanced,
    /// Adds 512 bytes of lookup tables for the field arithmetic.
    Fast,
}

/// Finite field arithmetic used by the Reed-Solomon coder.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Arithmetic {
    Bitwise,
    Tables,
}

/// How candidate masks are scored.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scoring {
    /// Reads each module individually and always computes the full score.
    Modules,
    /// Scans packed words and stops once a candidate cannot win.
    Words,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Small, Speed::Balanced, Speed::Fast];

    pub const fn arithmetic(self) -> Arithmetic {
        match self {
            Speed::Small | Speed::Balanced => Arithmetic::Bitwise,
            Speed::Fast => Arithmetic::Tables,
        }
    }

    pub const fn scoring(self) -> Scoring {
        match self {
            Speed::Small => Scoring::Modules,
            Speed::Balanced | Speed::Fast => Scoring::Words,
        }
    }
}
