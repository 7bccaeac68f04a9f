//! Parameters of the first-order Reed-Muller code RM(1, m).
//!
//! Every dimension of the code follows from the single order `m`:
//!
//! | Quantity            | Value                  |
//! |---------------------|------------------------|
//! | message length      | m + 1                  |
//! | codeword length     | 2^m                    |
//! | minimum distance    | 2^(m-1)                |
//! | correctable errors  | ⌊(2^(m-1) - 1) / 2⌋    |
//!
//! The encoder and decoder are both built from a validated `CodeParams`, so a
//! pair built from the same value always agrees on word shapes.

use crate::error::{Error, Result};

/// Largest supported code order.
///
/// The decoder keeps m dense 2^m × 2^m transform matrices, which is roughly
/// 800 MB of `i32` at m = 12.
pub const MAX_ORDER: usize = 12;

/// Validated code order and derived dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeParams {
    m: usize,
}

impl CodeParams {
    /// Validate `m` and build the parameter set.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` unless `1 <= m <= MAX_ORDER`.
    pub fn new(m: usize) -> Result<Self> {
        if m == 0 || m > MAX_ORDER {
            return Err(Error::InvalidOrder { m, max: MAX_ORDER });
        }
        Ok(Self { m })
    }

    /// Code order m.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Bits per message word (m + 1).
    pub fn message_len(&self) -> usize {
        self.m + 1
    }

    /// Bits per codeword (2^m).
    pub fn codeword_len(&self) -> usize {
        1 << self.m
    }

    /// Minimum Hamming distance between distinct codewords (2^(m-1)).
    pub fn min_distance(&self) -> usize {
        1 << (self.m - 1)
    }

    /// Number of bit errors per codeword that are always corrected.
    pub fn correctable_errors(&self) -> usize {
        (self.min_distance() - 1) / 2
    }

    /// Code rate (message bits per transmitted bit).
    pub fn rate(&self) -> f64 {
        self.message_len() as f64 / self.codeword_len() as f64
    }
}
