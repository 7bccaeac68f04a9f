//! Fast transform decoder for RM(1, m).
//!
//! A received word is mapped to ±1 values and multiplied by the transform
//! series H_1, ..., H_m, where
//!
//! ```text
//! H_i = I_(2^(m-i)) ⊗ [[1, 1], [1, -1]] ⊗ I_(2^(i-1))
//! ```
//!
//! Their product is the 2^m × 2^m Hadamard matrix, so after the last step
//! component u holds the correlation of the received word with the affine
//! function whose linear part is u. The component with the largest magnitude
//! names the information bits; its sign gives the constant bit.
//!
//! Up to ⌊(2^(m-1) - 1) / 2⌋ flipped bits are always corrected. Beyond that
//! the decoder still returns its best guess, which may be wrong.

use crate::error::{ensure_binary, Error, Result};
use crate::matrix::Matrix;
use crate::params::CodeParams;

/// Decodes 2^m-bit received words back to (m + 1)-bit messages.
///
/// The transform series is built once; `decode` only reads it.
#[derive(Debug, Clone)]
pub struct Decoder {
    params: CodeParams,
    transforms: Vec<Matrix<i32>>,
}

impl Decoder {
    /// Build the decoder for order `m`.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` if `m` is out of range.
    pub fn new(m: usize) -> Result<Self> {
        Ok(Self::from_params(CodeParams::new(m)?))
    }

    /// Build the decoder for already validated parameters.
    pub fn from_params(params: CodeParams) -> Self {
        let transforms = transform_series(params.m());
        tracing::debug!(
            m = params.m(),
            matrices = transforms.len(),
            size = params.codeword_len(),
            "built transform series"
        );
        Self { params, transforms }
    }

    pub fn params(&self) -> &CodeParams {
        &self.params
    }

    /// The transform matrices H_1, ..., H_m, in application order.
    pub fn transforms(&self) -> &[Matrix<i32>] {
        &self.transforms
    }

    /// Correlations of `received` with every affine function.
    ///
    /// # Errors
    /// - `Error::InvalidWordLength` if `received.len() != 2^m`
    /// - `Error::InvalidBit` if `received` contains a value other than 0 or 1
    pub fn transform(&self, received: &[u8]) -> Result<Vec<i32>> {
        if received.len() != self.params.codeword_len() {
            return Err(Error::InvalidWordLength {
                expected: self.params.codeword_len(),
                actual: received.len(),
            });
        }
        ensure_binary(received)?;

        let bipolar: Vec<i32> = received.iter().map(|&b| if b == 0 { -1 } else { 1 }).collect();
        Ok(self
            .transforms
            .iter()
            .fold(bipolar, |vector, h| h.vec_mul(&vector)))
    }

    /// Decode a received word to the most likely message.
    ///
    /// The largest-magnitude component wins; on equal magnitudes the lowest
    /// index is kept. A positive winner gives constant bit 1, zero or negative
    /// gives 0. Message bit i (for i in 1..=m) is bit i - 1 of the winning
    /// index.
    ///
    /// # Errors
    /// Same as [`Decoder::transform`].
    pub fn decode(&self, received: &[u8]) -> Result<Vec<u8>> {
        let correlations = self.transform(received)?;

        let mut best_index = 0;
        let mut best_magnitude = correlations[0].abs();
        for (i, &c) in correlations.iter().enumerate().skip(1) {
            if c.abs() > best_magnitude {
                best_magnitude = c.abs();
                best_index = i;
            }
        }

        let m = self.params.m();
        let mut message = Vec::with_capacity(self.params.message_len());
        message.push(u8::from(correlations[best_index] > 0));
        message.extend((0..m).map(|bit| ((best_index >> bit) & 1) as u8));

        // The m = 1 generator lists the information row first.
        if m == 1 {
            message.swap(0, 1);
        }

        Ok(message)
    }
}

/// Build H_1, ..., H_m for order `m`.
fn transform_series(m: usize) -> Vec<Matrix<i32>> {
    let mut base = Matrix::zeros(2, 2);
    base.set(0, 0, 1);
    base.set(0, 1, 1);
    base.set(1, 0, 1);
    base.set(1, 1, -1);

    (1..=m)
        .map(|i| {
            let before = Matrix::identity(1 << (m - i));
            let after = Matrix::identity(1 << (i - 1));
            before.kronecker(&base).kronecker(&after)
        })
        .collect()
}
