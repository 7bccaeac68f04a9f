//! RM(1, m) encoder.
//!
//! The generator matrix G has m + 1 rows and 2^m columns:
//!
//! - row 0 is all ones (the constant function)
//! - row k, for k in 1..=m, holds bit k - 1 of the column index
//!
//! so column c is "1 followed by the bits of c, least significant first".
//! The columns run over every evaluation point of an affine function of m
//! variables, and a codeword is the value table of one such function.
//!
//! For m = 1 the generator is the fixed matrix `[[0, 1], [1, 1]]`; the
//! decoder accounts for its row order.
//!
//! # Example
//! ```
//! use rm_sim_core::encoder::Encoder;
//!
//! let encoder = Encoder::new(2).unwrap();
//! assert_eq!(encoder.encode(&[1, 0, 1]).unwrap(), vec![1, 1, 0, 0]);
//! ```

use crate::error::{ensure_binary, Error, Result};
use crate::matrix::Matrix;
use crate::params::CodeParams;

/// Encodes (m + 1)-bit messages into 2^m-bit codewords.
///
/// The generator matrix is built once; `encode` only reads it, so a shared
/// `&Encoder` can serve any number of callers.
#[derive(Debug, Clone)]
pub struct Encoder {
    params: CodeParams,
    generator: Matrix<u8>,
}

impl Encoder {
    /// Build the encoder for order `m`.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` if `m` is out of range.
    pub fn new(m: usize) -> Result<Self> {
        Ok(Self::from_params(CodeParams::new(m)?))
    }

    /// Build the encoder for already validated parameters.
    pub fn from_params(params: CodeParams) -> Self {
        let generator = generator_matrix(&params);
        tracing::debug!(
            m = params.m(),
            rows = generator.rows(),
            cols = generator.cols(),
            "built generator matrix"
        );
        Self { params, generator }
    }

    pub fn params(&self) -> &CodeParams {
        &self.params
    }

    /// The generator matrix G.
    pub fn generator(&self) -> &Matrix<u8> {
        &self.generator
    }

    /// Encode one message word.
    ///
    /// Output bit i is the XOR over j of `word[j] & G[j][i]`.
    ///
    /// # Errors
    /// - `Error::InvalidWordLength` if `word.len() != m + 1`
    /// - `Error::InvalidBit` if `word` contains a value other than 0 or 1
    pub fn encode(&self, word: &[u8]) -> Result<Vec<u8>> {
        if word.len() != self.params.message_len() {
            return Err(Error::InvalidWordLength {
                expected: self.params.message_len(),
                actual: word.len(),
            });
        }
        ensure_binary(word)?;

        let mut codeword = vec![0u8; self.params.codeword_len()];
        for (j, _) in word.iter().enumerate().filter(|&(_, &bit)| bit == 1) {
            for (out, &g) in codeword.iter_mut().zip(self.generator.row(j)) {
                *out ^= g;
            }
        }

        Ok(codeword)
    }
}

/// Build the (m + 1) × 2^m generator matrix.
fn generator_matrix(params: &CodeParams) -> Matrix<u8> {
    let m = params.m();

    if m == 1 {
        let mut g = Matrix::zeros(2, 2);
        g.set(0, 1, 1);
        g.set(1, 0, 1);
        g.set(1, 1, 1);
        return g;
    }

    let length = params.codeword_len();
    let mut g = Matrix::zeros(params.message_len(), length);

    for col in 0..length {
        g.set(0, col, 1);
        for row in 1..=m {
            g.set(row, col, ((col >> (row - 1)) & 1) as u8);
        }
    }

    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_shape() {
        for m in 1..=6 {
            let encoder = Encoder::new(m).unwrap();
            let g = encoder.generator();
            assert_eq!(g.rows(), m + 1);
            assert_eq!(g.cols(), 1 << m);
        }
    }

    #[test]
    fn test_generator_first_row_all_ones() {
        for m in 2..=6 {
            let encoder = Encoder::new(m).unwrap();
            assert!(encoder.generator().row(0).iter().all(|&b| b == 1));
        }
    }

    #[test]
    fn test_generator_m1() {
        let encoder = Encoder::new(1).unwrap();
        let expected = Matrix::from_rows(&[vec![0, 1], vec![1, 1]]).unwrap();
        assert_eq!(encoder.generator(), &expected);
    }

    #[test]
    fn test_generator_m3() {
        let encoder = Encoder::new(3).unwrap();
        let expected = Matrix::from_rows(&[
            vec![1, 1, 1, 1, 1, 1, 1, 1],
            vec![0, 1, 0, 1, 0, 1, 0, 1],
            vec![0, 0, 1, 1, 0, 0, 1, 1],
            vec![0, 0, 0, 0, 1, 1, 1, 1],
        ])
        .unwrap();
        assert_eq!(encoder.generator(), &expected);
    }

    #[test]
    fn test_columns_are_distinct() {
        let encoder = Encoder::new(4).unwrap();
        let g = encoder.generator();
        let mut columns: Vec<Vec<u8>> = (0..g.cols())
            .map(|c| (0..g.rows()).map(|r| g.get(r, c)).collect())
            .collect();
        columns.sort();
        columns.dedup();
        assert_eq!(columns.len(), 16);
    }

    #[test]
    fn test_encode_m2() {
        let encoder = Encoder::new(2).unwrap();
        assert_eq!(encoder.encode(&[0, 0, 0]).unwrap(), vec![0, 0, 0, 0]);
        assert_eq!(encoder.encode(&[1, 0, 0]).unwrap(), vec![1, 1, 1, 1]);
        assert_eq!(encoder.encode(&[1, 0, 1]).unwrap(), vec![1, 1, 0, 0]);
        assert_eq!(encoder.encode(&[0, 1, 1]).unwrap(), vec![0, 1, 1, 0]);

        // Deterministic
        assert_eq!(
            encoder.encode(&[1, 0, 1]).unwrap(),
            encoder.encode(&[1, 0, 1]).unwrap()
        );
    }

    #[test]
    fn test_codewords_respect_min_distance() {
        let encoder = Encoder::new(4).unwrap();
        let params = *encoder.params();
        let codewords: Vec<Vec<u8>> = (0..1usize << params.message_len())
            .map(|v| {
                let word: Vec<u8> = (0..params.message_len()).map(|i| ((v >> i) & 1) as u8).collect();
                encoder.encode(&word).unwrap()
            })
            .collect();

        for (i, a) in codewords.iter().enumerate() {
            for b in &codewords[i + 1..] {
                let distance = a.iter().zip(b).filter(|(x, y)| x != y).count();
                assert!(distance >= params.min_distance());
            }
        }
    }

    #[test]
    fn test_wrong_length() {
        let encoder = Encoder::new(3).unwrap();
        match encoder.encode(&[1, 0, 1]) {
            Err(Error::InvalidWordLength { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("expected InvalidWordLength, got {:?}", other),
        }
    }

    #[test]
    fn test_non_binary_input() {
        let encoder = Encoder::new(2).unwrap();
        assert!(matches!(
            encoder.encode(&[1, 2, 0]),
            Err(Error::InvalidBit { position: 1, value: 2 })
        ));
    }
}
