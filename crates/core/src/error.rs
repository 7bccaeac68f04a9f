//! Error types for the rm-sim system.
//!
//! All operations return structured errors rather than panicking.
//! Decoding past the correction capacity of the code is not an error: the
//! decoder always returns its best guess.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Word shape: a message or received word of the wrong length
/// - Parameters: code order or channel probability out of range
/// - Bit I/O: packing bits to bytes or reading bits from bytes
/// - Header: bitmap payload offset could not be read
/// - I/O: the underlying byte stream failed
#[derive(Debug, Error)]
pub enum Error {
    /// Word length does not match what the code expects
    #[error("invalid word length: expected {expected} bits, got {actual}")]
    InvalidWordLength { expected: usize, actual: usize },

    /// A bit vector element other than 0 or 1
    #[error("invalid bit value {value} at position {position}")]
    InvalidBit { position: usize, value: u8 },

    /// Code order outside the supported range
    #[error("invalid code order m = {m}: must be between 1 and {max}")]
    InvalidOrder { m: usize, max: usize },

    /// Channel crossover probability outside [0, 1]
    #[error("invalid error probability {0}: must be within [0, 1]")]
    InvalidProbability(f64),

    /// Bit I/O operation failed
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Bitmap header could not be parsed
    #[error("header error: {0}")]
    Header(String),

    /// Underlying stream I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Flush requested while a partial byte is pending.
    ///
    /// A writer cannot emit a fractional byte; the caller must pad the
    /// final word to a byte boundary first.
    #[error("cannot flush {pending_bits} pending bits: not a multiple of 8")]
    UnalignedFlush { pending_bits: usize },

    /// Stream ended before an exact read was satisfied
    #[error("unexpected end of bit stream: requested {requested} bits, read {read}")]
    UnexpectedEof { requested: usize, read: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Check that every element of `bits` is 0 or 1.
pub(crate) fn ensure_binary(bits: &[u8]) -> Result<()> {
    match bits.iter().position(|&b| b > 1) {
        Some(position) => Err(Error::InvalidBit {
            position,
            value: bits[position],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_binary() {
        assert!(ensure_binary(&[0, 1, 1, 0]).is_ok());
        assert!(ensure_binary(&[]).is_ok());

        match ensure_binary(&[0, 1, 2, 1]) {
            Err(Error::InvalidBit { position, value }) => {
                assert_eq!(position, 2);
                assert_eq!(value, 2);
            }
            other => panic!("expected InvalidBit, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let err = Error::InvalidWordLength {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "invalid word length: expected 4 bits, got 3");

        let err: Error = BitIoError::UnalignedFlush { pending_bits: 3 }.into();
        assert!(err.to_string().contains("3 pending bits"));
    }
}
