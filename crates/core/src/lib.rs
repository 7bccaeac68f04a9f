//! rm-sim-core: forward error correction with first-order Reed-Muller codes
//!
//! This library provides the core components for a system that:
//! - Encodes (m+1)-bit messages into 2^m-bit RM(1,m) codewords
//! - Simulates a binary symmetric channel with seeded randomness
//! - Decodes received words with a fast Hadamard-style transform
//! - Streams arbitrary files through the channel, with and without coding
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `params`: Code order and derived dimensions
//! - `matrix`: Dense integer matrices and the Kronecker product
//! - `encoder`: Generator matrix and GF(2) encoding
//! - `decoder`: Transform series and majority decoding
//! - `channel`: Binary symmetric channel simulator
//! - `bitio`: Bit-level readers and writers over byte streams
//! - `bmp`: Bitmap header pass-through
//! - `pipeline`: Word-by-word transfer of a byte stream
//! - `metrics`: Observable run behavior
//!
//! # Design Principles
//!
//! - **No panics on input**: All errors are structured and recoverable
//! - **Immutable codecs**: Encoder and decoder are read-only after construction
//! - **Deterministic**: Seeded randomness makes runs reproducible
//!
//! # Example
//! ```
//! use rm_sim_core::{Channel, Decoder, Encoder};
//!
//! let encoder = Encoder::new(3).unwrap();
//! let decoder = Decoder::new(3).unwrap();
//! let mut channel = Channel::new(42);
//!
//! let message = [1, 0, 1, 1];
//! let codeword = encoder.encode(&message).unwrap();
//!
//! let mut received = channel.transmit(&codeword, 0.0).unwrap().word;
//! received[5] ^= 1; // one error is always corrected at m = 3
//! assert_eq!(decoder.decode(&received).unwrap(), message);
//! ```

pub mod bitio;
pub mod bmp;
pub mod channel;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod params;
pub mod pipeline;

// Re-export commonly used types
pub use channel::{Channel, Transmission};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use params::{CodeParams, MAX_ORDER};
