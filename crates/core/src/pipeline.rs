//! Sending a byte stream through the channel, with and without coding.
//!
//! The input is sliced into (m + 1)-bit words. Each word takes two routes:
//!
//! ```text
//!            ┌─► encode ─► channel ─► decode ─► coded output
//! word ──────┤
//!            └─────────────► channel ──────────► uncoded output
//! ```
//!
//! so the two outputs show what the same noise does to protected and
//! unprotected data.
//!
//! # Final word
//!
//! When the input length in bits is not a multiple of m + 1, the last word
//! is padded with zeros before it is sent, and only its original bits are
//! written out. Both outputs therefore have exactly as many bits as the
//! input, which is always a whole number of bytes.
//!
//! # Header pass-through
//!
//! With `header_len > 0` the first `header_len` bytes are copied verbatim to
//! both outputs before any bits are sent (see [`crate::bmp`]).

use crate::bitio::{BitReader, BitWriter};
use crate::bmp::read_header;
use crate::channel::Channel;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use rand::RngCore;
use std::io::{Read, Write};

/// Options for one transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferOptions {
    /// Channel crossover probability p
    pub error_probability: f64,

    /// Leading bytes copied through unmodified
    pub header_len: usize,
}

impl TransferOptions {
    pub fn new(error_probability: f64) -> Self {
        Self {
            error_probability,
            header_len: 0,
        }
    }

    pub fn with_header(mut self, header_len: usize) -> Self {
        self.header_len = header_len;
        self
    }
}

/// Counts gathered during one transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Bytes passed through before bit processing started
    pub header_bytes: u64,

    /// Payload bits read from the input
    pub payload_bits: u64,

    /// Words sent (including a final padded word)
    pub words: u64,

    /// Zero bits added to complete the final word
    pub padding_bits: u64,

    /// Bits sent over the channel on the coded route
    pub coded_channel_bits: u64,

    /// Channel flips on the coded route
    pub coded_flips: u64,

    /// Channel flips on the uncoded route (payload bits only)
    pub uncoded_flips: u64,

    /// Payload bits that differ from the input after decoding
    pub coded_bit_errors: u64,

    /// Payload bits that differ from the input on the uncoded route
    pub uncoded_bit_errors: u64,

    /// Words whose decoded payload bits differ from the input
    pub words_miscorrected: u64,
}

/// Send `input` through `channel` word by word.
///
/// Writes the decoded coded-route bits to `coded_out` and the raw
/// uncoded-route bits to `uncoded_out`. Both writers are flushed before
/// returning.
///
/// # Errors
/// - `Error::Config` if `encoder` and `decoder` were built for different m
/// - `Error::InvalidProbability` if the probability is outside [0, 1]
/// - `Error::Header` if the input is shorter than `header_len`
/// - `Error::Io` if any stream fails
pub fn transfer<R, C, U, G>(
    mut input: R,
    mut coded_out: C,
    mut uncoded_out: U,
    options: &TransferOptions,
    encoder: &Encoder,
    decoder: &Decoder,
    channel: &mut Channel<G>,
) -> Result<TransferReport>
where
    R: Read,
    C: Write,
    U: Write,
    G: RngCore,
{
    if encoder.params() != decoder.params() {
        return Err(Error::Config(format!(
            "encoder built for m = {} but decoder for m = {}",
            encoder.params().m(),
            decoder.params().m()
        )));
    }
    let p = options.error_probability;
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidProbability(p));
    }

    let mut report = TransferReport::default();

    if options.header_len > 0 {
        let header = read_header(&mut input, options.header_len)?;
        coded_out.write_all(&header)?;
        uncoded_out.write_all(&header)?;
        report.header_bytes = header.len() as u64;
    }

    let mut reader = BitReader::new(input);
    let mut coded = BitWriter::new(coded_out);
    let mut uncoded = BitWriter::new(uncoded_out);

    let k = encoder.params().message_len();
    let mut word = vec![0u8; k];

    loop {
        let n = reader.read_at_least(&mut word, k)?;
        if n == 0 {
            break;
        }
        if n < k {
            word[n..].fill(0);
            report.padding_bits += (k - n) as u64;
        }

        let codeword = encoder.encode(&word)?;
        let received = channel.transmit(&codeword, p)?;
        let decoded = decoder.decode(&received.word)?;
        coded.write(&decoded[..n])?;

        let raw = channel.transmit(&word, p)?;
        uncoded.write(&raw.word[..n])?;

        let coded_errors = count_differences(&word[..n], &decoded[..n]);
        report.words += 1;
        report.payload_bits += n as u64;
        report.coded_channel_bits += codeword.len() as u64;
        report.coded_flips += received.error_count() as u64;
        report.uncoded_flips += raw.error_positions.iter().filter(|&&i| i < n).count() as u64;
        report.coded_bit_errors += coded_errors as u64;
        report.uncoded_bit_errors += count_differences(&word[..n], &raw.word[..n]) as u64;
        if coded_errors > 0 {
            report.words_miscorrected += 1;
        }

        if n < k {
            break;
        }
    }

    coded.into_inner()?;
    uncoded.into_inner()?;

    tracing::debug!(
        words = report.words,
        payload_bits = report.payload_bits,
        coded_bit_errors = report.coded_bit_errors,
        uncoded_bit_errors = report.uncoded_bit_errors,
        "transfer complete"
    );

    Ok(report)
}

fn count_differences(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(m: usize, data: &[u8], options: TransferOptions, seed: u64) -> (Vec<u8>, Vec<u8>, TransferReport) {
        let encoder = Encoder::new(m).unwrap();
        let decoder = Decoder::new(m).unwrap();
        let mut channel = Channel::new(seed);
        let mut coded = Vec::new();
        let mut uncoded = Vec::new();

        let report = transfer(
            data,
            &mut coded,
            &mut uncoded,
            &options,
            &encoder,
            &decoder,
            &mut channel,
        )
        .unwrap();
        (coded, uncoded, report)
    }

    #[test]
    fn test_noiseless_transfer_is_exact() {
        let data = b"hello, reed-muller";
        for m in 1..=5 {
            let (coded, uncoded, report) = run(m, data, TransferOptions::new(0.0), 1);
            assert_eq!(coded, data);
            assert_eq!(uncoded, data);
            assert_eq!(report.payload_bits, data.len() as u64 * 8);
            assert_eq!(report.coded_bit_errors, 0);
            assert_eq!(report.uncoded_flips, 0);
        }
    }

    #[test]
    fn test_padding_of_final_word() {
        // 3 bytes = 24 bits; m = 4 gives 5-bit words: 4 full + 4 bits
        let (coded, _, report) = run(4, b"abc", TransferOptions::new(0.0), 1);
        assert_eq!(coded, b"abc");
        assert_eq!(report.words, 5);
        assert_eq!(report.padding_bits, 1);
        assert_eq!(report.coded_channel_bits, 5 * 16);
    }

    #[test]
    fn test_output_lengths_match_input_under_noise() {
        let data: Vec<u8> = (0..200u8).collect();
        let (coded, uncoded, report) = run(3, &data, TransferOptions::new(0.2), 77);
        assert_eq!(coded.len(), data.len());
        assert_eq!(uncoded.len(), data.len());
        assert!(report.coded_flips > 0);
        assert!(report.uncoded_flips > 0);
        assert_eq!(
            report.uncoded_bit_errors,
            report.uncoded_flips,
            "every uncoded flip is a payload error"
        );
    }

    #[test]
    fn test_coding_reduces_errors_at_low_noise() {
        let data = vec![0x5Au8; 2000];
        let (_, _, report) = run(5, &data, TransferOptions::new(0.02), 3);
        assert!(report.coded_bit_errors < report.uncoded_bit_errors);
    }

    #[test]
    fn test_header_passthrough() {
        let mut data = vec![0xEEu8; 14];
        data.extend_from_slice(b"pixels!");
        let options = TransferOptions::new(1.0).with_header(14);

        let (coded, uncoded, report) = run(2, &data, options, 5);
        assert_eq!(report.header_bytes, 14);
        assert_eq!(&coded[..14], &data[..14]);
        assert_eq!(&uncoded[..14], &data[..14]);

        // p = 1 complements every payload bit on the uncoded route
        let inverted: Vec<u8> = b"pixels!".iter().map(|b| !b).collect();
        assert_eq!(&uncoded[14..], &inverted[..]);
    }

    #[test]
    fn test_mismatched_orders() {
        let encoder = Encoder::new(3).unwrap();
        let decoder = Decoder::new(4).unwrap();
        let mut channel = Channel::new(0);
        let result = transfer(
            &b"x"[..],
            Vec::new(),
            Vec::new(),
            &TransferOptions::new(0.0),
            &encoder,
            &decoder,
            &mut channel,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_input() {
        let (coded, uncoded, report) = run(3, b"", TransferOptions::new(0.5), 9);
        assert!(coded.is_empty());
        assert!(uncoded.is_empty());
        assert_eq!(report.words, 0);
    }
}
