//! Sample input generation.
//!
//! When no input file is given, the file command sends generated text
//! instead. Text makes channel damage easy to see: flipped bits turn letters
//! into other letters or control characters in the uncoded output.
//!
//! # Design
//!
//! Generated data mixes:
//! - Words drawn from a small vocabulary, separated by spaces
//! - Sentence punctuation and line breaks
//! - Occasional runs of digits

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;

const VOCABULARY: &[&str] = &[
    "channel", "codeword", "message", "noise", "bit", "flip", "decode", "encode", "matrix",
    "transform", "parity", "signal", "error", "word", "the", "a", "of", "and", "with", "through",
];

/// Generate sample text of exactly `size_bytes` bytes.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `size_bytes`: length of the generated data
pub fn generate_sample_text(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes + 16);
    let mut words_in_sentence = 0;

    while data.len() < size_bytes {
        match rng.gen_range(0..20) {
            // 5% a number
            0 => {
                let digits = rng.gen_range(1..=4);
                for _ in 0..digits {
                    data.push(b'0' + rng.gen_range(0..10u8));
                }
            }
            // Otherwise a vocabulary word
            _ => {
                let word = VOCABULARY[rng.gen_range(0..VOCABULARY.len())];
                if words_in_sentence == 0 {
                    let mut bytes = word.as_bytes().to_vec();
                    bytes[0] = bytes[0].to_ascii_uppercase();
                    data.extend_from_slice(&bytes);
                } else {
                    data.extend_from_slice(word.as_bytes());
                }
            }
        }

        words_in_sentence += 1;
        if words_in_sentence >= rng.gen_range(4..12) {
            data.push(b'.');
            data.push(if rng.gen_bool(0.2) { b'\n' } else { b' ' });
            words_in_sentence = 0;
        } else {
            data.push(b' ');
        }
    }

    data.truncate(size_bytes);
    data
}

/// Generate sample text, save it to `path` and return it.
pub fn write_sample_file(
    path: &std::path::Path,
    seed: u64,
    size_bytes: usize,
) -> std::io::Result<Vec<u8>> {
    let data = generate_sample_text(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    Ok(data)
}
