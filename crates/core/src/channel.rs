//! Binary symmetric channel simulator.
//!
//! Every transmitted bit is flipped independently with probability `p`. The
//! simulator reports which positions it flipped so callers can display or
//! count them.
//!
//! # Determinism
//!
//! Randomness comes from a generator owned by the channel instance. With
//! `Channel::new(seed)` (ChaCha8) a run is bit-identical for the same seed and
//! the same sequence of calls. A transmission with `p == 0` draws nothing from
//! the generator, so it never shifts later results.
//!
//! # Thread Safety
//! `transmit` advances the generator and takes `&mut self`. Give each thread
//! its own channel or wrap a shared one in a `Mutex`.

use crate::error::{ensure_binary, Error, Result};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of sending one word through the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    /// The word as it arrived
    pub word: Vec<u8>,

    /// Indices that were flipped, in increasing order
    pub error_positions: Vec<usize>,
}

impl Transmission {
    /// Number of flipped bits.
    pub fn error_count(&self) -> usize {
        self.error_positions.len()
    }
}

/// Binary symmetric channel.
pub struct Channel<R = ChaCha8Rng> {
    rng: R,

    // Statistics
    words_sent: u64,
    bits_sent: u64,
    bits_flipped: u64,
}

impl Channel<ChaCha8Rng> {
    /// Create a channel with a seeded ChaCha8 generator.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Create a channel seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }
}

impl<R: RngCore> Channel<R> {
    /// Create a channel around any random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            words_sent: 0,
            bits_sent: 0,
            bits_flipped: 0,
        }
    }

    /// Send `word` through the channel with crossover probability `p`.
    ///
    /// Each position is flipped iff a uniform draw from [0, 1) is below `p`.
    /// At `p == 0` the word comes back unchanged without consuming randomness;
    /// at `p == 1` every bit is complemented.
    ///
    /// # Errors
    /// - `Error::InvalidProbability` if `p` is NaN or outside [0, 1]
    /// - `Error::InvalidBit` if `word` contains a value other than 0 or 1
    pub fn transmit(&mut self, word: &[u8], p: f64) -> Result<Transmission> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::InvalidProbability(p));
        }
        ensure_binary(word)?;

        self.words_sent += 1;
        self.bits_sent += word.len() as u64;

        if p == 0.0 {
            return Ok(Transmission {
                word: word.to_vec(),
                error_positions: Vec::new(),
            });
        }

        let mut received = Vec::with_capacity(word.len());
        let mut error_positions = Vec::new();

        for (i, &bit) in word.iter().enumerate() {
            let roll: f64 = self.rng.gen();
            if roll < p {
                received.push(bit ^ 1);
                error_positions.push(i);
            } else {
                received.push(bit);
            }
        }

        self.bits_flipped += error_positions.len() as u64;
        tracing::trace!(
            len = word.len(),
            flipped = error_positions.len(),
            "word transmitted"
        );

        Ok(Transmission {
            word: received,
            error_positions,
        })
    }

    /// Get statistics about channel behavior.
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            words_sent: self.words_sent,
            bits_sent: self.bits_sent,
            bits_flipped: self.bits_flipped,
        }
    }
}

/// Statistics about channel behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Words passed to `transmit`
    pub words_sent: u64,

    /// Total bits passed to `transmit`
    pub bits_sent: u64,

    /// Bits the channel flipped
    pub bits_flipped: u64,
}

impl ChannelStats {
    /// Observed crossover rate (flipped / sent).
    pub fn error_rate(&self) -> f64 {
        if self.bits_sent == 0 {
            0.0
        } else {
            self.bits_flipped as f64 / self.bits_sent as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_word(len: usize) -> Vec<u8> {
        (0..len).map(|i| ((i * 7 + 3) % 5 % 2) as u8).collect()
    }

    #[test]
    fn test_zero_probability_is_identity() {
        for seed in [0, 1, 42, 12345] {
            let mut channel = Channel::new(seed);
            let word = sample_word(64);

            let t = channel.transmit(&word, 0.0).unwrap();
            assert_eq!(t.word, word);
            assert!(t.error_positions.is_empty());
        }
    }

    #[test]
    fn test_zero_probability_consumes_no_randomness() {
        let word = sample_word(32);

        let mut a = Channel::new(7);
        let mut b = Channel::new(7);

        a.transmit(&word, 0.0).unwrap();
        a.transmit(&word, 0.0).unwrap();

        assert_eq!(a.transmit(&word, 0.3).unwrap(), b.transmit(&word, 0.3).unwrap());
    }

    #[test]
    fn test_full_flip() {
        let mut channel = Channel::new(99);
        let word = sample_word(40);

        let t = channel.transmit(&word, 1.0).unwrap();
        for (sent, got) in word.iter().zip(&t.word) {
            assert_eq!(*got, 1 - *sent);
        }
        assert_eq!(t.error_positions, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_error_positions_match_differences() {
        let mut channel = Channel::new(2024);
        let word = sample_word(256);

        let t = channel.transmit(&word, 0.2).unwrap();
        let differing: Vec<usize> = (0..word.len()).filter(|&i| word[i] != t.word[i]).collect();
        assert_eq!(t.error_positions, differing);
        assert_eq!(t.error_count(), differing.len());
    }

    #[test]
    fn test_determinism() {
        let word = sample_word(128);
        let mut a = Channel::new(12345);
        let mut b = Channel::new(12345);

        for _ in 0..10 {
            assert_eq!(a.transmit(&word, 0.1).unwrap(), b.transmit(&word, 0.1).unwrap());
        }
    }

    #[test]
    fn test_flip_rate() {
        let mut channel = Channel::new(42);
        let word = vec![0u8; 1000];

        for _ in 0..10 {
            channel.transmit(&word, 0.25).unwrap();
        }

        let stats = channel.stats();
        assert_eq!(stats.words_sent, 10);
        assert_eq!(stats.bits_sent, 10_000);
        // Allow a wide band around 0.25
        assert!(stats.error_rate() > 0.2 && stats.error_rate() < 0.3);
    }

    #[test]
    fn test_invalid_probability() {
        let mut channel = Channel::new(1);
        assert!(matches!(
            channel.transmit(&[0, 1], -0.1),
            Err(Error::InvalidProbability(_))
        ));
        assert!(matches!(
            channel.transmit(&[0, 1], 1.5),
            Err(Error::InvalidProbability(_))
        ));
        assert!(channel.transmit(&[0, 1], f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_non_binary_word() {
        let mut channel = Channel::new(1);
        assert!(matches!(
            channel.transmit(&[0, 3], 0.5),
            Err(Error::InvalidBit { position: 1, value: 3 })
        ));
    }

    #[test]
    fn test_from_entropy_channel() {
        let mut channel = Channel::from_entropy();
        let sent = channel.transmit(&[0, 1, 1, 0], 1.0).unwrap();
        assert_eq!(sent.word, vec![1, 0, 0, 1]);
        assert!(channel.transmit(&[0, 1, 1, 0], 0.0).unwrap().error_positions.is_empty());
        assert_eq!(channel.stats().words_sent, 2);
    }
}
