//! Metrics collection and reporting for channel runs.
//!
//! This module provides observable insights into a run:
//! - Volume (payload bits, words, channel bits)
//! - Channel behavior on each route (flips, observed crossover rate)
//! - Residual errors after the run, coded versus uncoded
//! - Timing information
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe. For multi-threaded use, keep
//! per-thread metrics and merge them with `record` at the end.

use crate::params::CodeParams;
use crate::pipeline::TransferReport;
use std::time::{Duration, Instant};

/// Accumulated metrics for one or more transfers.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Parameters ===
    /// Code order
    pub m: usize,

    /// Channel crossover probability
    pub error_probability: f64,

    // === Totals ===
    pub counts: TransferReport,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new(params: &CodeParams, error_probability: f64) -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            m: params.m(),
            error_probability,
            counts: TransferReport::default(),
        }
    }

    /// Add the counts of one transfer.
    pub fn record(&mut self, report: &TransferReport) {
        let c = &mut self.counts;
        c.header_bytes += report.header_bytes;
        c.payload_bits += report.payload_bits;
        c.words += report.words;
        c.padding_bits += report.padding_bits;
        c.coded_channel_bits += report.coded_channel_bits;
        c.coded_flips += report.coded_flips;
        c.uncoded_flips += report.uncoded_flips;
        c.coded_bit_errors += report.coded_bit_errors;
        c.uncoded_bit_errors += report.uncoded_bit_errors;
        c.words_miscorrected += report.words_miscorrected;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Payload bit error rate after decoding.
    pub fn coded_error_rate(&self) -> f64 {
        ratio(self.counts.coded_bit_errors, self.counts.payload_bits)
    }

    /// Payload bit error rate without coding.
    pub fn uncoded_error_rate(&self) -> f64 {
        ratio(self.counts.uncoded_bit_errors, self.counts.payload_bits)
    }

    /// Crossover rate the channel actually produced on the coded route.
    pub fn observed_flip_rate(&self) -> f64 {
        ratio(self.counts.coded_flips, self.counts.coded_channel_bits)
    }

    /// Fraction of words decoded to a different message.
    pub fn word_error_rate(&self) -> f64 {
        ratio(self.counts.words_miscorrected, self.counts.words)
    }

    /// Channel bits spent per payload bit on the coded route.
    pub fn expansion(&self) -> f64 {
        ratio(self.counts.coded_channel_bits, self.counts.payload_bits)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        let c = &self.counts;

        println!("\n=== Run Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!("Code: RM(1,{}), p = {}", self.m, self.error_probability);
        println!();

        println!("=== Volume ===");
        println!("Header bytes passed through: {}", c.header_bytes);
        println!("Payload bits: {} ({} bytes)", c.payload_bits, c.payload_bits / 8);
        println!("Words: {} ({} padding bits)", c.words, c.padding_bits);
        println!("Channel bits (coded): {} ({:.2}x)", c.coded_channel_bits, self.expansion());
        println!();

        println!("=== Channel ===");
        println!("Flips (coded route): {} ({:.4}%)", c.coded_flips, self.observed_flip_rate() * 100.0);
        println!("Flips (uncoded route): {}", c.uncoded_flips);
        println!();

        println!("=== Residual Errors ===");
        println!(
            "With coding:    {} bits ({:.4}%), {} words miscorrected ({:.4}%)",
            c.coded_bit_errors,
            self.coded_error_rate() * 100.0,
            c.words_miscorrected,
            self.word_error_rate() * 100.0
        );
        println!(
            "Without coding: {} bits ({:.4}%)",
            c.uncoded_bit_errors,
            self.uncoded_error_rate() * 100.0
        );
        println!();
    }

    /// Print just the final comparison.
    pub fn print_result(&self) {
        let c = &self.counts;
        if c.coded_bit_errors == 0 {
            println!("✓ Coded transfer arrived intact ({} payload bits)", c.payload_bits);
        } else {
            println!(
                "✗ Coded transfer has {} bit errors ({} without coding)",
                c.coded_bit_errors, c.uncoded_bit_errors
            );
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             m={}\n\
             error_probability={}\n\
             payload_bits={}\n\
             words={}\n\
             coded_channel_bits={}\n\
             coded_flips={}\n\
             uncoded_flips={}\n\
             coded_bit_errors={}\n\
             uncoded_bit_errors={}\n\
             coded_error_rate={:.6}\n\
             uncoded_error_rate={:.6}\n\
             words_miscorrected={}\n",
            self.duration().as_millis(),
            self.m,
            self.error_probability,
            self.counts.payload_bits,
            self.counts.words,
            self.counts.coded_channel_bits,
            self.counts.coded_flips,
            self.counts.uncoded_flips,
            self.counts.coded_bit_errors,
            self.counts.uncoded_bit_errors,
            self.coded_error_rate(),
            self.uncoded_error_rate(),
            self.counts.words_miscorrected,
        )
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> Metrics {
        Metrics::new(&CodeParams::new(3).unwrap(), 0.05)
    }

    #[test]
    fn test_metrics_creation() {
        let m = metrics();
        assert!(m.end_time.is_none());
        assert_eq!(m.m, 3);
        assert_eq!(m.counts, TransferReport::default());
        assert!(m.duration().as_millis() < 100); // Should be recent
    }

    #[test]
    fn test_rates_with_no_data() {
        let m = metrics();
        assert_eq!(m.coded_error_rate(), 0.0);
        assert_eq!(m.uncoded_error_rate(), 0.0);
        assert_eq!(m.word_error_rate(), 0.0);
        assert_eq!(m.expansion(), 0.0);
    }

    #[test]
    fn test_record_accumulates() {
        let mut m = metrics();
        let report = TransferReport {
            payload_bits: 800,
            words: 200,
            coded_channel_bits: 1600,
            coded_flips: 80,
            uncoded_flips: 40,
            coded_bit_errors: 8,
            uncoded_bit_errors: 40,
            words_miscorrected: 4,
            ..TransferReport::default()
        };
        m.record(&report);
        m.record(&report);

        assert_eq!(m.counts.payload_bits, 1600);
        assert_eq!(m.counts.words, 400);
        assert_eq!(m.coded_error_rate(), 0.01);
        assert_eq!(m.uncoded_error_rate(), 0.05);
        assert_eq!(m.observed_flip_rate(), 0.05);
        assert_eq!(m.word_error_rate(), 0.02);
        assert_eq!(m.expansion(), 2.0);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut m = metrics();
        std::thread::sleep(Duration::from_millis(5));
        m.complete();
        let d1 = m.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(m.duration(), d1);
        assert!(d1 >= Duration::from_millis(5));
    }

    #[test]
    fn test_export_text() {
        let mut m = metrics();
        m.counts.payload_bits = 1000;
        m.counts.coded_bit_errors = 3;

        let text = m.export_text();
        assert!(text.contains("m=3"));
        assert!(text.contains("payload_bits=1000"));
        assert!(text.contains("coded_bit_errors=3"));
        assert!(text.contains("coded_error_rate=0.003000"));
    }
}
