//! Configuration for the rm-sim application.
//!
//! Handles parsing command-line arguments and resolving defaults. A run with
//! no seed picks one from the clock and prints it, so every run can be
//! repeated exactly.

use clap::{Args, Parser, Subcommand};
use rm_sim_core::{CodeParams, Error, Result};
use std::path::PathBuf;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(name = "rm-sim")]
#[command(about = "Send data through a binary symmetric channel with and without RM(1,m) coding")]
pub struct Cli {
    /// Code order m (message length m+1, codeword length 2^m)
    #[arg(short = 'm', long = "order", default_value_t = 3, global = true)]
    pub order: usize,

    /// Channel error probability p in [0, 1]
    #[arg(short = 'p', long = "error-probability", default_value_t = 0.01, global = true)]
    pub error_probability: f64,

    /// Random seed for the channel (default: derived from the clock)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Encode one message word, send it, and decode it
    Vector(VectorArgs),

    /// Send a file (or generated sample text) through the channel
    File(FileArgs),

    /// Print the generator matrix and the decoder's transform series
    Matrices,
}

#[derive(Args, Debug, Clone)]
pub struct VectorArgs {
    /// Message of m+1 bits, e.g. 1011
    pub message: String,

    /// Replace the channel output with this 2^m-bit word before decoding
    #[arg(long)]
    pub received: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// Input file (default: generate sample text)
    #[arg(long = "in")]
    pub input: Option<PathBuf>,

    /// Treat the input as a BMP image and keep its header intact
    #[arg(long)]
    pub bmp: bool,

    /// Output for the coded route (default: coded.txt or coded.bmp)
    #[arg(long)]
    pub coded_out: Option<PathBuf>,

    /// Output for the uncoded route (default: uncoded.txt or uncoded.bmp)
    #[arg(long)]
    pub uncoded_out: Option<PathBuf>,

    /// Size of the generated sample in bytes
    #[arg(long, default_value_t = 4096)]
    pub sample_bytes: usize,

    /// Don't print the metrics summary
    #[arg(long)]
    pub no_metrics: bool,
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Code ===
    pub params: CodeParams,

    // === Channel ===
    pub error_probability: f64,
    pub seed: u64,

    // === Behavior ===
    pub print_config: bool,
    pub command: Command,
}

impl Config {
    /// Validate the parsed arguments and fill in defaults.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if m is out of range
    /// - `Error::InvalidProbability` if p is outside [0, 1]
    /// - `Error::Config` if `file --bmp` is given without `--in`
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let params = CodeParams::new(cli.order)?;

        if !(0.0..=1.0).contains(&cli.error_probability) {
            return Err(Error::InvalidProbability(cli.error_probability));
        }

        if let Command::File(args) = &cli.command {
            if args.bmp && args.input.is_none() {
                return Err(Error::Config(
                    "--bmp needs an input bitmap given with --in".to_string(),
                ));
            }
        }

        let seed = cli.seed.unwrap_or_else(clock_seed);

        Ok(Config {
            params,
            error_probability: cli.error_probability,
            seed,
            print_config: cli.print_config,
            command: cli.command,
        })
    }

    /// Output paths for the file command, with defaults by input kind.
    pub fn output_paths(args: &FileArgs) -> (PathBuf, PathBuf) {
        let ext = if args.bmp { "bmp" } else { "txt" };
        let coded = args
            .coded_out
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("coded.{}", ext)));
        let uncoded = args
            .uncoded_out
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("uncoded.{}", ext)));
        (coded, uncoded)
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Code: RM(1,{})", self.params.m());
        println!("Message length: {} bits", self.params.message_len());
        println!("Codeword length: {} bits", self.params.codeword_len());
        println!("Minimum distance: {}", self.params.min_distance());
        println!("Correctable errors per word: {}", self.params.correctable_errors());
        println!();
        println!("=== Channel ===");
        println!("Seed: {}", self.seed);
        println!("Error probability: {}", self.error_probability);
        println!();
    }
}

/// Parse a string of '0'/'1' characters into bit values.
///
/// # Errors
/// - `Error::InvalidWordLength` if the string is not `expected_len` characters
/// - `Error::Config` if it contains anything other than '0' and '1'
pub fn parse_bits(text: &str, expected_len: usize) -> Result<Vec<u8>> {
    let text = text.trim();
    if text.chars().count() != expected_len {
        return Err(Error::InvalidWordLength {
            expected: expected_len,
            actual: text.chars().count(),
        });
    }

    text.chars()
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(Error::Config(format!(
                "vector must consist of 0 and 1, found {:?}",
                other
            ))),
        })
        .collect()
}

/// Render bit values as a string of '0'/'1'.
pub fn format_bits(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b == 0 { '0' } else { '1' }).collect()
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rm-sim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_cli(parse(&["matrices"])).unwrap();
        assert_eq!(config.params.m(), 3);
        assert_eq!(config.error_probability, 0.01);
        assert!(matches!(config.command, Command::Matrices));
    }

    #[test]
    fn test_explicit_values() {
        let cli = parse(&["-m", "5", "-p", "0.2", "--seed", "42", "vector", "101101"]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.params.m(), 5);
        assert_eq!(config.error_probability, 0.2);
        assert_eq!(config.seed, 42);
        match config.command {
            Command::Vector(args) => {
                assert_eq!(args.message, "101101");
                assert!(args.received.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = parse(&["file", "--bmp", "--in", "image.bmp", "-m", "4", "--seed", "7"]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.params.m(), 4);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(
            Config::from_cli(parse(&["-m", "0", "matrices"])),
            Err(Error::InvalidOrder { .. })
        ));
        assert!(matches!(
            Config::from_cli(parse(&["-p", "1.5", "matrices"])),
            Err(Error::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_bmp_requires_input_file() {
        assert!(matches!(
            Config::from_cli(parse(&["file", "--bmp"])),
            Err(Error::Config(_))
        ));
        assert!(Config::from_cli(parse(&["file"])).is_ok());
    }

    #[test]
    fn test_output_paths() {
        let cli = parse(&["file", "--bmp"]);
        match cli.command {
            Command::File(args) => {
                let (coded, uncoded) = Config::output_paths(&args);
                assert_eq!(coded, PathBuf::from("coded.bmp"));
                assert_eq!(uncoded, PathBuf::from("uncoded.bmp"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_bits() {
        assert_eq!(parse_bits("1011", 4).unwrap(), vec![1, 0, 1, 1]);
        assert_eq!(parse_bits(" 01 \n", 2).unwrap(), vec![0, 1]);
        assert!(matches!(
            parse_bits("101", 4),
            Err(Error::InvalidWordLength { expected: 4, actual: 3 })
        ));
        assert!(matches!(parse_bits("10a1", 4), Err(Error::Config(_))));
    }

    #[test]
    fn test_format_bits() {
        assert_eq!(format_bits(&[1, 0, 0, 1]), "1001");
        assert_eq!(format_bits(&[]), "");
    }
}
