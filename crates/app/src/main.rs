//! rm-sim: send data through a noisy channel with and without RM(1,m) coding.

mod config;
mod input_gen;

use anyhow::{Context, Result};
use clap::Parser;
use config::{format_bits, parse_bits, Cli, Command, Config, FileArgs, VectorArgs};
use rm_sim_core::{
    bmp::pixel_data_offset,
    metrics::Metrics,
    pipeline::{transfer, TransferOptions},
    Channel, Decoder, Encoder,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Where generated sample text is saved for comparison with the outputs.
const SAMPLE_PATH: &str = "sample.txt";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_cli(cli).context("invalid arguments")?;
    if config.print_config {
        config.print();
    } else if !matches!(config.command, Command::Matrices) {
        println!("Seed: {}", config.seed);
    }

    let encoder = Encoder::from_params(config.params);
    let decoder = Decoder::from_params(config.params);
    let mut channel = Channel::new(config.seed);
    info!(m = config.params.m(), p = config.error_probability, seed = config.seed, "starting");

    match &config.command {
        Command::Vector(args) => run_vector(&config, args, &encoder, &decoder, &mut channel),
        Command::File(args) => run_file(&config, args, &encoder, &decoder, &mut channel),
        Command::Matrices => {
            print_matrices(&encoder, &decoder);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Encode one word, send it, optionally replace what arrived, and decode.
fn run_vector(
    config: &Config,
    args: &VectorArgs,
    encoder: &Encoder,
    decoder: &Decoder,
    channel: &mut Channel,
) -> Result<()> {
    let params = encoder.params();
    let message = parse_bits(&args.message, params.message_len()).context("invalid message")?;

    let codeword = encoder.encode(&message)?;
    println!("Encoded:  {}", format_bits(&codeword));

    let transmission = channel.transmit(&codeword, config.error_probability)?;
    println!("Received: {}", format_bits(&transmission.word));
    println!(
        "Errors: {} at positions {:?} (correctable: {})",
        transmission.error_count(),
        transmission.error_positions,
        params.correctable_errors()
    );

    let received = match &args.received {
        Some(text) => {
            let edited = parse_bits(text, params.codeword_len()).context("invalid received word")?;
            println!("Replaced: {}", format_bits(&edited));
            edited
        }
        None => transmission.word,
    };

    let decoded = decoder.decode(&received)?;
    println!("Decoded:  {}", format_bits(&decoded));
    if decoded == message {
        println!("✓ Message recovered");
    } else {
        println!("✗ Message differs from the original");
    }
    Ok(())
}

/// Send a file, or generated text, through both routes.
fn run_file(
    config: &Config,
    args: &FileArgs,
    encoder: &Encoder,
    decoder: &Decoder,
    channel: &mut Channel,
) -> Result<()> {
    match &args.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            send(config, args, BufReader::new(file), encoder, decoder, channel)
        }
        None => {
            let data =
                input_gen::write_sample_file(Path::new(SAMPLE_PATH), config.seed, args.sample_bytes)
                    .with_context(|| format!("cannot write {}", SAMPLE_PATH))?;
            println!("Generated {} bytes of sample text in {}", data.len(), SAMPLE_PATH);
            send(config, args, Cursor::new(data), encoder, decoder, channel)
        }
    }
}

fn send<R: Read + Seek>(
    config: &Config,
    args: &FileArgs,
    mut input: R,
    encoder: &Encoder,
    decoder: &Decoder,
    channel: &mut Channel,
) -> Result<()> {
    let mut options = TransferOptions::new(config.error_probability);
    if args.bmp {
        let offset = pixel_data_offset(&mut input).context("input is not a usable BMP file")?;
        options = options.with_header(offset as usize);
        info!(offset, "keeping bitmap header");
    }

    let (coded_path, uncoded_path) = Config::output_paths(args);
    let coded = File::create(&coded_path)
        .with_context(|| format!("cannot create {}", coded_path.display()))?;
    let uncoded = File::create(&uncoded_path)
        .with_context(|| format!("cannot create {}", uncoded_path.display()))?;

    let mut metrics = Metrics::new(encoder.params(), config.error_probability);
    let report = transfer(
        input,
        BufWriter::new(coded),
        BufWriter::new(uncoded),
        &options,
        encoder,
        decoder,
        channel,
    )?;
    metrics.record(&report);
    metrics.complete();

    println!("Sent with coding:    {}", coded_path.display());
    println!("Sent without coding: {}", uncoded_path.display());
    if !args.no_metrics {
        metrics.print_summary();
    }
    metrics.print_result();
    Ok(())
}

fn print_matrices(encoder: &Encoder, decoder: &Decoder) {
    println!("G ({} x {}):", encoder.generator().rows(), encoder.generator().cols());
    print!("{}", encoder.generator());

    for (i, h) in decoder.transforms().iter().enumerate() {
        println!();
        println!("H_{} ({} x {}):", i + 1, h.rows(), h.cols());
        print!("{}", h);
    }
}
