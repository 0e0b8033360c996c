mod error;
mod report;
mod wav;

use clap::{Parser, Subcommand};
use error::CliError;
use log::info;
use powertone_core::{DecodeOutcome, DemodConfig, Decoder, Encoder, RawBitsReason, SynthConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status when the frame was recovered but could not be shown as text
const EXIT_RAW_BITS: u8 = 2;

#[derive(Parser)]
#[command(name = "powertone")]
#[command(about = "Two-tone (BFSK) recording demodulator")]
struct Cli {
    /// Log every window estimate and correction
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a BFSK recording
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Nominal frequency of 1 bits (Hz)
        #[arg(long, default_value_t = powertone_core::DEFAULT_ONE_FREQ_HZ)]
        one_freq: f64,

        /// Nominal frequency of 0 bits (Hz)
        #[arg(long, default_value_t = powertone_core::DEFAULT_ZERO_FREQ_HZ)]
        zero_freq: f64,

        /// Analysis window length (seconds); one symbol spans ten windows
        #[arg(long, default_value_t = powertone_core::DEFAULT_TIME_INTERVAL_SECS)]
        time_interval: f64,

        /// Band-pass filter order
        #[arg(long, default_value_t = powertone_core::DEFAULT_FILTER_ORDER)]
        filter_order: usize,

        /// Acceptance window around each calibrated tone (Hz)
        #[arg(long, default_value_t = powertone_core::DEFAULT_TOLERANCE_HZ)]
        tolerance: f64,

        /// Print the full decode report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Synthesize a BFSK recording of a message
    Synth {
        /// Message to encode (ASCII first character)
        message: String,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Frequency of 1 bits (Hz)
        #[arg(long, default_value_t = powertone_core::DEFAULT_ONE_FREQ_HZ)]
        one_freq: f64,

        /// Frequency of 0 bits (Hz)
        #[arg(long, default_value_t = powertone_core::DEFAULT_ZERO_FREQ_HZ)]
        zero_freq: f64,

        /// How long each bit is held (seconds)
        #[arg(long, default_value_t = 1.0)]
        symbol_duration: f64,

        /// Output sample rate (Hz)
        #[arg(long, default_value_t = 44_100)]
        sample_rate: u32,

        /// Invert the CRC trailer, producing a recording that fails validation
        #[arg(long)]
        corrupt_trailer: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Decode {
            input,
            one_freq,
            zero_freq,
            time_interval,
            filter_order,
            tolerance,
            json,
        } => {
            let config = DemodConfig {
                one_freq_hz: one_freq,
                zero_freq_hz: zero_freq,
                time_interval_secs: time_interval,
                filter_order,
                tolerance_hz: tolerance,
                ..Default::default()
            };
            decode_command(&input, config, json)
        }
        Commands::Synth {
            message,
            output,
            one_freq,
            zero_freq,
            symbol_duration,
            sample_rate,
            corrupt_trailer,
        } => {
            let config = SynthConfig {
                sample_rate,
                one_freq_hz: one_freq,
                zero_freq_hz: zero_freq,
                symbol_duration_secs: symbol_duration,
                ..Default::default()
            };
            synth_command(&message, &output, config, corrupt_trailer).map(|()| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn decode_command(input: &PathBuf, config: DemodConfig, json: bool) -> Result<ExitCode, CliError> {
    let buffer = wav::read_wav(input)?;
    let decoder = Decoder::new(config)?;
    let report = decoder.decode(&buffer)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report::JsonReport::from(&report))?);
    } else {
        match &report.outcome {
            DecodeOutcome::Text(text) => {
                println!("Received text:");
                println!("{}", text);
            }
            DecodeOutcome::RawBits { groups, reason } => {
                match reason {
                    RawBitsReason::IntegrityMismatch { received, computed } => {
                        println!(
                            "CRC mismatch (received {:08b}, computed {:08b}). Data might be corrupted.",
                            received, computed
                        );
                        println!("Please verify the received signal manually:");
                    }
                    RawBitsReason::Undecodable => {
                        println!("CRC matched, but the payload is not text. Received signal was:");
                    }
                }
                println!("{}", groups.join(" "));
            }
        }
    }

    Ok(if report.outcome.is_text() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_RAW_BITS)
    })
}

fn synth_command(
    message: &str,
    output: &PathBuf,
    config: SynthConfig,
    corrupt_trailer: bool,
) -> Result<(), CliError> {
    let encoder = Encoder::new(config)?;
    let mut bits = powertone_core::framing::transmission_bits(message.as_bytes())?;
    if corrupt_trailer {
        let len = bits.len();
        for bit in &mut bits[len - powertone_core::framing::TRAILER_BITS..] {
            *bit = !*bit;
        }
    }

    let buffer = encoder.encode_bits(&bits)?;
    info!(
        "Encoded {} bytes as {} symbols ({:.1} s)",
        message.len(),
        bits.len(),
        buffer.duration_secs()
    );

    wav::write_wav(output, &buffer)?;
    println!("Wrote {}", output.display());
    Ok(())
}
