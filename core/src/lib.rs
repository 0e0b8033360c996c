//! Two-tone (BFSK) demodulator for fully buffered recordings
//!
//! Recovers a framed byte message from a recording in which each bit was held
//! as one of two tones, knowing only the approximate tone frequencies. The
//! decoder calibrates the real tone frequencies from the recording itself,
//! syncs on a fixed preamble, repairs isolated window errors and checks the
//! result against a CRC-8 trailer.

pub mod error;
pub mod config;
pub mod buffer;
pub mod channels;
pub mod filter;
pub mod segment;
pub mod spectrum;
pub mod calibrate;
pub mod symbol;
pub mod framing;
pub mod integrity;
pub mod render;
pub mod encoder;
pub mod decoder;

pub use buffer::SampleBuffer;
pub use calibrate::CalibrationState;
pub use config::{DemodConfig, SynthConfig};
pub use decoder::{DecodeReport, Decoder, Demodulation};
pub use encoder::Encoder;
pub use error::{DemodError, Result};
pub use render::{DecodeOutcome, RawBitsReason};
pub use symbol::{Run, Symbol};

// Demodulator defaults
pub const DEFAULT_ONE_FREQ_HZ: f64 = 5500.0;
pub const DEFAULT_ZERO_FREQ_HZ: f64 = 6500.0;
pub const DEFAULT_TIME_INTERVAL_SECS: f64 = 0.1;
pub const DEFAULT_FILTER_ORDER: usize = 5;
pub const DEFAULT_TOLERANCE_HZ: f64 = 250.0;
pub const DEFAULT_WINDOWS_PER_SYMBOL: usize = 10;
pub const DEFAULT_MIN_WINDOW_RATIO: f64 = 0.5;
