use crate::buffer::SampleBuffer;
use crate::calibrate::{calibrate, CalibrationState};
use crate::config::DemodConfig;
use crate::error::Result;
use crate::filter::BandpassFilter;
use crate::framing::{expand_runs, strip_preamble, Frame};
use crate::integrity::{validate, IntegrityCheck};
use crate::render::{render, DecodeOutcome};
use crate::segment::Segmenter;
use crate::spectrum::SpectralEstimator;
use crate::symbol::{classify, correct, quantize_runs, run_length_encode, CorrectionStats, Run};
use log::{debug, info};

/// Everything the pipeline learned up to the recovered frame
#[derive(Debug, Clone)]
pub struct Demodulation {
    /// Analysis windows after dropping a short tail
    pub windows: usize,
    /// Dominant frequency of each window (Hz)
    pub estimates: Vec<u32>,
    pub calibration: CalibrationState,
    pub correction: CorrectionStats,
    /// Quantized run-length table, preamble included
    pub runs: Vec<Run>,
    pub frame: Frame,
}

/// Result of a complete decode run
#[derive(Debug, Clone)]
pub struct DecodeReport {
    pub demodulation: Demodulation,
    pub integrity: IntegrityCheck,
    pub outcome: DecodeOutcome,
}

/// Batch BFSK demodulator over a fully buffered recording
///
/// Stages run once each, in order: band-pass filter, segmentation, spectral
/// estimation, calibration, classification and repair, preamble stripping and
/// framing, integrity check, rendering. Calibration is recomputed on every
/// call; nothing carries over between runs.
#[derive(Debug, Default)]
pub struct Decoder {
    config: DemodConfig,
}

impl Decoder {
    pub fn new(config: DemodConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DemodConfig {
        &self.config
    }

    /// Run the pipeline up to and including framing
    ///
    /// # Errors
    /// `MalformedInput`, `Calibration` or `Framing`, whichever stage fails
    /// first.
    pub fn demodulate(&self, buffer: &SampleBuffer) -> Result<Demodulation> {
        let config = &self.config;
        let sample_rate = buffer.sample_rate();
        info!(
            "Decoding {} samples at {} Hz ({:.2} s)",
            buffer.len(),
            sample_rate,
            buffer.duration_secs()
        );

        let segmenter = Segmenter::new(config.window_samples(sample_rate), config.min_window_ratio)?;
        segmenter.ensure_viable(buffer.len())?;

        let filter = BandpassFilter::for_targets(
            config.zero_freq_hz,
            config.one_freq_hz,
            sample_rate,
            config.filter_order,
        );
        let filtered = filter.apply(buffer.samples());

        let windows = segmenter.split(&filtered)?;
        info!(
            "Split recording into {} windows of {} samples",
            windows.len(),
            segmenter.window_len()
        );

        let mut estimator = SpectralEstimator::new(sample_rate);
        let estimates = estimator.estimate_all(&windows)?;
        debug!("Window estimates (Hz): {:?}", estimates);

        let calibration = calibrate(&estimates, config.zero_freq_hz, config.one_freq_hz)?;

        let symbols = classify(&estimates, &calibration, config.tolerance_hz);
        let (symbols, correction) = correct(&symbols);
        info!(
            "Corrector flipped {}, interpolated {}, dropped {} windows",
            correction.flipped, correction.interpolated, correction.dropped
        );

        let runs = quantize_runs(&run_length_encode(&symbols), config.windows_per_symbol);
        debug!("Quantized runs: {:?}", runs);

        let stripped = strip_preamble(&runs)?;
        let frame = Frame::from_bits(expand_runs(&stripped))?;
        info!(
            "Recovered {}-bit frame ({} payload bits)",
            frame.len(),
            frame.payload_bits().len()
        );

        Ok(Demodulation {
            windows: windows.len(),
            estimates,
            calibration,
            correction,
            runs,
            frame,
        })
    }

    /// Run the whole pipeline
    ///
    /// A CRC mismatch or undecodable payload is not an error: it comes back as
    /// [`DecodeOutcome::RawBits`].
    pub fn decode(&self, buffer: &SampleBuffer) -> Result<DecodeReport> {
        let demodulation = self.demodulate(buffer)?;
        let integrity = validate(&demodulation.frame);
        let outcome = render(&demodulation.frame, &integrity);
        if integrity.matched() {
            info!("CRC matched (0x{:02X})", integrity.computed);
        }

        Ok(DecodeReport {
            demodulation,
            integrity,
            outcome,
        })
    }
}
