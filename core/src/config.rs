use crate::error::{DemodError, Result};
use crate::{
    DEFAULT_FILTER_ORDER, DEFAULT_MIN_WINDOW_RATIO, DEFAULT_ONE_FREQ_HZ, DEFAULT_TIME_INTERVAL_SECS,
    DEFAULT_TOLERANCE_HZ, DEFAULT_WINDOWS_PER_SYMBOL, DEFAULT_ZERO_FREQ_HZ,
};

/// Demodulator settings for one decode run
///
/// The two nominal frequencies only seed calibration: once the calibrator
/// has seen the recording, the refreshed targets replace them.
#[derive(Debug, Clone)]
pub struct DemodConfig {
    /// Nominal frequency of a transmitted 1 bit (Hz)
    pub one_freq_hz: f64,
    /// Nominal frequency of a transmitted 0 bit (Hz)
    pub zero_freq_hz: f64,
    /// Duration of one analysis window (seconds)
    pub time_interval_secs: f64,
    /// Butterworth order of each half of the band-pass pre-filter
    pub filter_order: usize,
    /// Half-width of the acceptance window around each calibrated target (Hz)
    pub tolerance_hz: f64,
    /// Analysis windows spanned by one transmitted symbol
    pub windows_per_symbol: usize,
    /// Shortest viable window, as a fraction of the nominal window length
    pub min_window_ratio: f64,
}

impl Default for DemodConfig {
    fn default() -> Self {
        Self {
            one_freq_hz: DEFAULT_ONE_FREQ_HZ,
            zero_freq_hz: DEFAULT_ZERO_FREQ_HZ,
            time_interval_secs: DEFAULT_TIME_INTERVAL_SECS,
            filter_order: DEFAULT_FILTER_ORDER,
            tolerance_hz: DEFAULT_TOLERANCE_HZ,
            windows_per_symbol: DEFAULT_WINDOWS_PER_SYMBOL,
            min_window_ratio: DEFAULT_MIN_WINDOW_RATIO,
        }
    }
}

impl DemodConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.one_freq_hz > 0.0) || !(self.zero_freq_hz > 0.0) {
            return Err(DemodError::InvalidConfig(
                "target frequencies must be positive".to_string(),
            ));
        }
        if self.one_freq_hz == self.zero_freq_hz {
            return Err(DemodError::InvalidConfig(format!(
                "one and zero frequencies must differ (both {} Hz)",
                self.one_freq_hz
            )));
        }
        if !(self.time_interval_secs > 0.0) {
            return Err(DemodError::InvalidConfig(
                "time interval must be positive".to_string(),
            ));
        }
        if self.filter_order == 0 {
            return Err(DemodError::InvalidConfig(
                "filter order must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance_hz >= 0.0) {
            return Err(DemodError::InvalidConfig(
                "tolerance must not be negative".to_string(),
            ));
        }
        if self.windows_per_symbol == 0 {
            return Err(DemodError::InvalidConfig(
                "windows per symbol must be at least 1".to_string(),
            ));
        }
        if !(self.min_window_ratio > 0.0 && self.min_window_ratio <= 1.0) {
            return Err(DemodError::InvalidConfig(
                "minimum window ratio must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Nominal window length in samples for the given sample rate
    pub fn window_samples(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.time_interval_secs).round() as usize
    }
}

/// Settings for rendering a transmission as a two-tone waveform
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub sample_rate: u32,
    pub one_freq_hz: f64,
    pub zero_freq_hz: f64,
    /// How long each bit's tone is held (seconds)
    pub symbol_duration_secs: f64,
    /// Peak amplitude in [0, 1]
    pub amplitude: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            one_freq_hz: DEFAULT_ONE_FREQ_HZ,
            zero_freq_hz: DEFAULT_ZERO_FREQ_HZ,
            symbol_duration_secs: DEFAULT_TIME_INTERVAL_SECS * DEFAULT_WINDOWS_PER_SYMBOL as f64,
            amplitude: 0.8,
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(DemodError::InvalidConfig(
                "sample rate must be positive".to_string(),
            ));
        }
        let nyquist = self.sample_rate as f64 / 2.0;
        for freq in [self.one_freq_hz, self.zero_freq_hz] {
            if !(freq > 0.0 && freq < nyquist) {
                return Err(DemodError::InvalidConfig(format!(
                    "tone {} Hz outside (0, {} Hz)",
                    freq, nyquist
                )));
            }
        }
        if self.symbol_samples() == 0 {
            return Err(DemodError::InvalidConfig(
                "symbol duration shorter than one sample".to_string(),
            ));
        }
        if !(self.amplitude > 0.0 && self.amplitude <= 1.0) {
            return Err(DemodError::InvalidConfig(
                "amplitude must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    pub fn symbol_samples(&self) -> usize {
        (self.sample_rate as f64 * self.symbol_duration_secs).round() as usize
    }
}
