use crate::error::{DemodError, Result};
use realfft::RealFftPlanner;

/// Finds the loudest frequency of a window with a real FFT
///
/// Only bins in `[n/10, n/2)` are searched, which keeps DC offset and
/// near-Nyquist artifacts from winning. The result is a pure function of the
/// window contents; the planner only caches FFT plans between calls.
pub struct SpectralEstimator {
    planner: RealFftPlanner<f32>,
    sample_rate: u32,
}

impl SpectralEstimator {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            planner: RealFftPlanner::new(),
            sample_rate,
        }
    }

    /// Magnitude spectrum of `window` (n/2 + 1 bins)
    pub fn magnitudes(&mut self, window: &[f32]) -> Result<Vec<f32>> {
        let fft = self.planner.plan_fft_forward(window.len());
        let mut input = window.to_vec();
        let mut spectrum = fft.make_output_vec();
        fft.process(&mut input, &mut spectrum)
            .map_err(|e| DemodError::FftError(e.to_string()))?;
        Ok(spectrum.iter().map(|c| c.norm()).collect())
    }

    /// Dominant frequency of `window` in whole Hz
    pub fn dominant_frequency(&mut self, window: &[f32]) -> Result<u32> {
        let n = window.len();
        let (lo, hi) = (n / 10, n / 2);
        if lo >= hi {
            return Err(DemodError::FftError(format!(
                "window of {} samples has no searchable bins",
                n
            )));
        }

        let magnitudes = self.magnitudes(window)?;

        // First maximum wins on ties
        let mut best_bin = lo;
        let mut best_mag = f32::NEG_INFINITY;
        for (bin, &mag) in magnitudes.iter().enumerate().take(hi).skip(lo) {
            if mag > best_mag {
                best_mag = mag;
                best_bin = bin;
            }
        }

        let freq = best_bin as f64 * self.sample_rate as f64 / n as f64;
        Ok(freq.round() as u32)
    }

    /// Estimate every window in order
    pub fn estimate_all(&mut self, windows: &[&[f32]]) -> Result<Vec<u32>> {
        windows
            .iter()
            .map(|window| self.dominant_frequency(window))
            .collect()
    }
}
