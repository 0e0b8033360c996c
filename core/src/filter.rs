//! Band-pass pre-filter applied to the whole recording before segmentation
//!
//! The pass band spans both target tones plus a guard band equal to their
//! separation on each side. It is built as an order-N Butterworth high-pass
//! cascaded with an order-N Butterworth low-pass, each realised as a chain of
//! second-order sections (with one first-order section when N is odd).

use std::f64::consts::PI;

/// One IIR section, coefficients pre-normalized by a0.
/// First-order sections leave `b2` and `a2` at zero.
#[derive(Debug, Clone, Copy)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    fn lowpass(cutoff_hz: f64, sample_rate: f64, q: f64) -> Self {
        let omega = 2.0 * PI * cutoff_hz / sample_rate;
        let cos_w = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: ((1.0 - cos_w) / 2.0) / a0,
            b1: (1.0 - cos_w) / a0,
            b2: ((1.0 - cos_w) / 2.0) / a0,
            a1: (-2.0 * cos_w) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    fn highpass(cutoff_hz: f64, sample_rate: f64, q: f64) -> Self {
        let omega = 2.0 * PI * cutoff_hz / sample_rate;
        let cos_w = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: ((1.0 + cos_w) / 2.0) / a0,
            b1: (-(1.0 + cos_w)) / a0,
            b2: ((1.0 + cos_w) / 2.0) / a0,
            a1: (-2.0 * cos_w) / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    fn first_order_lowpass(cutoff_hz: f64, sample_rate: f64) -> Self {
        let k = (PI * cutoff_hz / sample_rate).tan();
        Self {
            b0: k / (1.0 + k),
            b1: k / (1.0 + k),
            b2: 0.0,
            a1: (k - 1.0) / (k + 1.0),
            a2: 0.0,
        }
    }

    fn first_order_highpass(cutoff_hz: f64, sample_rate: f64) -> Self {
        let k = (PI * cutoff_hz / sample_rate).tan();
        Self {
            b0: 1.0 / (1.0 + k),
            b1: -1.0 / (1.0 + k),
            b2: 0.0,
            a1: (k - 1.0) / (k + 1.0),
            a2: 0.0,
        }
    }

    /// Run the section over `samples` in place, starting from rest
    fn apply(&self, samples: &mut [f64]) {
        let (mut x1, mut x2) = (0.0f64, 0.0f64);
        let (mut y1, mut y2) = (0.0f64, 0.0f64);
        for sample in samples.iter_mut() {
            let x = *sample;
            let y = self.b0 * x + self.b1 * x1 + self.b2 * x2 - self.a1 * y1 - self.a2 * y2;
            x2 = x1;
            x1 = x;
            y2 = y1;
            y1 = y;
            *sample = y;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Response {
    Lowpass,
    Highpass,
}

/// Q of each conjugate pole pair of an order-`order` Butterworth prototype
fn butterworth_qs(order: usize) -> Vec<f64> {
    (0..order / 2)
        .map(|k| {
            let theta = (2 * k + 1) as f64 * PI / (2 * order) as f64;
            1.0 / (2.0 * theta.sin())
        })
        .collect()
}

fn butterworth_sections(response: Response, order: usize, cutoff_hz: f64, sample_rate: f64) -> Vec<Biquad> {
    let mut sections: Vec<Biquad> = butterworth_qs(order)
        .into_iter()
        .map(|q| match response {
            Response::Lowpass => Biquad::lowpass(cutoff_hz, sample_rate, q),
            Response::Highpass => Biquad::highpass(cutoff_hz, sample_rate, q),
        })
        .collect();
    if order % 2 == 1 {
        sections.push(match response {
            Response::Lowpass => Biquad::first_order_lowpass(cutoff_hz, sample_rate),
            Response::Highpass => Biquad::first_order_highpass(cutoff_hz, sample_rate),
        });
    }
    sections
}

/// Cutoffs for the two target tones: the span between them widened by their
/// separation on both sides
pub fn guard_band(freq_a_hz: f64, freq_b_hz: f64) -> (f64, f64) {
    let separation = (freq_a_hz - freq_b_hz).abs();
    (
        freq_a_hz.min(freq_b_hz) - separation,
        freq_a_hz.max(freq_b_hz) + separation,
    )
}

/// Butterworth band-pass filter over `[low_hz, high_hz]`
///
/// An edge at or below 0 Hz drops the high-pass half, an edge at or above
/// Nyquist drops the low-pass half.
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    sections: Vec<Biquad>,
}

impl BandpassFilter {
    pub fn new(low_hz: f64, high_hz: f64, sample_rate: u32, order: usize) -> Self {
        let sample_rate = sample_rate as f64;
        let nyquist = sample_rate / 2.0;
        let mut sections = Vec::new();
        if low_hz > 0.0 && low_hz < nyquist {
            sections.extend(butterworth_sections(Response::Highpass, order, low_hz, sample_rate));
        }
        if high_hz > 0.0 && high_hz < nyquist {
            sections.extend(butterworth_sections(Response::Lowpass, order, high_hz, sample_rate));
        }
        Self { sections }
    }

    /// Filter tuned to a pair of target tones, see [`guard_band`]
    pub fn for_targets(freq_a_hz: f64, freq_b_hz: f64, sample_rate: u32, order: usize) -> Self {
        let (low, high) = guard_band(freq_a_hz, freq_b_hz);
        Self::new(low, high, sample_rate, order)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Filter a whole buffer, returning a new one of the same length
    pub fn apply(&self, samples: &[f32]) -> Vec<f32> {
        let mut work: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
        for section in &self.sections {
            section.apply(&mut work);
        }
        work.into_iter().map(|s| s as f32).collect()
    }
}
