use crate::buffer::SampleBuffer;
use crate::config::SynthConfig;
use crate::error::Result;
use crate::framing::transmission_bits;
use log::info;
use std::f64::consts::PI;

/// Two-tone synthesizer for test recordings
///
/// Each bit holds its tone for one symbol duration. Phase is carried across
/// symbol boundaries so tone switches do not click.
pub struct Encoder {
    config: SynthConfig,
}

impl Encoder {
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Render one tone per bit, in order
    pub fn modulate(&self, bits: &[bool]) -> Vec<f32> {
        let symbol_samples = self.config.symbol_samples();
        let sample_rate = self.config.sample_rate as f64;
        let mut samples = Vec::with_capacity(bits.len() * symbol_samples);
        let mut phase = 0.0f64;

        for &bit in bits {
            let freq = if bit {
                self.config.one_freq_hz
            } else {
                self.config.zero_freq_hz
            };
            let step = 2.0 * PI * freq / sample_rate;
            for _ in 0..symbol_samples {
                samples.push((phase.sin() as f32) * self.config.amplitude);
                phase = (phase + step) % (2.0 * PI);
            }
        }

        samples
    }

    /// Preamble plus framed `payload`, rendered as a recording
    pub fn encode(&self, payload: &[u8]) -> Result<SampleBuffer> {
        let bits = transmission_bits(payload)?;
        info!(
            "Encoding {} payload bytes as {} symbols ({:.1} s)",
            payload.len(),
            bits.len(),
            bits.len() as f64 * self.config.symbol_duration_secs
        );
        self.encode_bits(&bits)
    }

    /// Render an arbitrary bit sequence as a recording, with no framing added
    pub fn encode_bits(&self, bits: &[bool]) -> Result<SampleBuffer> {
        SampleBuffer::new(self.modulate(bits), self.config.sample_rate)
    }
}
