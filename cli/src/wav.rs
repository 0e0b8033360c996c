use crate::error::CliError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::info;
use powertone_core::SampleBuffer;
use std::path::Path;

/// Load a WAV file as a mono buffer, downmixing any extra channels
pub fn read_wav(path: &Path) -> Result<SampleBuffer, CliError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    info!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
        (format, bits) => {
            return Err(CliError::UnsupportedFormat(format!(
                "{:?} samples at {} bits",
                format, bits
            )));
        }
    };

    let buffer = SampleBuffer::from_interleaved(&interleaved, spec.channels as usize, spec.sample_rate)?;
    info!(
        "Extracted {} mono samples ({:.2} s)",
        buffer.len(),
        buffer.duration_secs()
    );
    Ok(buffer)
}

/// Write a mono buffer as 16-bit PCM
pub fn write_wav(path: &Path, buffer: &SampleBuffer) -> Result<(), CliError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * 32767.0) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples: Vec<f32> = (0..800).map(|i| ((i % 16) as f32 - 8.0) / 16.0).collect();
        let buffer = SampleBuffer::new(samples.clone(), 8000).unwrap();

        write_wav(&path, &buffer).unwrap();
        let loaded = read_wav(&path).unwrap();

        assert_eq!(loaded.sample_rate(), 8000);
        assert_eq!(loaded.len(), 800);
        for (a, b) in loaded.samples().iter().zip(samples.iter()) {
            assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_stereo_wav_downmixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            writer.write_sample(16384i16).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let loaded = read_wav(&path).unwrap();
        assert_eq!(loaded.len(), 100);
        assert!(loaded.samples().iter().all(|&s| (s - 0.25).abs() < 1e-4));
    }
}
