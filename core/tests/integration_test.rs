// End-to-end decoding of synthesized recordings.
//
// All recordings use 8 kHz audio, 20 ms windows and 200 ms symbols (ten
// windows per symbol) so every test stays well under a second of CPU time.

use powertone_core::framing::{bytes_to_bits, frame_bits, transmission_bits, PREAMBLE};
use powertone_core::integrity::crc8;
use powertone_core::{
    DecodeOutcome, DemodConfig, DemodError, Decoder, Encoder, RawBitsReason, SampleBuffer, SynthConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f32::consts::PI;

const SAMPLE_RATE: u32 = 8000;
const ONE_HZ: f64 = 1500.0;
const ZERO_HZ: f64 = 2500.0;
const WINDOW_SAMPLES: usize = 160;
const SYMBOL_SAMPLES: usize = 1600;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn encoder() -> Encoder {
    Encoder::new(SynthConfig {
        sample_rate: SAMPLE_RATE,
        one_freq_hz: ONE_HZ,
        zero_freq_hz: ZERO_HZ,
        symbol_duration_secs: 0.2,
        amplitude: 0.8,
    })
    .expect("Failed to create encoder")
}

fn decoder() -> Decoder {
    Decoder::new(DemodConfig {
        one_freq_hz: ONE_HZ,
        zero_freq_hz: ZERO_HZ,
        time_interval_secs: 0.02,
        ..Default::default()
    })
    .expect("Failed to create decoder")
}

/// Overwrite one analysis window with a tone at `freq`
fn overwrite_window(buffer: &SampleBuffer, window: usize, freq: f32) -> SampleBuffer {
    let mut samples = buffer.samples().to_vec();
    let start = window * WINDOW_SAMPLES;
    for (i, sample) in samples[start..start + WINDOW_SAMPLES].iter_mut().enumerate() {
        *sample = 0.8 * (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin();
    }
    SampleBuffer::new(samples, SAMPLE_RATE).expect("Failed to rebuild buffer")
}

#[test]
fn test_scenario_a_single_letter() {
    init_logging();
    let buffer = encoder().encode(b"A").expect("Failed to encode");
    let report = decoder().decode(&buffer).expect("Failed to decode");

    assert!(report.integrity.matched());
    assert_eq!(report.outcome, DecodeOutcome::Text("A".to_string()));
}

#[test]
fn test_scenario_b_corrupted_trailer() {
    init_logging();
    let mut bits = transmission_bits(b"A").unwrap();
    let len = bits.len();
    for bit in &mut bits[len - 8..] {
        *bit = !*bit;
    }
    let buffer = encoder().encode_bits(&bits).unwrap();
    let report = decoder().decode(&buffer).expect("Mismatch must not abort the run");

    assert!(!report.integrity.matched());
    assert_eq!(report.integrity.received, !crc8(b"A"));
    match report.outcome {
        DecodeOutcome::RawBits { groups, reason } => {
            assert_eq!(groups, vec!["01000001".to_string()]);
            assert!(matches!(reason, RawBitsReason::IntegrityMismatch { .. }));
        }
        other => panic!("Expected raw bits, got {:?}", other),
    }
}

#[test]
fn test_scenario_c_unknown_window_interpolated() {
    init_logging();
    let clean = encoder().encode(b"A").unwrap();
    // Window 5 sits inside the first preamble symbol; 3300 Hz is far from both tones
    let buffer = overwrite_window(&clean, 5, 3300.0);
    let report = decoder().decode(&buffer).expect("Failed to decode");

    let correction = report.demodulation.correction;
    assert_eq!(correction.interpolated, 1);
    assert_eq!(correction.dropped, 0);
    assert_eq!(report.outcome.text(), Some("A"));
}

#[test]
fn test_scenario_d_recording_too_short() {
    init_logging();
    // Minimum viable window is half of 160 samples
    let buffer = SampleBuffer::new(vec![0.25; 79], SAMPLE_RATE).unwrap();
    match decoder().decode(&buffer) {
        Err(DemodError::MalformedInput { samples, min_window }) => {
            assert_eq!(samples, 79);
            assert_eq!(min_window, 80);
        }
        other => panic!("Expected MalformedInput, got {:?}", other.map(|r| r.outcome)),
    }
}

#[test]
fn test_isolated_window_flip_repaired() {
    init_logging();
    let clean = encoder().encode(b"Hi").unwrap();
    // Window 3 of the first (one) symbol rendered as the zero tone
    let buffer = overwrite_window(&clean, 3, ZERO_HZ as f32);
    let report = decoder().decode(&buffer).expect("Failed to decode");

    assert_eq!(report.demodulation.correction.flipped, 1);
    assert_eq!(report.outcome.text(), Some("Hi"));
}

#[test]
fn test_messages_round_trip() {
    init_logging();
    let messages: [&[u8]; 5] = [b"A", b"Hi", b"Hello, world", b"0123456789", b"~tilde"];
    let encoder = encoder();
    let decoder = decoder();

    for message in messages {
        let buffer = encoder.encode(message).unwrap();
        let report = decoder.decode(&buffer).expect("Failed to decode");
        assert_eq!(
            report.outcome.text(),
            Some(std::str::from_utf8(message).unwrap()),
            "Failed for {:?}",
            message
        );
    }
}

#[test]
fn test_random_bit_sequences_round_trip() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let encoder = encoder();
    let decoder = decoder();

    for _ in 0..8 {
        let bytes: usize = rng.gen_range(2..6);
        let mut frame: Vec<bool> = (0..bytes * 8).map(|_| rng.gen_bool(0.5)).collect();
        frame[0] = true;

        let mut bits = PREAMBLE.to_vec();
        bits.extend_from_slice(&frame);
        let buffer = encoder.encode_bits(&bits).unwrap();
        let demodulation = decoder.demodulate(&buffer).expect("Failed to demodulate");

        assert_eq!(demodulation.frame.bits(), &frame[..]);
    }
}

#[test]
fn test_round_trip_with_gaussian_noise() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0f32, 0.3).unwrap();
    let clean = encoder().encode(b"Noisy").unwrap();
    let noisy: Vec<f32> = clean
        .samples()
        .iter()
        .map(|&s| s + noise.sample(&mut rng))
        .collect();
    let buffer = SampleBuffer::new(noisy, SAMPLE_RATE).unwrap();

    let report = decoder().decode(&buffer).expect("Failed to decode");
    assert_eq!(report.outcome.text(), Some("Noisy"));
}

#[test]
fn test_calibration_is_repeatable() {
    init_logging();
    let buffer = encoder().encode(b"same").unwrap();
    let decoder = decoder();
    let first = decoder.decode(&buffer).unwrap();
    let second = decoder.decode(&buffer).unwrap();

    assert_eq!(first.demodulation.calibration, second.demodulation.calibration);
    assert_eq!(first.demodulation.estimates, second.demodulation.estimates);
}

#[test]
fn test_offset_tones_recovered_by_calibration() {
    init_logging();
    // Transmitter drifted 150 Hz away from the nominal targets
    let encoder = Encoder::new(SynthConfig {
        sample_rate: SAMPLE_RATE,
        one_freq_hz: ONE_HZ + 150.0,
        zero_freq_hz: ZERO_HZ - 150.0,
        symbol_duration_secs: 0.2,
        amplitude: 0.8,
    })
    .unwrap();
    let buffer = encoder.encode(b"drift").unwrap();
    let report = decoder().decode(&buffer).expect("Failed to decode");

    let calibration = report.demodulation.calibration;
    assert!((calibration.one_hz - 1650.0).abs() < 30.0, "{:?}", calibration);
    assert!((calibration.zero_hz - 2350.0).abs() < 30.0, "{:?}", calibration);
    assert_eq!(report.outcome.text(), Some("drift"));
}

#[test]
fn test_stereo_recording_downmixed() {
    init_logging();
    let mono = encoder().encode(b"st").unwrap();
    let interleaved: Vec<f32> = mono.samples().iter().flat_map(|&s| [s, s]).collect();
    let buffer = SampleBuffer::from_interleaved(&interleaved, 2, SAMPLE_RATE).unwrap();
    assert_eq!(buffer.len(), mono.len());

    let report = decoder().decode(&buffer).expect("Failed to decode");
    assert_eq!(report.outcome.text(), Some("st"));
}

#[test]
fn test_frame_bits_match_encoder_layout() {
    let buffer = encoder().encode(b"ok").unwrap();
    let demodulation = decoder().demodulate(&buffer).unwrap();

    assert_eq!(demodulation.frame.bits(), &frame_bits(b"ok").unwrap()[..]);
    assert_eq!(demodulation.frame.payload_bytes(), b"ok".to_vec());
    assert_eq!(demodulation.frame.trailer_bits(), &bytes_to_bits(&[crc8(b"ok")])[..]);
    assert_eq!(demodulation.windows * WINDOW_SAMPLES, buffer.len());
    assert_eq!(buffer.len(), (8 + 24) * SYMBOL_SAMPLES);
}

#[test]
fn test_single_tone_recording_fails_calibration() {
    let buffer = encoder().encode_bits(&[false; 16]).unwrap();
    assert!(matches!(
        decoder().decode(&buffer),
        Err(DemodError::Calibration { missing: "one" })
    ));
}
