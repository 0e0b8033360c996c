use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Small synthesis parameters keep each recording a few seconds of 8 kHz audio
const SYNTH_ARGS: &[&str] = &[
    "--sample-rate",
    "8000",
    "--symbol-duration",
    "0.2",
    "--one-freq",
    "1500",
    "--zero-freq",
    "2500",
];

const DECODE_ARGS: &[&str] = &[
    "--time-interval",
    "0.02",
    "--one-freq",
    "1500",
    "--zero-freq",
    "2500",
];

fn run_powertone(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_powertone"))
        .args(args)
        .output()
        .expect("Failed to execute powertone")
}

fn synth(dir: &Path, name: &str, message: &str, extra: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut args = vec!["synth", message, path.to_str().unwrap()];
    args.extend_from_slice(SYNTH_ARGS);
    args.extend_from_slice(extra);

    let output = run_powertone(&args);
    assert!(
        output.status.success(),
        "synth failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(path.exists(), "Output file was not created");
    path
}

fn decode(path: &Path, extra: &[&str]) -> Output {
    let mut args = vec!["decode", path.to_str().unwrap()];
    args.extend_from_slice(DECODE_ARGS);
    args.extend_from_slice(extra);
    run_powertone(&args)
}

#[test]
fn test_synth_then_decode_text() {
    let dir = tempfile::tempdir().unwrap();
    let wav = synth(dir.path(), "hello.wav", "Hello", &[]);

    let output = decode(&wav, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout);
    assert!(stdout.contains("Received text:"), "Got: {}", stdout);
    assert!(stdout.lines().any(|line| line == "Hello"), "Got: {}", stdout);
}

#[test]
fn test_corrupted_trailer_prints_raw_bits() {
    let dir = tempfile::tempdir().unwrap();
    let wav = synth(dir.path(), "bad.wav", "A", &["--corrupt-trailer"]);

    let output = decode(&wav, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(2), "stdout: {}", stdout);
    assert!(stdout.contains("CRC mismatch"), "Got: {}", stdout);
    assert!(stdout.contains("01000001"), "Got: {}", stdout);
}

#[test]
fn test_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let wav = synth(dir.path(), "json.wav", "ok", &[]);

    let output = decode(&wav, &["--json"]);
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("decode --json must print JSON");
    assert_eq!(report["outcome"], "text");
    assert_eq!(report["text"], "ok");
    assert_eq!(report["frame_bits"], 24);
    assert_eq!(report["crc_received"], report["crc_computed"]);
}

#[test]
fn test_too_short_recording_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..40 {
        writer.write_sample(1000i16).unwrap();
    }
    writer.finalize().unwrap();

    let output = decode(&path, &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Error:"), "Got: {}", stderr);
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = decode(&dir.path().join("absent.wav"), &[]);
    assert_eq!(output.status.code(), Some(1));
}
