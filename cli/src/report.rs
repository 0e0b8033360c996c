use powertone_core::{DecodeOutcome, DecodeReport, RawBitsReason};
use serde::Serialize;

/// JSON view of a decode run, printed by `decode --json`
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub windows: usize,
    pub calibration: JsonCalibration,
    pub correction: JsonCorrection,
    pub frame_bits: usize,
    pub crc_received: u8,
    pub crc_computed: u8,
}

#[derive(Debug, Serialize)]
pub struct JsonCalibration {
    pub zero_hz: f64,
    pub one_hz: f64,
}

#[derive(Debug, Serialize)]
pub struct JsonCorrection {
    pub flipped: usize,
    pub interpolated: usize,
    pub dropped: usize,
}

impl From<&DecodeReport> for JsonReport {
    fn from(report: &DecodeReport) -> Self {
        let demod = &report.demodulation;
        let (outcome, text, groups, reason) = match &report.outcome {
            DecodeOutcome::Text(text) => ("text", Some(text.clone()), None, None),
            DecodeOutcome::RawBits { groups, reason } => {
                let reason = match reason {
                    RawBitsReason::IntegrityMismatch { .. } => "integrity_mismatch",
                    RawBitsReason::Undecodable => "undecodable",
                };
                ("raw_bits", None, Some(groups.clone()), Some(reason))
            }
        };

        Self {
            outcome,
            text,
            groups,
            reason,
            windows: demod.windows,
            calibration: JsonCalibration {
                zero_hz: demod.calibration.zero_hz,
                one_hz: demod.calibration.one_hz,
            },
            correction: JsonCorrection {
                flipped: demod.correction.flipped,
                interpolated: demod.correction.interpolated,
                dropped: demod.correction.dropped,
            },
            frame_bits: demod.frame.len(),
            crc_received: report.integrity.received,
            crc_computed: report.integrity.computed,
        }
    }
}
