use crate::error::{DemodError, Result};
use log::info;

/// Target frequencies refreshed from the recording itself
///
/// Produced once per decode run by [`calibrate`] and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    pub zero_hz: f64,
    pub one_hz: f64,
}

/// Re-derive both targets from the raw estimates
///
/// Each estimate joins whichever nominal target it is closer to (ties go to
/// zero); the refreshed targets are the per-class means.
///
/// # Errors
/// `Calibration` if either class ends up empty.
pub fn calibrate(estimates: &[u32], nominal_zero_hz: f64, nominal_one_hz: f64) -> Result<CalibrationState> {
    let (mut zero_sum, mut zero_count) = (0.0f64, 0usize);
    let (mut one_sum, mut one_count) = (0.0f64, 0usize);

    for &estimate in estimates {
        let freq = estimate as f64;
        if (freq - nominal_zero_hz).abs() <= (freq - nominal_one_hz).abs() {
            zero_sum += freq;
            zero_count += 1;
        } else {
            one_sum += freq;
            one_count += 1;
        }
    }

    if zero_count == 0 {
        return Err(DemodError::Calibration { missing: "zero" });
    }
    if one_count == 0 {
        return Err(DemodError::Calibration { missing: "one" });
    }

    let state = CalibrationState {
        zero_hz: zero_sum / zero_count as f64,
        one_hz: one_sum / one_count as f64,
    };
    info!(
        "Calibrated targets: zero {:.1} Hz ({} windows), one {:.1} Hz ({} windows)",
        state.zero_hz, zero_count, state.one_hz, one_count
    );
    Ok(state)
}
