//! Channel utilities for turning captured audio into a mono sample stream

use crate::error::{DemodError, Result};

/// Mix interleaved multi-channel audio down to mono by averaging each frame
///
/// # Arguments
/// * `interleaved` - Samples laid out as [c0, c1, ..., c0, c1, ...]
/// * `channels` - Number of channels per frame
///
/// # Errors
/// `InvalidConfig` if `channels` is zero or the input holds a partial frame
pub fn downmix(interleaved: &[f32], channels: usize) -> Result<Vec<f32>> {
    if channels == 0 {
        return Err(DemodError::InvalidConfig(
            "channel count must be positive".to_string(),
        ));
    }
    if channels == 1 {
        return Ok(interleaved.to_vec());
    }
    if interleaved.len() % channels != 0 {
        return Err(DemodError::InvalidConfig(format!(
            "{} samples is not a whole number of {}-channel frames",
            interleaved.len(),
            channels
        )));
    }

    let mut mono = Vec::with_capacity(interleaved.len() / channels);
    for frame in interleaved.chunks(channels) {
        let sum: f32 = frame.iter().sum();
        mono.push(sum / channels as f32);
    }
    Ok(mono)
}
