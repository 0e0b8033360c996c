//! Preamble synchronization and frame layout
//!
//! A transmission is the preamble `10101010` followed by a frame:
//!
//! ```text
//! M p1 p2 ... p(8n-1) c7 ... c0
//! ```
//!
//! The payload bytes `P0..P(n-1)` go out most significant bit first, except
//! that the first bit of `P0` is replaced by the marker `M = 1` (so `P0` must
//! be below 0x80). `c` is the CRC-8 trailer over the payload bytes. Because the
//! marker is always 1, the run that follows the preamble's final zero is always
//! a run of ones, which is what lets the decoder expand runs by parity alone.

use crate::error::{DemodError, Result};
use crate::integrity::crc8;
use crate::symbol::Run;
use log::debug;

/// Synchronization pattern sent before every frame
pub const PREAMBLE: [bool; 8] = [true, false, true, false, true, false, true, false];

/// Leading run-length entries consumed unconditionally by the stripper
pub const PREAMBLE_RUNS_DISCARDED: usize = PREAMBLE.len() - 1;

/// Bits in the check trailer
pub const TRAILER_BITS: usize = 8;

/// Smallest frame that still carries one payload bit besides the marker
pub const MIN_FRAME_BITS: usize = TRAILER_BITS + 1;

/// Remove the preamble from a quantized run-length table
///
/// The first seven entries are discarded. The eighth is the preamble's last
/// zero, possibly sharing its boundary window with the frame: it is dropped if
/// it quantized to nothing, otherwise decremented by one, and dropped if that
/// leaves it empty.
///
/// # Errors
/// `Framing` if the table has fewer than eight entries.
pub fn strip_preamble(runs: &[Run]) -> Result<Vec<Run>> {
    if runs.len() < PREAMBLE.len() {
        return Err(DemodError::Framing(format!(
            "only {} runs, preamble alone needs {}",
            runs.len(),
            PREAMBLE.len()
        )));
    }

    let mut rest = runs[PREAMBLE_RUNS_DISCARDED..].to_vec();
    if rest[0].length == 0 {
        debug!("Preamble boundary run quantized to zero, discarding it");
        rest.remove(0);
    } else {
        rest[0].length -= 1;
        if rest[0].length == 0 {
            rest.remove(0);
        }
    }
    Ok(rest)
}

/// Expand runs into bits by position: even-indexed runs are ones, odd-indexed
/// runs are zeros, whatever symbol was classified
pub fn expand_runs(runs: &[Run]) -> Vec<bool> {
    runs.iter()
        .enumerate()
        .flat_map(|(idx, run)| std::iter::repeat(idx % 2 == 0).take(run.length))
        .collect()
}

/// A byte-aligned frame recovered from the recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bits: Vec<bool>,
}

impl Frame {
    /// Trim `bits` to the longest prefix that is a whole number of bytes
    ///
    /// # Errors
    /// `Framing` if fewer than [`MIN_FRAME_BITS`] remain.
    pub fn from_bits(mut bits: Vec<bool>) -> Result<Self> {
        let aligned = bits.len() - bits.len() % 8;
        bits.truncate(aligned);
        if bits.len() < MIN_FRAME_BITS {
            return Err(DemodError::Framing(format!(
                "{} bits after byte alignment, need at least {}",
                bits.len(),
                MIN_FRAME_BITS
            )));
        }
        Ok(Self { bits })
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn marker(&self) -> bool {
        self.bits[0]
    }

    /// Everything between the marker and the trailer
    pub fn payload_bits(&self) -> &[bool] {
        &self.bits[1..self.bits.len() - TRAILER_BITS]
    }

    pub fn trailer_bits(&self) -> &[bool] {
        &self.bits[self.bits.len() - TRAILER_BITS..]
    }

    /// Payload as whole bytes, left-padded with zero bits (the marker slot
    /// reads as a clear top bit)
    pub fn payload_bytes(&self) -> Vec<u8> {
        bits_to_bytes(self.payload_bits())
    }

    pub fn trailer(&self) -> u8 {
        self.trailer_bits()
            .iter()
            .fold(0u8, |acc, &bit| (acc << 1) | bit as u8)
    }
}

/// Pack bits big-endian into bytes, left-padding to a byte boundary
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    let pad = (8 - bits.len() % 8) % 8;
    let padded: Vec<bool> = std::iter::repeat(false).take(pad).chain(bits.iter().copied()).collect();
    padded
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect()
}

pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// Frame bits for `payload`: marker, payload, CRC-8 trailer
///
/// # Errors
/// `InvalidPayload` if the payload is empty or its first byte has the top bit
/// set (that bit carries the marker).
pub fn frame_bits(payload: &[u8]) -> Result<Vec<bool>> {
    let first = *payload
        .first()
        .ok_or_else(|| DemodError::InvalidPayload("payload is empty".to_string()))?;
    if first & 0x80 != 0 {
        return Err(DemodError::InvalidPayload(format!(
            "first byte 0x{:02X} has its top bit set, which is reserved for the frame marker",
            first
        )));
    }

    let mut bits = bytes_to_bits(payload);
    bits[0] = true;
    bits.extend(bytes_to_bits(&[crc8(payload)]));
    Ok(bits)
}

/// Preamble followed by the frame for `payload`, one bit per symbol
pub fn transmission_bits(payload: &[u8]) -> Result<Vec<bool>> {
    let mut bits = PREAMBLE.to_vec();
    bits.extend(frame_bits(payload)?);
    Ok(bits)
}
