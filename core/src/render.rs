use crate::framing::{bits_to_bytes, Frame};
use crate::integrity::IntegrityCheck;
use log::warn;

/// Why a frame was reported as raw bits instead of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBitsReason {
    /// Trailer disagreed with the payload CRC; data may be corrupted
    IntegrityMismatch { received: u8, computed: u8 },
    /// CRC matched, but the payload holds no decodable text
    Undecodable,
}

/// Terminal value of a decode run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Text(String),
    RawBits {
        /// Payload as 8-character groups of '0'/'1', left-padded to whole bytes
        groups: Vec<String>,
        reason: RawBitsReason,
    },
}

impl DecodeOutcome {
    pub fn is_text(&self) -> bool {
        matches!(self, DecodeOutcome::Text(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DecodeOutcome::Text(text) => Some(text),
            DecodeOutcome::RawBits { .. } => None,
        }
    }

    /// Groups joined by single spaces
    pub fn bit_dump(&self) -> Option<String> {
        match self {
            DecodeOutcome::Text(_) => None,
            DecodeOutcome::RawBits { groups, .. } => Some(groups.join(" ")),
        }
    }
}

/// Split bits into 8-character '0'/'1' groups after left-padding to a whole
/// number of bytes
pub fn bit_groups(bits: &[bool]) -> Vec<String> {
    bits_to_bytes(bits)
        .iter()
        .map(|byte| format!("{:08b}", byte))
        .collect()
}

/// Decode the payload value as UTF-8, substituting U+FFFD for invalid
/// sequences
///
/// The payload is read as a big-endian number, so leading zero bytes carry no
/// text. Returns `None` when nothing but substitutions would be left.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let text = String::from_utf8_lossy(&bytes[start..]);
    if text.chars().all(|c| c == char::REPLACEMENT_CHARACTER) {
        return None;
    }
    Some(text.into_owned())
}

/// Turn a validated frame into its final outcome; never fails
pub fn render(frame: &Frame, check: &IntegrityCheck) -> DecodeOutcome {
    let payload = frame.payload_bits();

    if !check.matched() {
        warn!(
            "CRC mismatch (received {:08b}, computed {:08b}); data might be corrupted",
            check.received, check.computed
        );
        return DecodeOutcome::RawBits {
            groups: bit_groups(payload),
            reason: RawBitsReason::IntegrityMismatch {
                received: check.received,
                computed: check.computed,
            },
        };
    }

    match decode_text(&frame.payload_bytes()) {
        Some(text) => DecodeOutcome::Text(text),
        None => {
            warn!("CRC matched but payload is not decodable text");
            DecodeOutcome::RawBits {
                groups: bit_groups(payload),
                reason: RawBitsReason::Undecodable,
            }
        }
    }
}
